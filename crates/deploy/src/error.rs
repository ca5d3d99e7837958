//! Deploy error types.

/// Errors produced during a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scan failed: {0}")]
    Asset(#[from] pagesync_assets::AssetError),

    #[error("packing failed: {0}")]
    Pack(#[from] pagesync_transfer::PackError),

    #[error("transfer error: {0}")]
    Transfer(#[from] pagesync_transfer::TransferError),

    #[error("store error: {0}")]
    Remote(String),

    #[error("{failed} of {total} upload batches failed; first error: {first}")]
    BatchesFailed {
        failed: usize,
        total: usize,
        #[source]
        first: Box<DeployError>,
    },

    #[error("cancelled")]
    Cancelled,
}
