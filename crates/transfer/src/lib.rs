//! Upload batching: packs files into size-bounded buckets and reads
//! their contents into upload payloads.

mod bucket;
mod payload;

use std::path::PathBuf;

pub use bucket::{Bucket, Packer, pack};
pub use payload::read_payload;

/// Error returned when a file alone cannot fit in any bucket.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    #[error("{path} is {size} bytes, over the {limit} byte upload limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },
}

/// Errors produced while building upload payloads.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} changed size since scan: expected {expected} bytes, read {actual}")]
    SizeChanged {
        path: String,
        expected: u64,
        actual: u64,
    },
}
