//! Asset error types.

use std::path::{Path, PathBuf};

/// Errors produced while scanning or hashing the asset tree.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("path escapes scan root: {}", .0.display())]
    OutsideRoot(PathBuf),

    #[error("hashing task failed: {0}")]
    Task(String),
}

impl AssetError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
