use std::path::PathBuf;

use pagesync_protocol::Fingerprint;

/// One servable file of the scanned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Location on the local filesystem.
    pub absolute_path: PathBuf,
    /// Identity in the served tree: leading `/`, forward slashes.
    pub public_path: String,
    pub size: u64,
    pub content_type: String,
    pub fingerprint: Fingerprint,
}
