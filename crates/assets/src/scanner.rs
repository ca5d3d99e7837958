//! Asset tree scanning.
//!
//! Recursively walks a directory, skips reserved control files at any
//! depth, and fingerprints the remaining files concurrently.

use std::path::{Component, Path, PathBuf};

use futures_util::{StreamExt, TryStreamExt, stream};
use pagesync_protocol::constants::{HASH_CONCURRENCY, RESERVED_FILE_NAMES};
use tracing::debug;

use crate::content_type::detect_content_type;
use crate::error::AssetError;
use crate::hash::fingerprint_file;
use crate::types::FileRecord;

/// A file found by the walk, not yet hashed.
#[derive(Debug)]
struct FoundFile {
    absolute_path: PathBuf,
    public_path: String,
    size: u64,
}

impl FoundFile {
    fn into_record(self) -> Result<FileRecord, AssetError> {
        let fingerprint = fingerprint_file(&self.absolute_path)?;
        Ok(FileRecord {
            content_type: detect_content_type(&self.absolute_path).to_string(),
            absolute_path: self.absolute_path,
            public_path: self.public_path,
            size: self.size,
            fingerprint,
        })
    }
}

/// Scans `root` and returns one record per servable file, sorted by public path.
///
/// Any unreadable directory or file fails the whole scan.
pub async fn scan_directory(root: &Path) -> Result<Vec<FileRecord>, AssetError> {
    let root_buf = root.to_path_buf();
    let found = tokio::task::spawn_blocking(move || {
        let mut found = Vec::new();
        walk_dir(&root_buf, &root_buf, &mut found)?;
        Ok::<_, AssetError>(found)
    })
    .await
    .map_err(|e| AssetError::Task(e.to_string()))??;

    debug!(root = %root.display(), files = found.len(), "walk complete");

    let mut records: Vec<FileRecord> = stream::iter(found)
        .map(|file| async move {
            tokio::task::spawn_blocking(move || file.into_record())
                .await
                .map_err(|e| AssetError::Task(e.to_string()))?
        })
        .buffer_unordered(HASH_CONCURRENCY)
        .try_collect()
        .await?;

    records.sort_by(|a, b| a.public_path.cmp(&b.public_path));
    Ok(records)
}

/// Whether a file name carries platform semantics and is never an asset.
pub fn is_reserved(file_name: &str) -> bool {
    RESERVED_FILE_NAMES.contains(&file_name)
}

/// Builds the served path of `path` relative to `root`.
pub fn public_path(root: &Path, path: &Path) -> Result<String, AssetError> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| AssetError::OutsideRoot(path.to_path_buf()))?;

    let mut out = String::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| AssetError::NonUtf8Path(path.to_path_buf()))?;
                out.push('/');
                out.push_str(part);
            }
            Component::CurDir => {}
            _ => return Err(AssetError::OutsideRoot(path.to_path_buf())),
        }
    }
    Ok(out)
}

fn walk_dir(root: &Path, current: &Path, files: &mut Vec<FoundFile>) -> Result<(), AssetError> {
    let entries = std::fs::read_dir(current).map_err(|e| AssetError::io(current, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| AssetError::io(current, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| AssetError::io(&path, e))?;

        if file_type.is_dir() {
            walk_dir(root, &path, files)?;
            continue;
        }

        // Reserved names are skipped before a link is resolved, so a
        // dangling `_worker.js` link is not an error.
        if entry.file_name().to_str().is_some_and(is_reserved) {
            debug!(path = %path.display(), "skipping reserved file");
            continue;
        }

        // Symlinks count only when they resolve to a regular file; linked
        // directories are not descended into.
        let metadata = if file_type.is_symlink() {
            std::fs::metadata(&path).map_err(|e| AssetError::io(&path, e))?
        } else {
            entry.metadata().map_err(|e| AssetError::io(&path, e))?
        };
        if !metadata.is_file() {
            continue;
        }

        files.push(FoundFile {
            public_path: public_path(root, &path)?,
            size: metadata.len(),
            absolute_path: path,
        });
    }

    Ok(())
}
