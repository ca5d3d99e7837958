//! Deployment manifest and control files.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use pagesync_assets::FileRecord;
use pagesync_protocol::Fingerprint;
use tracing::debug;

use crate::error::DeployError;

/// Public path to fingerprint, ordered so the serialized form is stable.
pub type Manifest = BTreeMap<String, Fingerprint>;

/// Maximum length of a branch slug in a hostname label.
const MAX_SLUG_LEN: usize = 28;

/// Builds the manifest for every scanned file.
pub fn build_manifest(files: &[FileRecord]) -> Manifest {
    files
        .iter()
        .map(|f| (f.public_path.clone(), f.fingerprint.clone()))
        .collect()
}

/// Reads a control file (`_redirects`, `_headers`) from the root of the
/// output directory.
///
/// Returns `None` when the file is absent or is not a regular file.
pub async fn read_control_file(root: &Path, name: &str) -> Result<Option<String>, DeployError> {
    let path = root.join(name);

    let meta = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if !meta.is_file() {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(&path).await?;
    debug!(file = name, bytes = content.len(), "control file attached");
    Ok(Some(content))
}

/// Hostname label for a branch: lowercase, every non-alphanumeric replaced
/// by `-`, at most 28 characters, no leading or trailing `-`.
pub fn branch_slug(branch: &str) -> String {
    let slug: String = branch
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect();
    slug.trim_matches('-').to_string()
}
