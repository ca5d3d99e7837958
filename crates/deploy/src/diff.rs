//! Remote diff: which scanned files the store does not hold yet.

use std::collections::{BTreeSet, HashSet};

use pagesync_assets::FileRecord;
use pagesync_protocol::Fingerprint;
use tracing::debug;

use crate::error::DeployError;
use crate::store::AssetStore;

/// Returns the files that must be uploaded this run.
///
/// Fingerprints are queried once each and in sorted order. Files sharing a
/// fingerprint share a storage slot, so only the first of them is returned.
/// An empty tree makes no remote call.
pub async fn missing_files(
    store: &dyn AssetStore,
    jwt: &str,
    files: &[FileRecord],
) -> Result<Vec<FileRecord>, DeployError> {
    let unique: BTreeSet<&Fingerprint> = files.iter().map(|f| &f.fingerprint).collect();
    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let hashes: Vec<Fingerprint> = unique.into_iter().cloned().collect();
    let missing: HashSet<Fingerprint> = store
        .check_missing(jwt, &hashes)
        .await?
        .into_iter()
        .collect();

    let mut taken = HashSet::new();
    let to_upload: Vec<FileRecord> = files
        .iter()
        .filter(|f| missing.contains(&f.fingerprint) && taken.insert(&f.fingerprint))
        .cloned()
        .collect();

    debug!(
        unique = hashes.len(),
        missing = to_upload.len(),
        "remote diff complete"
    );
    Ok(to_upload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockStore;
    use pagesync_assets::fingerprint_bytes;
    use std::path::PathBuf;

    fn record(path: &str, content: &[u8]) -> FileRecord {
        FileRecord {
            absolute_path: PathBuf::from(format!("/dist{path}")),
            public_path: path.to_string(),
            size: content.len() as u64,
            content_type: "text/plain".into(),
            fingerprint: fingerprint_bytes(content, "txt"),
        }
    }

    #[tokio::test]
    async fn returns_only_unknown_files() {
        let store = MockStore::new();
        let files = vec![record("/a.txt", b"a"), record("/b.txt", b"b"), record("/c.txt", b"c")];
        store.mark_known(&files[1].fingerprint);

        let missing = missing_files(&store, "mock-jwt", &files).await.unwrap();
        let paths: Vec<&str> = missing.iter().map(|f| f.public_path.as_str()).collect();
        assert_eq!(paths, vec!["/a.txt", "/c.txt"]);
    }

    #[tokio::test]
    async fn empty_tree_makes_no_call() {
        let store = MockStore::new();
        let missing = missing_files(&store, "mock-jwt", &[]).await.unwrap();
        assert!(missing.is_empty());
        assert!(store.check_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_content_queried_and_uploaded_once() {
        let store = MockStore::new();
        let files = vec![record("/x/one.txt", b"same"), record("/y/two.txt", b"same")];

        let missing = missing_files(&store, "mock-jwt", &files).await.unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].public_path, "/x/one.txt");
        assert_eq!(store.check_calls.lock().unwrap()[0].len(), 1);
    }

    #[tokio::test]
    async fn everything_known_means_nothing_to_upload() {
        let store = MockStore::new();
        let files = vec![record("/a.txt", b"a"), record("/b.txt", b"b")];
        for f in &files {
            store.mark_known(&f.fingerprint);
        }

        let missing = missing_files(&store, "mock-jwt", &files).await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn store_error_propagates() {
        let store = MockStore::new();
        let files = vec![record("/a.txt", b"a")];
        let err = missing_files(&store, "wrong-jwt", &files).await.unwrap_err();
        assert!(matches!(err, DeployError::Remote(_)));
    }
}
