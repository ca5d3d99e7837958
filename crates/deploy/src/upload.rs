//! Concurrent batch upload and fingerprint registration.

use std::collections::BTreeSet;

use futures_util::future::join_all;
use pagesync_assets::FileRecord;
use pagesync_protocol::Fingerprint;
use pagesync_transfer::{Bucket, read_payload};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::DeployError;
use crate::store::AssetStore;
use crate::types::DeployEvent;

/// Uploads every non-empty bucket concurrently and waits for all of them.
///
/// Buckets are independent: one failing does not stop the others. Any
/// failure fails the call, but batches that succeeded stay stored; a rerun
/// skips them through the remote diff.
pub async fn upload_buckets(
    store: &dyn AssetStore,
    jwt: &str,
    buckets: &[Bucket],
    events_tx: &mpsc::Sender<DeployEvent>,
) -> Result<(), DeployError> {
    let uploads = buckets
        .iter()
        .enumerate()
        .filter(|(_, bucket)| !bucket.is_empty())
        .map(|(index, bucket)| async move {
            let entries = read_payload(bucket).await?;
            store.upload(jwt, entries).await?;

            debug!(
                bucket = index,
                files = bucket.len(),
                bytes = bucket.size,
                "bucket uploaded"
            );
            let _ = events_tx.try_send(DeployEvent::BucketUploaded {
                index,
                files: bucket.len(),
                bytes: bucket.size,
            });
            Ok::<_, DeployError>(())
        });

    let results = join_all(uploads).await;
    let total = results.len();

    let mut failures: Vec<DeployError> = results.into_iter().filter_map(Result::err).collect();
    if failures.is_empty() {
        info!(batches = total, "all batches uploaded");
        return Ok(());
    }

    for e in &failures {
        error!(error = %e, "batch upload failed");
    }

    Err(DeployError::BatchesFailed {
        failed: failures.len(),
        total,
        first: Box::new(failures.swap_remove(0)),
    })
}

/// Registers the fingerprints of every scanned file as known.
///
/// Covers files that were already stored before this run as well; the
/// store treats re-registration as a no-op. Returns the number registered.
pub async fn register_fingerprints(
    store: &dyn AssetStore,
    jwt: &str,
    files: &[FileRecord],
) -> Result<usize, DeployError> {
    let hashes: Vec<Fingerprint> = files
        .iter()
        .map(|f| f.fingerprint.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if hashes.is_empty() {
        return Ok(0);
    }

    store.upsert_hashes(jwt, &hashes).await?;
    Ok(hashes.len())
}
