use pagesync_protocol::UploadEntry;

use crate::TransferError;
use crate::bucket::Bucket;

/// Reads every file of `bucket` into an upload entry keyed by fingerprint.
///
/// A file whose length differs from the scanned size fails the batch: its
/// fingerprint no longer describes what would be stored.
pub async fn read_payload(bucket: &Bucket) -> Result<Vec<UploadEntry>, TransferError> {
    let mut entries = Vec::with_capacity(bucket.len());

    for file in &bucket.files {
        let data = tokio::fs::read(&file.absolute_path)
            .await
            .map_err(|source| TransferError::Io {
                path: file.absolute_path.clone(),
                source,
            })?;

        if data.len() as u64 != file.size {
            return Err(TransferError::SizeChanged {
                path: file.public_path.clone(),
                expected: file.size,
                actual: data.len() as u64,
            });
        }

        entries.push(UploadEntry::new(
            file.fingerprint.clone(),
            data,
            file.content_type.as_str(),
        ));
    }

    Ok(entries)
}
