use pagesync_assets::FileRecord;
use pagesync_protocol::Fingerprint;
use pagesync_protocol::constants::{INITIAL_BUCKET_COUNT, MAX_BUCKET_BYTES, MAX_BUCKET_ITEMS};
use tracing::debug;

use crate::PackError;

/// Files grouped for one upload request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    pub files: Vec<FileRecord>,
    /// Sum of `files[..].size`.
    pub size: u64,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn fingerprints(&self) -> impl Iterator<Item = &Fingerprint> {
        self.files.iter().map(|f| &f.fingerprint)
    }

    fn push(&mut self, file: FileRecord) {
        self.size += file.size;
        self.files.push(file);
    }
}

/// First-fit bucket packer with a rotating start offset.
#[derive(Debug, Clone, Copy)]
pub struct Packer {
    max_bytes: u64,
    max_items: usize,
    initial_buckets: usize,
}

impl Default for Packer {
    fn default() -> Self {
        Self {
            max_bytes: MAX_BUCKET_BYTES,
            max_items: MAX_BUCKET_ITEMS,
            initial_buckets: INITIAL_BUCKET_COUNT,
        }
    }
}

impl Packer {
    /// Creates a packer with custom limits. `max_items` is at least 1.
    pub fn with_limits(max_bytes: u64, max_items: usize, initial_buckets: usize) -> Self {
        Self {
            max_bytes,
            max_items: max_items.max(1),
            initial_buckets,
        }
    }

    fn accepts(&self, bucket: &Bucket, file: &FileRecord) -> bool {
        bucket.size + file.size <= self.max_bytes && bucket.files.len() < self.max_items
    }

    /// Partitions `files` into buckets within both caps; empty buckets are dropped.
    ///
    /// Fails with [`PackError::FileTooLarge`] before placing anything when a
    /// single file exceeds the byte cap.
    pub fn pack(&self, mut files: Vec<FileRecord>) -> Result<Vec<Bucket>, PackError> {
        if let Some(file) = files.iter().find(|f| f.size > self.max_bytes) {
            return Err(PackError::FileTooLarge {
                path: file.public_path.clone(),
                size: file.size,
                limit: self.max_bytes,
            });
        }

        // Largest first; the path tie-break keeps the output stable.
        files.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then_with(|| a.public_path.cmp(&b.public_path))
        });

        let mut buckets: Vec<Bucket> = (0..self.initial_buckets)
            .map(|_| Bucket::default())
            .collect();

        // The search for a bucket starts one slot further on for every file
        // placed. Starting at 0 each time would stack the largest files into
        // the first bucket while it still has room and leave the others
        // nearly empty, serializing most bytes into a single request. With
        // the rotation, consecutive large files land in different buckets.
        // The probe is still first-fit: from `offset`, wrapping around, take
        // the first bucket that passes both caps.
        let mut offset = 0usize;
        for file in files {
            let count = buckets.len();
            let slot = (0..count)
                .map(|i| (i + offset) % count)
                .find(|&i| self.accepts(&buckets[i], &file));

            match slot {
                Some(i) => buckets[i].push(file),
                None => {
                    let mut bucket = Bucket::default();
                    bucket.push(file);
                    buckets.push(bucket);
                }
            }
            offset += 1;
        }

        buckets.retain(|b| !b.is_empty());
        debug!(buckets = buckets.len(), "packing complete");
        Ok(buckets)
    }
}

/// Packs with the store's default limits.
pub fn pack(files: Vec<FileRecord>) -> Result<Vec<Bucket>, PackError> {
    Packer::default().pack(files)
}
