//! Content fingerprints.
//!
//! `fingerprint = hex(blake3(base64(bytes) ++ extension)[..16])`. The
//! extension is part of the hashed material because the store resolves
//! content types from the same key it deduplicates on.

use std::io::{self, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderWriter;
use base64::Engine;
use pagesync_protocol::Fingerprint;

use crate::error::AssetError;

/// Fingerprints in-memory content.
pub fn fingerprint_bytes(content: &[u8], extension: &str) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(STANDARD.encode(content).as_bytes());
    hasher.update(extension.as_bytes());
    truncate(&hasher)
}

/// Fingerprints a file, streaming its base64 form through the hasher.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, AssetError> {
    let mut file = std::fs::File::open(path).map_err(|e| AssetError::io(path, e))?;
    let mut hasher = blake3::Hasher::new();

    {
        let mut encoder = EncoderWriter::new(&mut hasher, &STANDARD);
        io::copy(&mut file, &mut encoder).map_err(|e| AssetError::io(path, e))?;
        encoder.finish().map_err(|e| AssetError::io(path, e))?;
    }

    hasher
        .write_all(extension_of(path).as_bytes())
        .map_err(|e| AssetError::io(path, e))?;
    Ok(truncate(&hasher))
}

/// Extension without the dot, as written; empty when there is none.
pub fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

fn truncate(hasher: &blake3::Hasher) -> Fingerprint {
    let hash = hasher.finalize();
    let mut digest = [0u8; 16];
    digest.copy_from_slice(&hash.as_bytes()[..16]);
    Fingerprint::from_digest(&digest)
}
