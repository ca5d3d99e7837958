//! Local asset tree: scanning, fingerprints and content types.
//!
//! The scanner walks a build output directory and yields one
//! [`FileRecord`] per servable file. Fingerprints depend only on file
//! bytes and extension, so identical assets collapse onto one storage
//! slot no matter where they live in the tree.

pub mod content_type;
pub mod error;
pub mod hash;
pub mod scanner;
pub mod types;

// Re-export primary types for convenience.
pub use content_type::detect_content_type;
pub use error::AssetError;
pub use hash::{fingerprint_bytes, fingerprint_file};
pub use scanner::{is_reserved, public_path, scan_directory};
pub use types::FileRecord;
