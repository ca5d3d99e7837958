//! Asset sync pipeline for static site deployments.
//!
//! This crate implements the **business logic** of a deployment: it is a
//! library with no transport dependencies. The caller provides an
//! `AssetStore` implementation that bridges to the actual HTTP client.
//!
//! # Pipeline
//!
//! 1. **Scan**: walk the output directory and fingerprint every asset
//! 2. **Diff**: ask the store which fingerprints it is missing
//! 3. **Pack**: group missing files into size-bounded buckets
//! 4. **Upload**: send all buckets concurrently
//! 5. **Register**: mark the full fingerprint set as known
//! 6. **Submit**: create the deployment from the manifest

pub mod diff;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export primary types for convenience.
pub use diff::missing_files;
pub use error::DeployError;
pub use manifest::{Manifest, branch_slug, build_manifest, read_control_file};
pub use pipeline::DeployPipeline;
pub use store::{AssetStore, StoreFuture};
pub use types::{DeployConfig, DeployEvent, DeployOutcome, GitProvenance, Stage};
pub use upload::{register_fingerprints, upload_buckets};
