//! Wire protocol types for the pagesync asset store API.
//!
//! Every response from the store is wrapped in an [`ApiResponse`] envelope;
//! request bodies and result payloads live in [`messages`] and [`types`].

pub mod constants;
pub mod envelope;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use envelope::{ApiMessage, ApiResponse, EnvelopeError};
pub use messages::{DeploymentRequest, HashesRequest, UploadEntry, UploadMetadata, UploadToken};
pub use types::{
    Deployment, DeploymentTrigger, Fingerprint, InvalidFingerprint, ProjectInfo, TriggerMetadata,
};
