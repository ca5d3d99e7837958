//! Remote store seam.
//!
//! `AssetStore` is implemented by the binary on top of the HTTP client.
//! Using a trait keeps the pipeline decoupled from transport and testable
//! with mocks.

use std::future::Future;
use std::pin::Pin;

use pagesync_protocol::{
    Deployment, DeploymentRequest, Fingerprint, ProjectInfo, UploadEntry, UploadToken,
};

use crate::error::DeployError;

/// Boxed future returned by every store call.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, DeployError>> + Send + 'a>>;

/// Abstract connection to the remote content-addressed store.
///
/// Every call is a single request/response; failures are fatal to the run.
pub trait AssetStore: Send + Sync {
    /// `GET project info`.
    fn project(&self) -> StoreFuture<'_, ProjectInfo>;

    /// `GET upload credential`.
    fn upload_token(&self) -> StoreFuture<'_, UploadToken>;

    /// `POST check-missing`: the subset of `hashes` not stored yet.
    fn check_missing<'a>(
        &'a self,
        jwt: &'a str,
        hashes: &'a [Fingerprint],
    ) -> StoreFuture<'a, Vec<Fingerprint>>;

    /// `POST upload`: stores one batch.
    fn upload<'a>(&'a self, jwt: &'a str, entries: Vec<UploadEntry>) -> StoreFuture<'a, ()>;

    /// `POST upsert-known`: registers `hashes` as present.
    fn upsert_hashes<'a>(
        &'a self,
        jwt: &'a str,
        hashes: &'a [Fingerprint],
    ) -> StoreFuture<'a, ()>;

    /// `POST create-deployment`.
    fn create_deployment<'a>(
        &'a self,
        request: &'a DeploymentRequest,
    ) -> StoreFuture<'a, Deployment>;
}
