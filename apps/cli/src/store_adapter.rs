//! Adapter bridging the HTTP [`Client`] to the `AssetStore` trait required
//! by `pagesync-deploy`.

use pagesync_deploy::{AssetStore, DeployError, StoreFuture};
use pagesync_protocol::{
    Deployment, DeploymentRequest, Fingerprint, ProjectInfo, UploadEntry, UploadToken,
};
use pagesync_store_client::{Client, Error};

/// Implements `AssetStore` by delegating to the store client.
pub struct RemoteStore {
    client: Client,
}

impl RemoteStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn remote(e: Error) -> DeployError {
    DeployError::Remote(e.to_string())
}

impl AssetStore for RemoteStore {
    fn project(&self) -> StoreFuture<'_, ProjectInfo> {
        Box::pin(async move { self.client.project().await.map_err(remote) })
    }

    fn upload_token(&self) -> StoreFuture<'_, UploadToken> {
        Box::pin(async move { self.client.upload_token().await.map_err(remote) })
    }

    fn check_missing<'a>(
        &'a self,
        jwt: &'a str,
        hashes: &'a [Fingerprint],
    ) -> StoreFuture<'a, Vec<Fingerprint>> {
        Box::pin(async move { self.client.check_missing(jwt, hashes).await.map_err(remote) })
    }

    fn upload<'a>(&'a self, jwt: &'a str, entries: Vec<UploadEntry>) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.client.upload(jwt, &entries).await.map_err(remote) })
    }

    fn upsert_hashes<'a>(
        &'a self,
        jwt: &'a str,
        hashes: &'a [Fingerprint],
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move { self.client.upsert_hashes(jwt, hashes).await.map_err(remote) })
    }

    fn create_deployment<'a>(
        &'a self,
        request: &'a DeploymentRequest,
    ) -> StoreFuture<'a, Deployment> {
        Box::pin(async move { self.client.create_deployment(request).await.map_err(remote) })
    }
}
