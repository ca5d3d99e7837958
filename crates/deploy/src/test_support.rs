//! In-memory `AssetStore` for tests.

use std::collections::BTreeSet;
use std::sync::Mutex;

use pagesync_protocol::{
    Deployment, DeploymentRequest, DeploymentTrigger, Fingerprint, ProjectInfo, TriggerMetadata,
    UploadEntry, UploadToken,
};

use crate::error::DeployError;
use crate::manifest::branch_slug;
use crate::store::{AssetStore, StoreFuture};

/// Mock store that keeps the set of known fingerprints and records calls.
pub struct MockStore {
    pub project: ProjectInfo,
    /// Environment reported by created deployments.
    pub environment: String,
    pub known: Mutex<BTreeSet<Fingerprint>>,
    pub check_calls: Mutex<Vec<Vec<Fingerprint>>>,
    pub uploads: Mutex<Vec<Vec<UploadEntry>>>,
    pub upserts: Mutex<Vec<Vec<Fingerprint>>>,
    pub deployments: Mutex<Vec<DeploymentRequest>>,
    /// Upload batches containing this key are rejected.
    pub reject_upload_of: Mutex<Option<Fingerprint>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            project: ProjectInfo {
                name: "site".into(),
                subdomain: "site.pages.dev".into(),
                production_branch: "main".into(),
            },
            environment: "preview".into(),
            known: Mutex::new(BTreeSet::new()),
            check_calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            upserts: Mutex::new(Vec::new()),
            deployments: Mutex::new(Vec::new()),
            reject_upload_of: Mutex::new(None),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: "production".into(),
            ..Self::new()
        }
    }

    pub fn mark_known(&self, fp: &Fingerprint) {
        self.known.lock().unwrap().insert(fp.clone());
    }

    pub fn uploaded_keys(&self) -> Vec<Fingerprint> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .map(|e| e.key.clone())
            .collect()
    }
}

impl AssetStore for MockStore {
    fn project(&self) -> StoreFuture<'_, ProjectInfo> {
        Box::pin(async move { Ok(self.project.clone()) })
    }

    fn upload_token(&self) -> StoreFuture<'_, UploadToken> {
        Box::pin(async move {
            Ok(UploadToken {
                jwt: "mock-jwt".into(),
            })
        })
    }

    fn check_missing<'a>(
        &'a self,
        jwt: &'a str,
        hashes: &'a [Fingerprint],
    ) -> StoreFuture<'a, Vec<Fingerprint>> {
        Box::pin(async move {
            if jwt != "mock-jwt" {
                return Err(DeployError::Remote("API error 401: bad jwt".into()));
            }
            self.check_calls.lock().unwrap().push(hashes.to_vec());
            let known = self.known.lock().unwrap();
            Ok(hashes
                .iter()
                .filter(|h| !known.contains(*h))
                .cloned()
                .collect())
        })
    }

    fn upload<'a>(&'a self, _jwt: &'a str, entries: Vec<UploadEntry>) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let reject = self.reject_upload_of.lock().unwrap().clone();
            if let Some(bad) = reject
                && entries.iter().any(|e| e.key == bad)
            {
                return Err(DeployError::Remote(
                    "API error 413: {\"success\":false}".into(),
                ));
            }
            let mut known = self.known.lock().unwrap();
            for entry in &entries {
                known.insert(entry.key.clone());
            }
            drop(known);
            self.uploads.lock().unwrap().push(entries);
            Ok(())
        })
    }

    fn upsert_hashes<'a>(
        &'a self,
        _jwt: &'a str,
        hashes: &'a [Fingerprint],
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.upserts.lock().unwrap().push(hashes.to_vec());
            self.known.lock().unwrap().extend(hashes.iter().cloned());
            Ok(())
        })
    }

    fn create_deployment<'a>(
        &'a self,
        request: &'a DeploymentRequest,
    ) -> StoreFuture<'a, Deployment> {
        Box::pin(async move {
            let mut deployments = self.deployments.lock().unwrap();
            deployments.push(request.clone());
            let n = deployments.len();

            let slug = branch_slug(&request.branch);
            let aliases = (self.environment != "production")
                .then(|| vec![format!("https://{slug}.site.pages.dev")]);

            Ok(Deployment {
                id: format!("dep-{n}"),
                url: format!("https://{n:08x}.site.pages.dev"),
                environment: self.environment.clone(),
                project_name: self.project.name.clone(),
                aliases,
                created_on: None,
                deployment_trigger: DeploymentTrigger {
                    trigger_type: "ad_hoc".into(),
                    metadata: TriggerMetadata {
                        branch: request.branch.clone(),
                        commit_hash: request.commit_hash.clone(),
                        commit_message: request.commit_message.clone(),
                    },
                },
            })
        })
    }
}
