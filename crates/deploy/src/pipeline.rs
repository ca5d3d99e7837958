//! Deploy pipeline for one output directory.
//!
//! Runs every stage in order, reports progress events, and supports
//! cancellation between stages.

use pagesync_protocol::constants::{HEADERS_FILE, REDIRECTS_FILE};
use pagesync_protocol::{Deployment, DeploymentRequest, ProjectInfo};
use pagesync_transfer::Packer;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::diff::missing_files;
use crate::error::DeployError;
use crate::manifest::{branch_slug, build_manifest, read_control_file};
use crate::store::AssetStore;
use crate::types::{DeployConfig, DeployEvent, DeployOutcome, Stage};
use crate::upload::{register_fingerprints, upload_buckets};

/// Runs deployments against one store.
pub struct DeployPipeline<'a> {
    store: &'a dyn AssetStore,
    packer: Packer,
    events_tx: mpsc::Sender<DeployEvent>,
    events_rx: Option<mpsc::Receiver<DeployEvent>>,
    cancel: CancellationToken,
}

impl<'a> DeployPipeline<'a> {
    /// Creates a pipeline with the default bucket limits.
    pub fn new(store: &'a dyn AssetStore) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            store,
            packer: Packer::default(),
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the packer used for the upload set.
    pub fn with_packer(mut self, packer: Packer) -> Self {
        self.packer = packer;
        self
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<DeployEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this pipeline.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Publishes `config.directory` and returns the created deployment.
    ///
    /// Any stage error aborts the run. Nothing is resumed: a rerun starts
    /// from scratch and skips content the store already holds.
    pub async fn run(&self, config: &DeployConfig) -> Result<DeployOutcome, DeployError> {
        let root = config.directory.as_path();

        // 1. Scan
        self.enter(Stage::Scan)?;
        let files = pagesync_assets::scan_directory(root).await?;
        let bytes: u64 = files.iter().map(|f| f.size).sum();
        self.emit(DeployEvent::Scanned {
            files: files.len(),
            bytes,
        });

        // 2. Project
        self.enter(Stage::Project)?;
        let project = self.store.project().await?;
        debug!(project = %project.name, subdomain = %project.subdomain, "project resolved");

        // 3. Token
        self.enter(Stage::Token)?;
        let token = self.store.upload_token().await?;

        // 4. Diff
        self.enter(Stage::Diff)?;
        let missing = missing_files(self.store, &token.jwt, &files).await?;
        let uploaded_files = missing.len();
        self.emit(DeployEvent::Diffed {
            missing: uploaded_files,
            total: files.len(),
        });

        // 5. Pack
        self.enter(Stage::Pack)?;
        let buckets = self.packer.pack(missing)?;
        self.emit(DeployEvent::Packed {
            buckets: buckets.len(),
        });

        // 6. Upload
        self.enter(Stage::Upload)?;
        upload_buckets(self.store, &token.jwt, &buckets, &self.events_tx).await?;

        // 7. Register
        self.enter(Stage::Register)?;
        let fingerprints = register_fingerprints(self.store, &token.jwt, &files).await?;
        self.emit(DeployEvent::Registered { fingerprints });

        // 8. Submit
        self.enter(Stage::Submit)?;
        let request = DeploymentRequest {
            manifest: build_manifest(&files),
            branch: config.provenance.branch.clone(),
            commit_hash: config.provenance.commit_hash.clone(),
            commit_message: config.provenance.commit_message.clone(),
            redirects: read_control_file(root, REDIRECTS_FILE).await?,
            headers: read_control_file(root, HEADERS_FILE).await?,
        };
        let deployment = self.store.create_deployment(&request).await?;
        self.emit(DeployEvent::Submitted {
            deployment_id: deployment.id.clone(),
        });

        info!(
            deployment = %deployment.id,
            environment = %deployment.environment,
            uploaded = uploaded_files,
            total = files.len(),
            "deployment created"
        );

        Ok(outcome(
            &project,
            &config.provenance.branch,
            deployment,
            uploaded_files,
            files.len(),
        ))
    }

    fn enter(&self, stage: Stage) -> Result<(), DeployError> {
        if self.cancel.is_cancelled() {
            return Err(DeployError::Cancelled);
        }
        info!(stage = %stage, "stage started");
        self.emit(DeployEvent::Stage(stage));
        Ok(())
    }

    // Events are dropped rather than awaited when nobody drains the channel.
    fn emit(&self, event: DeployEvent) {
        let _ = self.events_tx.try_send(event);
    }
}

fn outcome(
    project: &ProjectInfo,
    branch: &str,
    deployment: Deployment,
    uploaded_files: usize,
    total_files: usize,
) -> DeployOutcome {
    let first_alias = deployment
        .aliases
        .as_ref()
        .and_then(|aliases| aliases.first())
        .cloned();
    let alias = match first_alias {
        Some(alias) if !deployment.is_production() => alias,
        _ => deployment.url.clone(),
    };

    let slug = branch_slug(branch);
    let branch_alias = if slug.is_empty() {
        deployment.url.clone()
    } else {
        format!("https://{slug}.{}", project.subdomain)
    };

    DeployOutcome {
        deployment_id: deployment.id,
        url: deployment.url,
        environment: deployment.environment,
        alias,
        branch_alias,
        uploaded_files,
        total_files,
    }
}
