//! Data types for the deploy flow.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Git metadata recorded on the deployment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitProvenance {
    pub branch: String,
    pub commit_hash: String,
    pub commit_message: String,
}

/// Input of one pipeline run.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Build output directory to publish.
    pub directory: PathBuf,
    pub provenance: GitProvenance,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Scan,
    Project,
    Token,
    Diff,
    Pack,
    Upload,
    Register,
    Submit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Scan => "scan",
            Stage::Project => "project",
            Stage::Token => "token",
            Stage::Diff => "diff",
            Stage::Pack => "pack",
            Stage::Upload => "upload",
            Stage::Register => "register",
            Stage::Submit => "submit",
        };
        f.write_str(name)
    }
}

/// Progress event emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// A stage started.
    Stage(Stage),
    /// Local tree scanned.
    Scanned { files: usize, bytes: u64 },
    /// Remote diff finished; `missing` files need uploading.
    Diffed { missing: usize, total: usize },
    /// Upload set packed.
    Packed { buckets: usize },
    /// One bucket stored.
    BucketUploaded {
        index: usize,
        files: usize,
        bytes: u64,
    },
    /// Fingerprints registered as known.
    Registered { fingerprints: usize },
    /// Deployment created.
    Submitted { deployment_id: String },
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployOutcome {
    pub deployment_id: String,
    pub url: String,
    pub environment: String,
    /// First branch alias for previews, the deployment URL otherwise.
    pub alias: String,
    /// Stable hostname of the branch: `https://<branch-slug>.<subdomain>`.
    pub branch_alias: String,
    pub uploaded_files: usize,
    pub total_files: usize,
}
