//! CLI configuration.
//!
//! Values come from, in order of precedence: command-line flags, their
//! `PAGESYNC_*` environment variables, then the TOML config file
//! (`--config`, or `pagesync.toml` in the working directory). The API token
//! is never read from the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use serde::{Deserialize, Serialize};

use pagesync_deploy::{DeployConfig, GitProvenance};
use pagesync_protocol::constants::DEFAULT_BASE_URL;
use pagesync_store_client::ClientConfig;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "pagesync.toml";

/// `pagesync deploy` flags.
#[derive(Args, Debug, Default)]
pub struct DeployArgs {
    /// Build output directory to publish
    #[arg(long, env = "PAGESYNC_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Account that owns the project
    #[arg(long, env = "PAGESYNC_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Project to deploy to
    #[arg(long, env = "PAGESYNC_PROJECT_NAME")]
    pub project_name: Option<String>,

    /// Branch recorded on the deployment
    #[arg(long, env = "PAGESYNC_BRANCH")]
    pub branch: Option<String>,

    /// Commit hash recorded on the deployment
    #[arg(long, env = "PAGESYNC_COMMIT_HASH")]
    pub commit_hash: Option<String>,

    /// Commit message recorded on the deployment
    #[arg(long, env = "PAGESYNC_COMMIT_MESSAGE")]
    pub commit_message: Option<String>,

    /// API token
    #[arg(long, env = "PAGESYNC_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Config file path
    #[arg(long, env = "PAGESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// On-disk config format. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub branch: Option<String>,
}

impl FileConfig {
    /// Loads the config file.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.is_file() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub deploy: DeployConfig,
}

impl Settings {
    /// Merges flags over the file config and checks required values.
    pub fn resolve(args: &DeployArgs, file: FileConfig) -> anyhow::Result<Self> {
        let Some(api_token) = args.api_token.clone().filter(|t| !t.is_empty()) else {
            bail!("missing API token: set PAGESYNC_API_TOKEN");
        };
        let account_id = required(args.account_id.clone(), file.account_id, "--account-id")?;
        let project_name = required(
            args.project_name.clone(),
            file.project_name,
            "--project-name",
        )?;
        let branch = required(args.branch.clone(), file.branch, "--branch")?;
        let Some(directory) = args.directory.clone().or(file.directory) else {
            bail!("missing --directory");
        };

        let client = ClientConfig {
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_token,
            account_id,
            project_name,
            user_agent: file.user_agent.unwrap_or_else(default_user_agent),
        };

        let deploy = DeployConfig {
            directory,
            provenance: GitProvenance {
                branch,
                commit_hash: args.commit_hash.clone().unwrap_or_default(),
                commit_message: args.commit_message.clone().unwrap_or_default(),
            },
        };

        Ok(Self { client, deploy })
    }
}

fn required(flag: Option<String>, file: Option<String>, name: &str) -> anyhow::Result<String> {
    match flag.or(file).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value),
        None => bail!("missing {name}"),
    }
}

fn default_user_agent() -> String {
    format!("pagesync/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_args() -> DeployArgs {
        DeployArgs {
            directory: Some(PathBuf::from("dist")),
            account_id: Some("acc".into()),
            project_name: Some("site".into()),
            branch: Some("main".into()),
            commit_hash: Some("abc123".into()),
            commit_message: Some("Update".into()),
            api_token: Some("token".into()),
            ..Default::default()
        }
    }

    #[test]
    fn flags_only() {
        let settings = Settings::resolve(&full_args(), FileConfig::default()).unwrap();
        assert_eq!(settings.client.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.client.account_id, "acc");
        assert!(settings.client.user_agent.starts_with("pagesync/"));
        assert_eq!(settings.deploy.directory, PathBuf::from("dist"));
        assert_eq!(settings.deploy.provenance.commit_hash, "abc123");
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig {
            account_id: Some("file-acc".into()),
            project_name: Some("file-site".into()),
            directory: Some(PathBuf::from("public")),
            ..Default::default()
        };
        let settings = Settings::resolve(&full_args(), file).unwrap();
        assert_eq!(settings.client.account_id, "acc");
        assert_eq!(settings.client.project_name, "site");
        assert_eq!(settings.deploy.directory, PathBuf::from("dist"));
    }

    #[test]
    fn file_fills_missing_flags() {
        let args = DeployArgs {
            api_token: Some("token".into()),
            ..Default::default()
        };
        let file: FileConfig = toml::from_str(
            r#"
            base_url = "http://localhost:8787"
            user_agent = "ci-bot/1.0"
            account_id = "acc"
            project_name = "site"
            directory = "out"
            branch = "preview"
            "#,
        )
        .unwrap();

        let settings = Settings::resolve(&args, file).unwrap();
        assert_eq!(settings.client.base_url, "http://localhost:8787");
        assert_eq!(settings.client.user_agent, "ci-bot/1.0");
        assert_eq!(settings.deploy.provenance.branch, "preview");
        assert!(settings.deploy.provenance.commit_message.is_empty());
    }

    #[test]
    fn missing_token_is_rejected() {
        let args = DeployArgs {
            api_token: None,
            ..full_args()
        };
        let err = Settings::resolve(&args, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("PAGESYNC_API_TOKEN"));
    }

    #[test]
    fn missing_required_value_names_the_flag() {
        let args = DeployArgs {
            project_name: Some(String::new()),
            ..full_args()
        };
        let err = Settings::resolve(&args, FileConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing --project-name");
    }

    #[test]
    fn empty_file_parses() {
        let file: FileConfig = toml::from_str("").unwrap();
        assert_eq!(file, FileConfig::default());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy.toml");
        std::fs::write(&path, "project_name = \"docs\"\n").unwrap();

        let file = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(file.project_name.as_deref(), Some("docs"));
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn unknown_value_type_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "branch = 5\n").unwrap();
        assert!(FileConfig::load(Some(&path)).is_err());
    }
}
