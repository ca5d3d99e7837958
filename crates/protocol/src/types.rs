use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FINGERPRINT_HEX_LEN;

/// Content-derived storage key of an asset: 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

/// Rejected fingerprint text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid fingerprint: {0:?}")]
pub struct InvalidFingerprint(pub String);

impl Fingerprint {
    /// Encodes a 16-byte digest.
    pub fn from_digest(digest: &[u8; 16]) -> Self {
        Self(hex::encode(digest))
    }

    /// Parses hex text as returned by the store.
    pub fn parse(s: &str) -> Result<Self, InvalidFingerprint> {
        let valid = s.len() == FINGERPRINT_HEX_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidFingerprint(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Project record returned by `GET project info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    /// Served hostname of the production deployment, e.g. `site.pages.dev`.
    pub subdomain: String,
    #[serde(default = "default_production_branch")]
    pub production_branch: String,
}

fn default_production_branch() -> String {
    "main".into()
}

/// Git provenance recorded on a deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub branch: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit_hash: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub commit_message: String,
}

/// What created a deployment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentTrigger {
    #[serde(rename = "type", default)]
    pub trigger_type: String,
    #[serde(default)]
    pub metadata: TriggerMetadata,
}

/// Deployment record returned by `create-deployment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_name: String,
    /// Branch aliases; `null` for production deployments.
    #[serde(default)]
    pub aliases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deployment_trigger: DeploymentTrigger,
}

impl Deployment {
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
