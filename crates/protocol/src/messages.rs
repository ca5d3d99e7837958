use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Fingerprint;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body of `check-missing` and `upsert-hashes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashesRequest {
    pub hashes: Vec<Fingerprint>,
}

/// Per-asset metadata sent with an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub content_type: String,
}

/// One stored asset inside an upload batch.
///
/// The `value` field is base64-encoded in JSON; `base64` tells the store so.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEntry {
    pub key: Fingerprint,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
    pub metadata: UploadMetadata,
    pub base64: bool,
}

impl UploadEntry {
    pub fn new(key: Fingerprint, value: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            key,
            value,
            metadata: UploadMetadata {
                content_type: content_type.into(),
            },
            base64: true,
        }
    }
}

/// Everything submitted to `create-deployment`.
///
/// Sent as a multipart form: the manifest as a JSON string field, the git
/// provenance as plain fields, and the control files as file parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Public path to fingerprint, for every file of the deployment.
    pub manifest: BTreeMap<String, Fingerprint>,
    pub branch: String,
    pub commit_hash: String,
    pub commit_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
}

impl DeploymentRequest {
    /// Serializes the manifest field; keys are sorted, so equal manifests
    /// produce identical text.
    pub fn manifest_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.manifest)
    }
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Short-lived credential for the asset endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadToken {
    pub jwt: String,
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        STANDARD.encode(data).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
