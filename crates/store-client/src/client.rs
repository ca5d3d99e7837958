//! Remote asset store client.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use pagesync_protocol::constants::{DEFAULT_BASE_URL, HEADERS_FILE, REDIRECTS_FILE};
use pagesync_protocol::{
    ApiResponse, Deployment, DeploymentRequest, EnvelopeError, Fingerprint, HashesRequest,
    ProjectInfo, UploadEntry, UploadToken,
};

/// Characters escaped in account and project path segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Errors from the store client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("invalid client config: {0}")]
    InvalidConfig(String),
}

/// Connection settings, fixed for the lifetime of a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: String,
    pub account_id: String,
    pub project_name: String,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
}

impl ClientConfig {
    /// Config against the default API root.
    pub fn new(
        api_token: impl Into<String>,
        account_id: impl Into<String>,
        project_name: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
            account_id: account_id.into(),
            project_name: project_name.into(),
            user_agent: user_agent.into(),
        }
    }
}

/// Remote asset store client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    project_path: String,
}

impl Client {
    /// Creates a new client.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if config.api_token.is_empty() {
            return Err(Error::InvalidConfig("API token is empty".into()));
        }
        if config.account_id.is_empty() || config.project_name.is_empty() {
            return Err(Error::InvalidConfig(
                "account id and project name are required".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        let project_path = format!(
            "/accounts/{}/pages/projects/{}",
            utf8_percent_encode(&config.account_id, PATH_SEGMENT),
            utf8_percent_encode(&config.project_name, PATH_SEGMENT),
        );

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
            project_path,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends a request and decodes the response envelope.
    ///
    /// Non-2xx responses become [`Error::Api`] carrying the body verbatim;
    /// a body that cannot be read fails as [`Error::Http`].
    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<T>, Error> {
        let resp = req.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await?;
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches the project record.
    pub async fn project(&self) -> Result<ProjectInfo, Error> {
        let req = self
            .http
            .get(self.url(&self.project_path))
            .bearer_auth(&self.api_token);
        Ok(self.send::<ProjectInfo>(req).await?.into_result()?)
    }

    /// Fetches a JWT for the asset endpoints.
    pub async fn upload_token(&self) -> Result<UploadToken, Error> {
        let req = self
            .http
            .get(self.url(&format!("{}/upload-token", self.project_path)))
            .bearer_auth(&self.api_token);
        Ok(self.send::<UploadToken>(req).await?.into_result()?)
    }

    /// Returns the subset of `hashes` the store does not hold yet.
    ///
    /// An empty query is answered locally.
    pub async fn check_missing(
        &self,
        jwt: &str,
        hashes: &[Fingerprint],
    ) -> Result<Vec<Fingerprint>, Error> {
        if hashes.is_empty() {
            return Ok(Vec::new());
        }

        let body = HashesRequest {
            hashes: hashes.to_vec(),
        };
        let req = self
            .http
            .post(self.url("/pages/assets/check-missing"))
            .bearer_auth(jwt)
            .json(&body);
        let missing = self.send::<Vec<Fingerprint>>(req).await?.into_result()?;

        debug!(queried = hashes.len(), missing = missing.len(), "check-missing");
        Ok(missing)
    }

    /// Uploads one batch of assets.
    pub async fn upload(&self, jwt: &str, entries: &[UploadEntry]) -> Result<(), Error> {
        let req = self
            .http
            .post(self.url("/pages/assets/upload"))
            .bearer_auth(jwt)
            .json(entries);
        self.send::<serde_json::Value>(req).await?.into_unit()?;
        Ok(())
    }

    /// Marks `hashes` as known to the store.
    pub async fn upsert_hashes(&self, jwt: &str, hashes: &[Fingerprint]) -> Result<(), Error> {
        let body = HashesRequest {
            hashes: hashes.to_vec(),
        };
        let req = self
            .http
            .post(self.url("/pages/assets/upsert-hashes"))
            .bearer_auth(jwt)
            .json(&body);
        self.send::<serde_json::Value>(req).await?.into_unit()?;
        Ok(())
    }

    /// Creates a deployment from a manifest.
    pub async fn create_deployment(&self, request: &DeploymentRequest) -> Result<Deployment, Error> {
        let form = build_form(request)?;
        let req = self
            .http
            .post(self.url(&format!("{}/deployments", self.project_path)))
            .bearer_auth(&self.api_token)
            .multipart(form);
        Ok(self.send::<Deployment>(req).await?.into_result()?)
    }
}

/// Builds the multipart body of `create-deployment`.
fn build_form(request: &DeploymentRequest) -> Result<Form, Error> {
    let mut form = Form::new()
        .text("manifest", request.manifest_json()?)
        .text("branch", request.branch.clone())
        .text("commit_hash", request.commit_hash.clone())
        .text("commit_message", request.commit_message.clone());

    if let Some(redirects) = &request.redirects {
        form = form.part(
            REDIRECTS_FILE,
            Part::text(redirects.clone()).file_name(REDIRECTS_FILE),
        );
    }
    if let Some(headers) = &request.headers {
        form = form.part(
            HEADERS_FILE,
            Part::text(headers.clone()).file_name(HEADERS_FILE),
        );
    }

    Ok(form)
}
