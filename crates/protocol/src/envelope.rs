use serde::{Deserialize, Serialize};

/// An error or informational entry attached to a store response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

/// Envelope wrapping every store response.
///
/// `result` is absent (or `null`) on failure and for endpoints that return
/// nothing useful, such as `upsert-hashes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    pub result: Option<T>,
}

/// Reasons an envelope cannot yield its result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("response carried no result")]
    MissingResult,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful result.
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            messages: Vec::new(),
            result: Some(result),
        }
    }

    /// Joins the error messages into a single diagnostic line.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "no error details".into();
        }
        self.errors
            .iter()
            .map(|e| format!("[{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Returns the result of a successful envelope.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if !self.success {
            return Err(EnvelopeError::Rejected(self.error_summary()));
        }
        self.result.ok_or(EnvelopeError::MissingResult)
    }

    /// Checks success without requiring a result.
    pub fn into_unit(self) -> Result<(), EnvelopeError> {
        if self.success {
            Ok(())
        } else {
            Err(EnvelopeError::Rejected(self.error_summary()))
        }
    }
}
