//! Error type shared by the API layer and the state containers.
//!
//! Every container action records the error it hit and then returns it, so the
//! caller (a CLI command) decides how to present it. The type is `Clone` because
//! concurrent callers joined on one in-flight fetch all receive the same outcome.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Registration command failed role-conditional checks; never reached the network.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Sign-in / sign-up returned no usable resource.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A single-resource fetch came back non-2xx.
    #[error("{resource} not found (HTTP {status})")]
    NotFound { resource: String, status: u32 },

    /// A collection fetch or mutation came back non-2xx.
    #[error("{method} {path} returned HTTP {status}")]
    Status {
        method: String,
        path: String,
        status: u32,
    },

    /// Transport failure, or a body that could not be read as the JSON the API promises
    /// (typically an HTML page from a misconfigured base URL).
    #[error("network error: {0}")]
    Network(String),

    /// Client-side storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn network(msg: impl Into<String>) -> Self {
        ApiError::Network(msg.into())
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u32> {
        match self {
            ApiError::NotFound { status, .. } | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Reasons carried by a validation failure (empty for other kinds).
    pub fn validation_errors(&self) -> &[String] {
        match self {
            ApiError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Network(format!("malformed JSON: {e}"))
    }
}
