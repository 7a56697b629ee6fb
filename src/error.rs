// Error types for every layer of the tool.
//
// - `ApiError` is produced by the remote API client (`api`).
// - `ConfigError` is produced by the configuration store (`config`).
// - `WorkflowError` is what the ban workflow hands back to `main`; it wraps
//   the other two plus operator input problems.
//
// Messages are kept as the platform or the OS produced them, without extra
// context layered on top.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error object found in the `error` field of a platform envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("code {code}: {message}")]
pub struct PlatformError {
    #[serde(rename = "error_code")]
    pub code: i64,
    #[serde(rename = "error_msg")]
    pub message: String,
    #[serde(default)]
    pub request_params: Vec<RequestParam>,
}

/// One echoed request parameter inside a `PlatformError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParam {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("HTTP error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response envelope has neither `error` nor `response`")]
    MalformedEnvelope,

    #[error("parameter `{0}` is injected by the client and must not be passed")]
    ReservedParameter(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        ApiError::Transport(error.to_string())
    }
}

impl ApiError {
    /// Returns the platform error when the failure came from the envelope.
    pub fn platform(&self) -> Option<&PlatformError> {
        match self {
            ApiError::Platform(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("console error: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),

    #[error("profile URL `{0}` has no trailing handle")]
    EmptyHandle(String),

    #[error("no user found for `{0}`")]
    UserNotFound(String),

    #[error("{method}: still rate limited after {attempts} attempts")]
    RetriesExhausted { method: String, attempts: u32 },
}

impl WorkflowError {
    pub fn platform(&self) -> Option<&PlatformError> {
        match self {
            WorkflowError::Api(e) => e.platform(),
            _ => None,
        }
    }
}

/// Rejected menu answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("{index} is not between 1 and {len}")]
    OutOfRange { index: i64, len: usize },
}
