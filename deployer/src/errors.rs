//! Error types for cfdeploy

use thiserror::Error;

/// Non-2xx response from the provider API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status} {message}")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,

    /// Canonical status name from the error body, e.g. `PERMISSION_DENIED`
    pub reason: String,

    /// Error message from the error body, or the raw body if it did not parse
    pub message: String,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Main error type for cfdeploy
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    ApiError(#[from] ApiError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("File size should not exceed {limit} bytes (archive is {size} bytes)")]
    ArtifactTooLarge { size: u64, limit: u64 },

    #[error("Upload error: {0}")]
    UploadError(String),

    #[error("Error fetching function: {0}")]
    LookupError(Box<DeployerError>),

    #[error("Error submitting function: {0}")]
    SubmissionError(Box<DeployerError>),

    /// Terminal operation error. Displays the provider message verbatim.
    #[error("{message}")]
    OperationError { code: i32, message: String },

    /// The function was deployed but the operation response could not be read
    #[error("Function {name} successfully deployed, but the response could not be read: {source}")]
    DecodeError {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The function is deployed but public access could not be granted
    #[error("Function {name} deployed, but setting the IAM policy failed: {source}")]
    PublishError {
        name: String,
        #[source]
        source: Box<DeployerError>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployerError {
    /// Whether the remote deploy succeeded despite the error
    pub fn is_partial_success(&self) -> bool {
        matches!(
            self,
            DeployerError::DecodeError { .. } | DeployerError::PublishError { .. }
        )
    }

    /// Whether this is a `404` from the provider
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeployerError::ApiError(e) if e.is_not_found())
    }
}

impl From<anyhow::Error> for DeployerError {
    fn from(err: anyhow::Error) -> Self {
        DeployerError::Internal(err.to_string())
    }
}
