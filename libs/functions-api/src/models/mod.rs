//! API models

use serde::{Deserialize, Serialize};

mod function;
mod iam;
mod operation;

pub use function::*;
pub use iam::*;
pub use operation::*;

/// Generate upload URL request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateUploadUrlRequest {}

/// Generate upload URL response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlResponse {
    pub upload_url: String,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,

    /// Canonical status name, e.g. `NOT_FOUND`
    #[serde(default)]
    pub status: String,
}
