use serde::{Deserialize, Serialize};

/// A long-running operation handle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// `operations/{id}`
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub done: bool,

    /// Set when the operation finished unsuccessfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,

    /// Set when the operation finished successfully. For function
    /// operations this is the resulting `CloudFunction`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

/// RPC status carried by a failed operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<serde_json::Value>,
}
