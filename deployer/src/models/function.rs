//! Deployed function state

use serde::{Deserialize, Serialize};

use functions_api::CloudFunction;

/// Resolved function state after the deploy operation completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedFunction {
    /// Full resource name
    pub name: String,

    /// Provider-assigned version
    pub version: i64,

    /// Invocation URL, present for HTTP triggered functions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&CloudFunction> for DeployedFunction {
    fn from(function: &CloudFunction) -> Self {
        Self {
            name: function.name.clone(),
            version: function.version_id.unwrap_or_default(),
            url: function
                .https_trigger
                .as_ref()
                .and_then(|t| t.url.clone())
                .filter(|u| !u.is_empty()),
        }
    }
}
