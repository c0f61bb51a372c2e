//! Release record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DeployedFunction;

/// Who can invoke the released function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// `allUsers` was granted the invoker role
    Public,

    /// No policy call was made. Access is whatever it was before.
    Unchanged,
}

/// Terminal output of the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub name: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub accessibility: Accessibility,
    pub released_at: DateTime<Utc>,
}

impl ReleaseRecord {
    pub fn new(deployed: &DeployedFunction, accessibility: Accessibility) -> Self {
        Self {
            name: deployed.name.clone(),
            version: deployed.version,
            url: deployed.url.clone(),
            accessibility,
            released_at: Utc::now(),
        }
    }
}
