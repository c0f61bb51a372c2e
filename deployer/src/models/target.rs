//! Deployment target

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one function by project, region and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentTarget {
    pub project: String,
    pub region: String,
    pub name: String,
}

impl DeploymentTarget {
    pub fn new(
        project: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            region: region.into(),
            name: name.into(),
        }
    }

    /// `projects/{project}/locations/{region}`
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project, self.region)
    }

    /// `projects/{project}/locations/{region}/functions/{name}`
    pub fn resource_name(&self) -> String {
        format!("{}/functions/{}", self.parent(), self.name)
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_name())
    }
}
