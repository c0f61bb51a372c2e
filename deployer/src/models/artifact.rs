//! Uploaded artifact reference

use serde::{Deserialize, Serialize};

/// Where the pushed archive lives and where it is meant to be deployed.
///
/// Produced once by the push step and consumed once by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Pre-signed upload URL the archive was written to
    pub source: String,

    pub project: String,

    pub region: String,

    /// Archive size in bytes
    #[serde(default)]
    pub size: u64,

    /// Hex SHA-256 of the archive
    #[serde(default)]
    pub sha256: String,
}

impl ArtifactRef {
    /// Reference an archive that was uploaded out of band
    pub fn from_upload_url(
        source: impl Into<String>,
        project: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            project: project.into(),
            region: region.into(),
            size: 0,
            sha256: String::new(),
        }
    }
}
