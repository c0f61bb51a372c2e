//! Settings file management

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::deploy::{DeployConfig, DeploySettings};
use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::models::DeploymentTarget;

/// cfdeploy settings, read from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,

    /// Also append logs to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Provider API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Project to deploy to
    #[serde(default)]
    pub project: String,

    /// Region to deploy to, e.g. `europe-west1`
    #[serde(default)]
    pub region: String,

    /// Short function name
    #[serde(default)]
    pub name: String,

    /// Delay between operation polls, in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Delay before reporting a failed create, in seconds
    #[serde(default = "default_submission_failure_delay")]
    pub submission_failure_delay_secs: u64,

    /// Abort the pipeline after this many seconds
    #[serde(default)]
    pub deploy_timeout_secs: Option<u64>,

    /// Function configuration
    #[serde(default)]
    pub deploy: DeploySettings,

    /// Release configuration
    #[serde(default)]
    pub release: ReleaseSettings,
}

fn default_poll_interval() -> u64 {
    1
}

fn default_submission_failure_delay() -> u64 {
    15
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_file: None,
            api: ApiSettings::default(),
            project: String::new(),
            region: String::new(),
            name: String::new(),
            poll_interval_secs: default_poll_interval(),
            submission_failure_delay_secs: default_submission_failure_delay(),
            deploy_timeout_secs: None,
            deploy: DeploySettings::default(),
            release: ReleaseSettings::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DeployerError> {
        let file = File::new(path.as_ref());
        file.read_json().await.map_err(|e| {
            DeployerError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// The function this settings file deploys
    pub fn target(&self) -> Result<DeploymentTarget, DeployerError> {
        for (field, value) in [
            ("project", &self.project),
            ("region", &self.region),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(DeployerError::ConfigError(format!("{} is required", field)));
            }
        }
        Ok(DeploymentTarget::new(&self.project, &self.region, &self.name))
    }

    /// Validated function configuration
    pub fn deploy_config(&self) -> Result<DeployConfig, DeployerError> {
        DeployConfig::try_from(self.deploy.clone())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn submission_failure_delay(&self) -> Duration {
        Duration::from_secs(self.submission_failure_delay_secs)
    }

    pub fn deploy_timeout(&self) -> Option<Duration> {
        self.deploy_timeout_secs.map(Duration::from_secs)
    }
}

/// Provider API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL for the Cloud Functions API
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://cloudfunctions.googleapis.com/v1".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// Release settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseSettings {
    /// Allow unauthenticated invocations
    #[serde(default)]
    pub unauthenticated: bool,
}
