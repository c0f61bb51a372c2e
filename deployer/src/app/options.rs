//! Application configuration options

use std::time::Duration;

use crate::config::{DeployConfig, Settings};
use crate::deploy::{poller, reconciler};
use crate::errors::DeployerError;
use crate::models::DeploymentTarget;

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Function to deploy
    pub target: DeploymentTarget,

    /// Declared function configuration
    pub deploy: DeployConfig,

    /// Grant `allUsers` the invoker role on release
    pub unauthenticated: bool,

    /// Reconciler options
    pub reconciler: reconciler::Options,

    /// Abort the pipeline after this long
    pub deploy_timeout: Option<Duration>,
}

impl AppOptions {
    /// Validate settings into pipeline options. Makes no network calls.
    pub fn from_settings(settings: &Settings) -> Result<Self, DeployerError> {
        if settings.poll_interval_secs == 0 {
            return Err(DeployerError::ConfigError(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            target: settings.target()?,
            deploy: settings.deploy_config()?,
            unauthenticated: settings.release.unauthenticated,
            reconciler: reconciler::Options {
                poller: poller::Options {
                    interval: settings.poll_interval(),
                },
                submission_failure_delay: settings.submission_failure_delay(),
            },
            deploy_timeout: settings.deploy_timeout(),
        })
    }
}
