//! Function reconciler
//!
//! Converges one function towards the declared configuration: create when
//! the function is absent, otherwise patch its source location only.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use functions_api::{CloudFunction, Operation};

use crate::config::DeployConfig;
use crate::deploy::poller::{self, OperationState, ShutdownSignal};
use crate::deploy::progress::ProgressSink;
use crate::deploy::request::{create_request, drift, update_request, SOURCE_UPLOAD_URL_MASK};
use crate::errors::DeployerError;
use crate::models::{ArtifactRef, DeployedFunction, DeploymentTarget};
use crate::provider::{FunctionLookup, FunctionsProvider};

/// Reconciler options
#[derive(Debug, Clone)]
pub struct Options {
    /// Operation poller options
    pub poller: poller::Options,

    /// Pause before reporting a failed create
    pub submission_failure_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            poller: poller::Options::default(),
            submission_failure_delay: Duration::from_secs(15),
        }
    }
}

/// Function reconciler
pub struct Reconciler<P: ?Sized> {
    provider: Arc<P>,
    options: Options,
}

impl<P: FunctionsProvider + ?Sized> Reconciler<P> {
    /// Create a new reconciler
    pub fn new(provider: Arc<P>, options: Options) -> Self {
        Self { provider, options }
    }

    /// Deploy `artifact` as the function identified by `target`
    pub async fn deploy(
        &self,
        config: &DeployConfig,
        target: &DeploymentTarget,
        artifact: ArtifactRef,
        progress: &dyn ProgressSink,
        shutdown_signal: &mut ShutdownSignal,
    ) -> Result<DeployedFunction, DeployerError> {
        if artifact.project != target.project || artifact.region != target.region {
            return Err(DeployerError::ConfigError(format!(
                "artifact was uploaded for projects/{}/locations/{}, not {}",
                artifact.project,
                artifact.region,
                target.parent()
            )));
        }

        let name = target.resource_name();
        info!("Deploying function {}", name);
        progress.info(&format!("Deploying Google Cloud Function '{}'", name));

        progress.info(&format!("Checking if function already exists '{}'", name));
        let lookup = match self.provider.get_function(&name).await {
            Ok(lookup) => lookup,
            Err(e) => {
                progress.error("Error fetching function");
                return Err(DeployerError::LookupError(Box::new(e)));
            }
        };

        let operation = match lookup {
            FunctionLookup::NotFound => {
                progress.success("Google Cloud Function does not exist, creating function");
                self.create(config, target, &artifact, progress, shutdown_signal)
                    .await?
            }
            FunctionLookup::Found(existing) => {
                progress.success("Google Cloud Function already exists, updating function");
                self.update(config, *existing, &artifact, progress).await?
            }
        };

        progress.info(&format!("Building Function '{}'", operation.name));

        let operation = match poller::await_operation(
            self.provider.as_ref(),
            operation,
            &self.options.poller,
            tokio::time::sleep,
            shutdown_signal,
        )
        .await
        {
            Ok(operation) => operation,
            Err(e) => {
                progress.error("Error fetching build status");
                return Err(e);
            }
        };

        let response = match OperationState::of(&operation) {
            OperationState::Failed(status) => {
                progress.error("Build error");
                warn!("Operation {} failed with code {}", operation.name, status.code);
                return Err(DeployerError::OperationError {
                    code: status.code,
                    message: status.message,
                });
            }
            OperationState::Succeeded => operation.response.unwrap_or_default(),
            OperationState::Pending => {
                return Err(DeployerError::Internal(format!(
                    "operation {} returned before completion",
                    operation.name
                )));
            }
        };

        let function: CloudFunction = match serde_json::from_value(response) {
            Ok(function) => function,
            Err(source) => {
                progress.error(
                    "Error reading the response data but function successfully deployed",
                );
                return Err(DeployerError::DecodeError { name, source });
            }
        };

        let mut deployed = DeployedFunction::from(&function);
        if deployed.name.is_empty() {
            deployed.name = name;
        }

        info!("Deployed {} version {}", deployed.name, deployed.version);
        progress.success(&format!(
            "Google Cloud Function successfully deployed 'v{}'",
            deployed.version
        ));

        Ok(deployed)
    }

    async fn create(
        &self,
        config: &DeployConfig,
        target: &DeploymentTarget,
        artifact: &ArtifactRef,
        progress: &dyn ProgressSink,
        shutdown_signal: &mut ShutdownSignal,
    ) -> Result<Operation, DeployerError> {
        let request = create_request(config, target, artifact);

        match self.provider.create_function(&target.parent(), &request).await {
            Ok(operation) => Ok(operation),
            Err(e) => {
                progress.error(&format!("Error creating function: {}", e));
                // Hold the report for the configured delay unless shutdown is requested
                tokio::select! {
                    biased;
                    _ = shutdown_signal.as_mut() => {}
                    _ = tokio::time::sleep(self.options.submission_failure_delay) => {}
                }
                Err(DeployerError::SubmissionError(Box::new(e)))
            }
        }
    }

    async fn update(
        &self,
        config: &DeployConfig,
        existing: CloudFunction,
        artifact: &ArtifactRef,
        progress: &dyn ProgressSink,
    ) -> Result<Operation, DeployerError> {
        let drifted = drift(config, &existing);
        if !drifted.is_empty() {
            progress.warning(&format!(
                "Only the source is updated; these configured fields differ from the live function and are left unchanged: {}",
                drifted.join(", ")
            ));
        }

        let request = update_request(existing, artifact);

        self.provider
            .update_function(&request, SOURCE_UPLOAD_URL_MASK)
            .await
            .map_err(|e| {
                progress.error(&format!("Error updating function: {}", e));
                DeployerError::SubmissionError(Box::new(e))
            })
    }
}
