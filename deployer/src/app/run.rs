//! Pipeline run

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::app::options::AppOptions;
use crate::deploy::poller::ShutdownSignal;
use crate::deploy::progress::ProgressSink;
use crate::deploy::publisher::Publisher;
use crate::deploy::reconciler::Reconciler;
use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::models::{ArtifactRef, DeployedFunction, ReleaseRecord};
use crate::provider::{ArtifactStore, FunctionsProvider};
use crate::registry::push;

/// Where the function source comes from
#[derive(Debug, Clone)]
pub enum Source {
    /// Local zip archive, pushed before deploying
    Archive(File),

    /// Archive already uploaded to this signed URL
    Uploaded(String),
}

/// Combine an external shutdown signal with an optional deadline for the
/// whole command
pub fn shutdown_signal(
    signal: impl Future<Output = ()> + Send + 'static,
    deadline: Option<Duration>,
) -> ShutdownSignal {
    Box::pin(async move {
        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = signal => {
                        info!("Shutdown signal received, aborting...");
                    }
                    _ = tokio::time::sleep(deadline) => {
                        warn!("Deploy timeout ({:?}) reached, aborting...", deadline);
                    }
                }
            }
            None => {
                signal.await;
                info!("Shutdown signal received, aborting...");
            }
        }
    })
}

/// Run `step` unless `shutdown` fires first
async fn until_shutdown<T>(
    step: impl Future<Output = Result<T, DeployerError>>,
    shutdown: &mut ShutdownSignal,
) -> Result<T, DeployerError> {
    tokio::select! {
        biased;
        _ = shutdown.as_mut() => Err(DeployerError::Cancelled),
        result = step => result,
    }
}

/// Push, deploy and release one function
pub async fn run<P>(
    provider: Arc<P>,
    options: &AppOptions,
    source: Source,
    progress: &dyn ProgressSink,
    shutdown: &mut ShutdownSignal,
) -> Result<ReleaseRecord, DeployerError>
where
    P: FunctionsProvider + ArtifactStore + ?Sized,
{
    info!("Releasing {}", options.target);

    let artifact = match source {
        Source::Archive(archive) => {
            push(provider.as_ref(), options, &archive, progress, shutdown).await?
        }
        Source::Uploaded(url) => {
            ArtifactRef::from_upload_url(url, &options.target.project, &options.target.region)
        }
    };

    let deployed = deploy(provider.clone(), options, artifact, progress, shutdown).await?;
    release(provider, options, &deployed, progress, shutdown).await
}

/// Upload a local archive for the target
pub async fn push<S>(
    store: &S,
    options: &AppOptions,
    archive: &File,
    progress: &dyn ProgressSink,
    shutdown: &mut ShutdownSignal,
) -> Result<ArtifactRef, DeployerError>
where
    S: ArtifactStore + ?Sized,
{
    until_shutdown(
        push::push(
            store,
            &options.target.project,
            &options.target.region,
            archive,
            progress,
        ),
        shutdown,
    )
    .await
}

/// Reconcile the function against an uploaded artifact
pub async fn deploy<P>(
    provider: Arc<P>,
    options: &AppOptions,
    artifact: ArtifactRef,
    progress: &dyn ProgressSink,
    shutdown: &mut ShutdownSignal,
) -> Result<DeployedFunction, DeployerError>
where
    P: FunctionsProvider + ?Sized,
{
    Reconciler::new(provider, options.reconciler.clone())
        .deploy(&options.deploy, &options.target, artifact, progress, shutdown)
        .await
}

/// Apply the release policy to a deployed function.
///
/// The function is already deployed, so an interrupted release is reported
/// as a publish failure.
pub async fn release<P>(
    provider: Arc<P>,
    options: &AppOptions,
    deployed: &DeployedFunction,
    progress: &dyn ProgressSink,
    shutdown: &mut ShutdownSignal,
) -> Result<ReleaseRecord, DeployerError>
where
    P: FunctionsProvider + ?Sized,
{
    let publisher = Publisher::new(provider);
    match until_shutdown(
        publisher.publish(deployed, options.unauthenticated, progress),
        shutdown,
    )
    .await
    {
        Err(DeployerError::Cancelled) => {
            progress.error("Release interrupted before the IAM Policy was confirmed");
            Err(DeployerError::PublishError {
                name: deployed.name.clone(),
                source: Box::new(DeployerError::Cancelled),
            })
        }
        result => result,
    }
}
