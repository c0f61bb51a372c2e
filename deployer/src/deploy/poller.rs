//! Operation poller
//!
//! Drives a long-running provider operation to a terminal state. The only
//! exits are the operation reporting `done`, a fetch failing, or the
//! shutdown signal firing.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

use functions_api::{Operation, Status};

use crate::errors::DeployerError;
use crate::provider::FunctionsProvider;

/// Resolves when the wait should be abandoned
pub type ShutdownSignal = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Poller options
#[derive(Debug, Clone)]
pub struct Options {
    /// Fixed delay between fetches
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// State of an operation as last observed
#[derive(Debug, Clone, PartialEq)]
pub enum OperationState {
    Pending,
    Succeeded,
    Failed(Status),
}

impl OperationState {
    pub fn of(operation: &Operation) -> Self {
        match (operation.done, &operation.error) {
            (false, _) => OperationState::Pending,
            (true, Some(status)) => OperationState::Failed(status.clone()),
            (true, None) => OperationState::Succeeded,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationState::Pending)
    }
}

/// Poll `operation` until it is done.
///
/// Fetch errors are returned unchanged. The fetch and the pause both race
/// `shutdown_signal`; once it fires no further fetch is made.
pub async fn await_operation<P, S, F>(
    provider: &P,
    operation: Operation,
    options: &Options,
    sleep_fn: S,
    shutdown_signal: &mut ShutdownSignal,
) -> Result<Operation, DeployerError>
where
    P: FunctionsProvider + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let mut operation = operation;
    let mut fetches: u32 = 0;

    while !OperationState::of(&operation).is_terminal() {
        if operation.name.is_empty() {
            return Err(DeployerError::Internal(
                "provider returned a pending operation without a name".to_string(),
            ));
        }

        let name = operation.name.clone();
        operation = tokio::select! {
            biased;
            _ = shutdown_signal.as_mut() => {
                info!("Stopped waiting for operation {} after {} polls", name, fetches);
                return Err(DeployerError::Cancelled);
            }
            result = provider.get_operation(&name) => result?,
        };
        fetches += 1;
        debug!("Operation {} poll #{}: done={}", name, fetches, operation.done);

        if operation.done {
            break;
        }

        tokio::select! {
            biased;
            _ = shutdown_signal.as_mut() => {
                info!("Stopped waiting for operation {} after {} polls", name, fetches);
                return Err(DeployerError::Cancelled);
            }
            _ = sleep_fn(options.interval) => {}
        }
    }

    Ok(operation)
}
