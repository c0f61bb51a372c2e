//! Access publisher
//!
//! Post-deploy step that opens a function to unauthenticated callers.

use std::sync::Arc;

use tracing::info;

use functions_api::{Binding, Policy, SetIamPolicyRequest};

use crate::deploy::progress::ProgressSink;
use crate::errors::DeployerError;
use crate::models::{Accessibility, DeployedFunction, ReleaseRecord};
use crate::provider::FunctionsProvider;

/// Role granting invocation rights
pub const INVOKER_ROLE: &str = "roles/cloudfunctions.invoker";

/// Principal matching any caller
pub const ALL_USERS: &str = "allUsers";

/// Policy that lets anyone invoke the function.
///
/// `setIamPolicy` replaces the whole policy, so any other binding on the
/// function is dropped.
pub fn public_invoker_policy() -> SetIamPolicyRequest {
    SetIamPolicyRequest {
        policy: Policy {
            bindings: vec![Binding {
                role: INVOKER_ROLE.to_string(),
                members: vec![ALL_USERS.to_string()],
            }],
            ..Default::default()
        },
        update_mask: None,
    }
}

/// Access publisher
pub struct Publisher<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: FunctionsProvider + ?Sized> Publisher<P> {
    /// Create a new publisher
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Release a deployed function.
    ///
    /// Access is only ever granted. With `unauthenticated == false` no call
    /// is made, so a function that was public stays public.
    pub async fn publish(
        &self,
        deployed: &DeployedFunction,
        unauthenticated: bool,
        progress: &dyn ProgressSink,
    ) -> Result<ReleaseRecord, DeployerError> {
        if !unauthenticated {
            progress.success(
                "No Operation release, Cloud Function already deployed but only accessible to authenticated users",
            );
            return Ok(ReleaseRecord::new(deployed, Accessibility::Unchanged));
        }

        progress.info("Releasing Google Cloud Function to all unauthenticated users");

        if let Err(e) = self
            .provider
            .set_iam_policy(&deployed.name, &public_invoker_policy())
            .await
        {
            progress.error(&format!("Error setting IAM Policy to {}", ALL_USERS));
            return Err(DeployerError::PublishError {
                name: deployed.name.clone(),
                source: Box::new(e),
            });
        }

        info!("Granted {} to {} on {}", INVOKER_ROLE, ALL_USERS, deployed.name);
        progress.success(&format!("IAM Policy successfully set to '{}'", ALL_USERS));

        Ok(ReleaseRecord::new(deployed, Accessibility::Public))
    }
}
