//! Access publisher unit tests

use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use cfdeploy::deploy::progress::ProgressLevel;
use cfdeploy::deploy::publisher::{Publisher, ALL_USERS, INVOKER_ROLE};
use cfdeploy::errors::DeployerError;
use cfdeploy::models::{Accessibility, DeployedFunction};

use crate::fake::{api_error, Call, FakeProvider, RecordingProgress};

const NAME: &str = "projects/p/locations/r/functions/f";

fn deployed() -> DeployedFunction {
    DeployedFunction {
        name: NAME.to_string(),
        version: 4,
        url: Some("https://r-p.cloudfunctions.net/f".to_string()),
    }
}

#[tokio::test]
async fn test_authenticated_release_makes_no_call() {
    let provider = Arc::new(FakeProvider::new());
    let progress = RecordingProgress::default();

    let record = assert_ok!(
        Publisher::new(provider.clone())
            .publish(&deployed(), false, &progress)
            .await
    );

    assert!(provider.calls().is_empty());
    assert_eq!(record.accessibility, Accessibility::Unchanged);
    assert_eq!(record.name, NAME);
    assert_eq!(record.version, 4);
    assert!(progress.has(ProgressLevel::Success, "only accessible to authenticated users"));
}

#[tokio::test]
async fn test_unauthenticated_release_grants_invoker_to_all_users() {
    let provider = Arc::new(FakeProvider::new());
    let progress = RecordingProgress::default();

    let record = assert_ok!(
        Publisher::new(provider.clone())
            .publish(&deployed(), true, &progress)
            .await
    );

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Call::SetIamPolicy { resource, request } => {
            assert_eq!(resource, NAME);
            assert_eq!(request.policy.bindings.len(), 1);
            assert_eq!(request.policy.bindings[0].role, INVOKER_ROLE);
            assert_eq!(request.policy.bindings[0].members, vec![ALL_USERS.to_string()]);
        }
        other => panic!("expected setIamPolicy, got {other:?}"),
    }

    assert_eq!(record.accessibility, Accessibility::Public);
    assert_eq!(record.url.as_deref(), Some("https://r-p.cloudfunctions.net/f"));
    assert!(progress.has(ProgressLevel::Success, "allUsers"));
}

#[tokio::test]
async fn test_policy_failure_is_partial_success() {
    let provider = Arc::new(FakeProvider {
        iam_error: Some(api_error(403, "caller lacks setIamPolicy")),
        ..FakeProvider::new()
    });
    let progress = RecordingProgress::default();

    let err = assert_err!(
        Publisher::new(provider.clone())
            .publish(&deployed(), true, &progress)
            .await
    );

    match &err {
        DeployerError::PublishError { name, source } => {
            assert_eq!(name, NAME);
            assert!(source.to_string().contains("caller lacks setIamPolicy"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_partial_success());
    assert_eq!(provider.calls().len(), 1);
    assert!(progress.has(ProgressLevel::Error, "Error setting IAM Policy"));
}
