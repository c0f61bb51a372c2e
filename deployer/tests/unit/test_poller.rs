//! Operation poller unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cfdeploy::deploy::poller::{await_operation, Options, ShutdownSignal};
use cfdeploy::errors::DeployerError;

use crate::fake::{api_error, failed, pending, succeeded, Call, FakeProvider};

fn never() -> ShutdownSignal {
    Box::pin(std::future::pending::<()>())
}

fn fetches(provider: &FakeProvider) -> usize {
    provider.count(|c| matches!(c, Call::GetOperation(_)))
}

#[tokio::test]
async fn test_polls_until_done() {
    let provider = FakeProvider::new().with_operations(vec![
        pending("operations/op-1"),
        pending("operations/op-1"),
        pending("operations/op-1"),
        succeeded("operations/op-1", serde_json::json!({ "versionId": "2" })),
    ]);
    let sleeps = AtomicUsize::new(0);
    let sleep_fn = |interval: Duration| {
        assert_eq!(interval, Duration::from_secs(1));
        sleeps.fetch_add(1, Ordering::SeqCst);
        std::future::ready(())
    };

    let op = await_operation(
        &provider,
        pending("operations/op-1"),
        &Options::default(),
        sleep_fn,
        &mut never(),
    )
    .await
    .unwrap();

    assert!(op.done);
    assert_eq!(fetches(&provider), 4);
    assert_eq!(sleeps.load(Ordering::SeqCst), 3);
    assert!(provider
        .calls()
        .iter()
        .all(|c| *c == Call::GetOperation("operations/op-1".to_string())));
}

#[tokio::test]
async fn test_done_operation_is_not_fetched() {
    let provider = FakeProvider::new();
    let op = await_operation(
        &provider,
        failed("operations/op-1", 3, "bad request"),
        &Options::default(),
        |_| std::future::ready(()),
        &mut never(),
    )
    .await
    .unwrap();

    assert_eq!(op.error.unwrap().message, "bad request");
    assert_eq!(fetches(&provider), 0);
}

#[tokio::test]
async fn test_failed_operation_is_returned_not_raised() {
    let provider = FakeProvider::new().with_operations(vec![failed(
        "operations/op-1",
        9,
        "quota exceeded",
    )]);

    let op = await_operation(
        &provider,
        pending("operations/op-1"),
        &Options::default(),
        |_| std::future::ready(()),
        &mut never(),
    )
    .await
    .unwrap();

    assert_eq!(op.error.unwrap().code, 9);
    assert_eq!(fetches(&provider), 1);
}

#[tokio::test]
async fn test_fetch_error_is_propagated() {
    let provider = FakeProvider {
        operation_error: Some(api_error(503, "backend unavailable")),
        ..FakeProvider::new()
    };

    let err = await_operation(
        &provider,
        pending("operations/op-1"),
        &Options::default(),
        |_| std::future::ready(()),
        &mut never(),
    )
    .await
    .unwrap_err();

    match err {
        DeployerError::ApiError(e) => {
            assert_eq!(e.status, 503);
            assert_eq!(e.message, "backend unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fetches(&provider), 1);
}

#[tokio::test]
async fn test_shutdown_stops_polling() {
    // The script never completes, so only shutdown can end the wait
    let provider = FakeProvider::new();
    let mut shutdown: ShutdownSignal = Box::pin(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
    });

    let err = await_operation(
        &provider,
        pending("operations/op-1"),
        &Options::default(),
        |_| std::future::pending::<()>(),
        &mut shutdown,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployerError::Cancelled));
    assert_eq!(fetches(&provider), 1);
}

#[tokio::test]
async fn test_shutdown_before_first_fetch() {
    let provider = FakeProvider::new();
    let mut shutdown: ShutdownSignal = Box::pin(std::future::ready(()));

    let err = await_operation(
        &provider,
        pending("operations/op-1"),
        &Options::default(),
        |_| std::future::ready(()),
        &mut shutdown,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployerError::Cancelled));
    assert_eq!(fetches(&provider), 0);
}

#[tokio::test]
async fn test_pending_operation_without_name() {
    let provider = FakeProvider::new();
    let err = await_operation(
        &provider,
        pending(""),
        &Options::default(),
        |_| std::future::ready(()),
        &mut never(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, DeployerError::Internal(_)));
    assert!(provider.calls().is_empty());
}
