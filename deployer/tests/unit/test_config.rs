//! Settings file unit tests

use std::time::Duration;

use cfdeploy::app::options::AppOptions;
use cfdeploy::config::deploy::{EgressSettings, IngressSettings};
use cfdeploy::config::{Settings, Trigger};
use cfdeploy::errors::DeployerError;
use cfdeploy::logs::LogLevel;

async fn load(contents: serde_json::Value) -> Result<Settings, DeployerError> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfdeploy.json");
    std::fs::write(&path, contents.to_string()).unwrap();
    Settings::load(&path).await
}

#[tokio::test]
async fn test_load_full_settings_file() {
    let settings = load(serde_json::json!({
        "log_level": "debug",
        "project": "my-project",
        "region": "europe-west1",
        "name": "hello",
        "poll_interval_secs": 3,
        "deploy_timeout_secs": 900,
        "api": { "base_url": "http://localhost:8080/v1" },
        "deploy": {
            "runtime": "go113",
            "entry_point": "HelloHTTP",
            "available_memory_mb": 256,
            "timeout": "60s",
            "ingress_settings": "ALLOW_INTERNAL_ONLY",
            "vpc_connector": "projects/my-project/locations/europe-west1/connectors/c",
            "vpc_connector_egress_settings": "ALL_TRAFFIC",
            "environment_variables": { "MODE": "prod" },
            "trigger_http": true
        },
        "release": { "unauthenticated": true }
    }))
    .await
    .unwrap();

    assert_eq!(settings.log_level, LogLevel::Debug);
    assert_eq!(settings.api.base_url, "http://localhost:8080/v1");
    assert_eq!(settings.api.timeout_secs, 30);

    let options = AppOptions::from_settings(&settings).unwrap();
    assert_eq!(
        options.target.resource_name(),
        "projects/my-project/locations/europe-west1/functions/hello"
    );
    assert_eq!(options.reconciler.poller.interval, Duration::from_secs(3));
    assert_eq!(options.reconciler.submission_failure_delay, Duration::from_secs(15));
    assert_eq!(options.deploy_timeout, Some(Duration::from_secs(900)));
    assert!(options.unauthenticated);

    let deploy = options.deploy;
    assert_eq!(deploy.trigger, Some(Trigger::Http));
    assert_eq!(deploy.ingress, Some(IngressSettings::AllowInternalOnly));
    assert_eq!(deploy.network.egress, Some(EgressSettings::AllTraffic));
    assert_eq!(deploy.environment_variables["MODE"], "prod");
}

#[tokio::test]
async fn test_conflicting_triggers_fail_before_any_call() {
    let settings = load(serde_json::json!({
        "project": "p",
        "region": "r",
        "name": "f",
        "deploy": {
            "trigger_http": true,
            "event_trigger": {
                "event_type": "google.pubsub.topic.publish",
                "resource": "projects/p/topics/t"
            }
        }
    }))
    .await
    .unwrap();

    let err = AppOptions::from_settings(&settings).unwrap_err();
    assert!(matches!(err, DeployerError::ConfigError(ref m) if m.contains("trigger_http")));
}

#[tokio::test]
async fn test_zero_poll_interval_is_rejected() {
    let settings = load(serde_json::json!({
        "project": "p",
        "region": "r",
        "name": "f",
        "poll_interval_secs": 0
    }))
    .await
    .unwrap();

    let err = AppOptions::from_settings(&settings).unwrap_err();
    assert!(matches!(err, DeployerError::ConfigError(ref m) if m.contains("poll_interval_secs")));
}

#[tokio::test]
async fn test_missing_name_is_rejected() {
    let settings = load(serde_json::json!({ "project": "p", "region": "r" }))
        .await
        .unwrap();

    let err = AppOptions::from_settings(&settings).unwrap_err();
    assert!(matches!(err, DeployerError::ConfigError(ref m) if m.contains("name")));
}

#[tokio::test]
async fn test_malformed_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfdeploy.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Settings::load(&path).await.unwrap_err();
    assert!(matches!(err, DeployerError::ConfigError(_)));
}
