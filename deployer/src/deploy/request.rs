//! Provider request construction

use functions_api::{self as api, CloudFunction, FailurePolicy, HttpsTrigger, Retry};

use crate::config::deploy::{DeployConfig, EventTrigger, Trigger};
use crate::models::{ArtifactRef, DeploymentTarget};

/// Field mask used for every update
pub const SOURCE_UPLOAD_URL_MASK: &str = "sourceUploadUrl";

/// Full resource body for a create call
pub fn create_request(
    config: &DeployConfig,
    target: &DeploymentTarget,
    artifact: &ArtifactRef,
) -> CloudFunction {
    let (https_trigger, event_trigger) = match &config.trigger {
        Some(Trigger::Http) => (Some(HttpsTrigger::default()), None),
        Some(Trigger::Event(event)) => (None, Some(event_trigger(event))),
        None => (None, None),
    };

    CloudFunction {
        name: target.resource_name(),
        description: config.description.clone(),
        source_upload_url: artifact.source.clone(),
        https_trigger,
        event_trigger,
        entry_point: config.entry_point.clone(),
        runtime: config.runtime.clone(),
        timeout: config.timeout.clone(),
        available_memory_mb: config.available_memory_mb,
        labels: config.labels.clone(),
        environment_variables: config.environment_variables.clone(),
        build_environment_variables: config.build_environment_variables.clone(),
        network: config.network.network.clone(),
        max_instances: config.max_instances,
        vpc_connector: config.network.vpc_connector.clone(),
        vpc_connector_egress_settings: config
            .network
            .egress
            .map(|e| e.as_str().to_string())
            .unwrap_or_default(),
        ingress_settings: config
            .ingress
            .map(|i| i.as_str().to_string())
            .unwrap_or_default(),
        ..Default::default()
    }
}

/// The live resource with only the source location replaced
pub fn update_request(existing: CloudFunction, artifact: &ArtifactRef) -> CloudFunction {
    CloudFunction {
        source_upload_url: artifact.source.clone(),
        ..existing
    }
}

fn event_trigger(event: &EventTrigger) -> api::EventTrigger {
    api::EventTrigger {
        event_type: event.event_type.clone(),
        resource: event.resource.clone(),
        service: event.service.clone().unwrap_or_default(),
        // Retries are enabled by the presence of `retry`, so `false` is sent as absent
        failure_policy: event.failure_policy.retry.then(|| FailurePolicy {
            retry: Some(Retry {}),
        }),
    }
}

/// Declared fields whose value differs from the live resource.
///
/// Fields left unset in the configuration are not compared.
pub fn drift(config: &DeployConfig, live: &CloudFunction) -> Vec<&'static str> {
    let declared = create_request(
        config,
        &DeploymentTarget::new("", "", ""),
        &ArtifactRef::from_upload_url("", "", ""),
    );
    let mut fields = Vec::new();

    let mut check = |field: &'static str, is_set: bool, differs: bool| {
        if is_set && differs {
            fields.push(field);
        }
    };

    check(
        "runtime",
        !declared.runtime.is_empty(),
        declared.runtime != live.runtime,
    );
    check(
        "entry_point",
        !declared.entry_point.is_empty(),
        declared.entry_point != live.entry_point,
    );
    check(
        "description",
        !declared.description.is_empty(),
        declared.description != live.description,
    );
    check(
        "available_memory_mb",
        declared.available_memory_mb != 0,
        declared.available_memory_mb != live.available_memory_mb,
    );
    check(
        "timeout",
        !declared.timeout.is_empty(),
        declared.timeout != live.timeout,
    );
    check(
        "max_instances",
        declared.max_instances != 0,
        declared.max_instances != live.max_instances,
    );
    check(
        "environment_variables",
        !declared.environment_variables.is_empty(),
        declared.environment_variables != live.environment_variables,
    );
    check(
        "build_environment_variables",
        !declared.build_environment_variables.is_empty(),
        declared.build_environment_variables != live.build_environment_variables,
    );
    check(
        "labels",
        !declared.labels.is_empty(),
        declared
            .labels
            .iter()
            .any(|(k, v)| live.labels.get(k) != Some(v)),
    );
    check(
        "ingress_settings",
        !declared.ingress_settings.is_empty(),
        declared.ingress_settings != live.ingress_settings,
    );
    check(
        "network",
        !declared.network.is_empty(),
        declared.network != live.network,
    );
    check(
        "vpc_connector",
        !declared.vpc_connector.is_empty(),
        declared.vpc_connector != live.vpc_connector,
    );
    check(
        "vpc_connector_egress_settings",
        !declared.vpc_connector_egress_settings.is_empty(),
        declared.vpc_connector_egress_settings != live.vpc_connector_egress_settings,
    );

    let trigger_differs = match (&declared.event_trigger, &live.event_trigger) {
        (Some(want), Some(have)) => event_trigger_differs(want, have),
        (Some(_), None) => true,
        (None, _) => declared.https_trigger.is_some() && live.https_trigger.is_none(),
    };
    check("trigger", config.trigger.is_some(), trigger_differs);

    fields
}

/// An empty declared `service` is left for the provider to fill in
fn event_trigger_differs(want: &api::EventTrigger, have: &api::EventTrigger) -> bool {
    let retries = |t: &api::EventTrigger| {
        t.failure_policy
            .as_ref()
            .is_some_and(|policy| policy.retry.is_some())
    };

    want.event_type != have.event_type
        || want.resource != have.resource
        || retries(want) != retries(have)
        || (!want.service.is_empty() && want.service != have.service)
}
