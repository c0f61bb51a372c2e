//! Declared function configuration
//!
//! [`DeploySettings`] is the shape read from the settings file. It keeps the
//! `trigger_http` / `event_trigger` pair as written by operators and is
//! validated into a [`DeployConfig`], where the trigger is a single
//! [`Trigger`] value.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::DeployerError;

/// Deploy section of the settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Runtime in which to run the function, e.g. `go113`, `nodejs12`
    #[serde(default)]
    pub runtime: String,

    /// Name of the function (as defined in source code) that is executed
    #[serde(default)]
    pub entry_point: String,

    #[serde(default)]
    pub description: String,

    /// Memory limit in MB: 128, 256, 512, 1024 or 2048
    #[serde(default)]
    pub available_memory_mb: i64,

    /// Execution timeout, a duration in seconds terminated by `s`, e.g. `"3.5s"`
    #[serde(default)]
    pub timeout: String,

    #[serde(default)]
    pub max_instances: i64,

    /// Available during function execution
    #[serde(default)]
    pub environment_variables: HashMap<String, String>,

    /// Available at build time
    #[serde(default)]
    pub build_environment_variables: HashMap<String, String>,

    #[serde(default)]
    pub ingress_settings: Option<IngressSettings>,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    /// VPC network, mutually exclusive with `vpc_connector`
    #[serde(default)]
    pub network: String,

    #[serde(default)]
    pub vpc_connector: String,

    #[serde(default)]
    pub vpc_connector_egress_settings: Option<EgressSettings>,

    /// Any HTTP request to the endpoint triggers the function
    #[serde(default)]
    pub trigger_http: bool,

    #[serde(default)]
    pub event_trigger: Option<EventTrigger>,
}

/// Ingress settings, controlling what traffic can reach the function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IngressSettings {
    #[serde(rename = "INGRESS_SETTINGS_UNSPECIFIED")]
    Unspecified,
    AllowAll,
    AllowInternalOnly,
    AllowInternalAndGclb,
}

impl IngressSettings {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngressSettings::Unspecified => "INGRESS_SETTINGS_UNSPECIFIED",
            IngressSettings::AllowAll => "ALLOW_ALL",
            IngressSettings::AllowInternalOnly => "ALLOW_INTERNAL_ONLY",
            IngressSettings::AllowInternalAndGclb => "ALLOW_INTERNAL_AND_GCLB",
        }
    }
}

/// Egress settings for the VPC connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EgressSettings {
    #[serde(rename = "VPC_CONNECTOR_EGRESS_SETTINGS_UNSPECIFIED")]
    Unspecified,
    PrivateRangesOnly,
    AllTraffic,
}

impl EgressSettings {
    pub fn as_str(&self) -> &'static str {
        match self {
            EgressSettings::Unspecified => "VPC_CONNECTOR_EGRESS_SETTINGS_UNSPECIFIED",
            EgressSettings::PrivateRangesOnly => "PRIVATE_RANGES_ONLY",
            EgressSettings::AllTraffic => "ALL_TRAFFIC",
        }
    }
}

/// Source that fires events in response to a condition in another service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTrigger {
    /// e.g. `providers/cloud.pubsub/eventTypes/topic.publish`
    pub event_type: String,

    /// e.g. `projects/my-project/topics/my-topic`
    pub resource: String,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Hostname of the observed service; the provider picks a default when empty
    #[serde(default)]
    pub service: Option<String>,
}

/// Policy for failed executions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePolicy {
    #[serde(default)]
    pub retry: bool,
}

/// How the function is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Http,
    Event(EventTrigger),
}

/// Network placement of the function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConfig {
    pub network: String,
    pub vpc_connector: String,
    pub egress: Option<EgressSettings>,
}

/// Validated desired state of a function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployConfig {
    pub runtime: String,
    pub entry_point: String,
    pub description: String,
    pub available_memory_mb: i64,
    pub timeout: String,
    pub max_instances: i64,
    pub environment_variables: HashMap<String, String>,
    pub build_environment_variables: HashMap<String, String>,
    pub ingress: Option<IngressSettings>,
    pub network: NetworkConfig,
    pub labels: HashMap<String, String>,
    /// `None` is passed through to the provider as-is
    pub trigger: Option<Trigger>,
}

impl TryFrom<DeploySettings> for DeployConfig {
    type Error = DeployerError;

    fn try_from(settings: DeploySettings) -> Result<Self, Self::Error> {
        let trigger = match (settings.trigger_http, settings.event_trigger) {
            (true, Some(_)) => {
                return Err(DeployerError::ConfigError(
                    "trigger_http and event_trigger cannot be used together".to_string(),
                ));
            }
            (true, None) => Some(Trigger::Http),
            (false, Some(event)) => {
                if event.event_type.is_empty() || event.resource.is_empty() {
                    return Err(DeployerError::ConfigError(
                        "event_trigger requires both event_type and resource".to_string(),
                    ));
                }
                Some(Trigger::Event(event))
            }
            (false, None) => None,
        };

        if !settings.network.is_empty() && !settings.vpc_connector.is_empty() {
            return Err(DeployerError::ConfigError(
                "network and vpc_connector cannot be used together".to_string(),
            ));
        }

        if !settings.timeout.is_empty() && !is_valid_duration(&settings.timeout) {
            return Err(DeployerError::ConfigError(format!(
                "timeout must be a number of seconds terminated by 's', got '{}'",
                settings.timeout
            )));
        }

        if settings.available_memory_mb < 0 || settings.max_instances < 0 {
            return Err(DeployerError::ConfigError(
                "available_memory_mb and max_instances cannot be negative".to_string(),
            ));
        }

        Ok(Self {
            runtime: settings.runtime,
            entry_point: settings.entry_point,
            description: settings.description,
            available_memory_mb: settings.available_memory_mb,
            timeout: settings.timeout,
            max_instances: settings.max_instances,
            environment_variables: settings.environment_variables,
            build_environment_variables: settings.build_environment_variables,
            ingress: settings.ingress_settings,
            network: NetworkConfig {
                network: settings.network,
                vpc_connector: settings.vpc_connector,
                egress: settings.vpc_connector_egress_settings,
            },
            labels: settings.labels,
            trigger,
        })
    }
}

/// `"60s"`, `"3.5s"`
fn is_valid_duration(value: &str) -> bool {
    value
        .strip_suffix('s')
        .and_then(|secs| secs.parse::<f64>().ok())
        .is_some_and(|secs| secs.is_finite() && secs >= 0.0)
}
