use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A Cloud Function resource.
///
/// Fields this crate does not model are kept in `extra` so that a resource
/// fetched from the API can be sent back without losing anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFunction {
    /// `projects/{project}/locations/{region}/functions/{name}`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_upload_url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_archive_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https_trigger: Option<HttpsTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_trigger: Option<EventTrigger>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entry_point: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runtime: String,

    /// Duration string such as `"60s"`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timeout: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub available_memory_mb: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_account_email: String,

    /// Assigned by the provider, incremented on every successful deploy
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "int64_string"
    )]
    pub version_id: Option<i64>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environment_variables: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub build_environment_variables: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub network: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_instances: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc_connector: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vpc_connector_egress_settings: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ingress_settings: String,

    /// Everything else the API returned
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// HTTP trigger. Sent empty on create; the provider fills in `url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpsTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_level: Option<String>,
}

/// Event trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTrigger {
    pub event_type: String,

    pub resource: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_policy: Option<FailurePolicy>,
}

/// Failure policy. Presence of `retry` enables retries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailurePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<Retry>,
}

/// Marker object, always serialized as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Retry {}

/// The API encodes int64 values as JSON strings. Numbers are accepted too.
pub(crate) mod int64_string {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Num(i64),
    }

    pub fn serialize<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Num(n)) => Ok(Some(n)),
            Some(Repr::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
