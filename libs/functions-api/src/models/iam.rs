use serde::{Deserialize, Serialize};

/// IAM policy attached to a function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,

    #[serde(default)]
    pub bindings: Vec<Binding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Associates members with a role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub role: String,

    #[serde(default)]
    pub members: Vec<String>,
}

/// Body of `{resource}:setIamPolicy`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetIamPolicyRequest {
    pub policy: Policy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
}
