//! Provider capabilities used by the pipeline
//!
//! The reconciler, poller and publisher only see these traits, so they can
//! be exercised against a fake provider. [`crate::http::client::HttpClient`]
//! implements both traits for the real API.

use async_trait::async_trait;

use functions_api::{CloudFunction, Operation, Policy, SetIamPolicyRequest};

use crate::errors::DeployerError;

/// Result of looking up a function by name
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionLookup {
    Found(Box<CloudFunction>),
    NotFound,
}

/// Function management calls
#[async_trait]
pub trait FunctionsProvider: Send + Sync {
    /// Fetch a function. A `404` is reported as [`FunctionLookup::NotFound`].
    async fn get_function(&self, name: &str) -> Result<FunctionLookup, DeployerError>;

    /// Create a function under `parent` (`projects/{p}/locations/{r}`)
    async fn create_function(
        &self,
        parent: &str,
        function: &CloudFunction,
    ) -> Result<Operation, DeployerError>;

    /// Patch `function.name`, restricted to the fields in `update_mask`
    async fn update_function(
        &self,
        function: &CloudFunction,
        update_mask: &str,
    ) -> Result<Operation, DeployerError>;

    /// Re-fetch an operation by name
    async fn get_operation(&self, name: &str) -> Result<Operation, DeployerError>;

    /// Replace the IAM policy of a function
    async fn set_iam_policy(
        &self,
        resource: &str,
        request: &SetIamPolicyRequest,
    ) -> Result<Policy, DeployerError>;
}

/// Archive upload calls
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Obtain a signed URL to upload an archive for functions under `parent`
    async fn generate_upload_url(&self, parent: &str) -> Result<String, DeployerError>;

    /// Upload a zip archive to a signed URL
    async fn upload_archive(&self, upload_url: &str, archive: Vec<u8>)
        -> Result<(), DeployerError>;
}
