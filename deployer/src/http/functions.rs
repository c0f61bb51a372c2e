//! Functions API client

use async_trait::async_trait;

use functions_api::{CloudFunction, Operation, Policy, SetIamPolicyRequest};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::provider::{FunctionLookup, FunctionsProvider};

#[async_trait]
impl FunctionsProvider for HttpClient {
    async fn get_function(&self, name: &str) -> Result<FunctionLookup, DeployerError> {
        let url = self.url(name, &[])?;
        match self.get::<CloudFunction>(url).await {
            Ok(function) => Ok(FunctionLookup::Found(Box::new(function))),
            Err(e) if e.is_not_found() => Ok(FunctionLookup::NotFound),
            Err(e) => Err(e),
        }
    }

    async fn create_function(
        &self,
        parent: &str,
        function: &CloudFunction,
    ) -> Result<Operation, DeployerError> {
        let url = self.url(&format!("{}/functions", parent), &[])?;
        self.post(url, function).await
    }

    async fn update_function(
        &self,
        function: &CloudFunction,
        update_mask: &str,
    ) -> Result<Operation, DeployerError> {
        let url = self.url(&function.name, &[("updateMask", update_mask)])?;
        self.patch(url, function).await
    }

    async fn get_operation(&self, name: &str) -> Result<Operation, DeployerError> {
        let url = self.url(name, &[])?;
        self.get(url).await
    }

    async fn set_iam_policy(
        &self,
        resource: &str,
        request: &SetIamPolicyRequest,
    ) -> Result<Policy, DeployerError> {
        let url = self.url(&format!("{}:setIamPolicy", resource), &[])?;
        self.post(url, request).await
    }
}
