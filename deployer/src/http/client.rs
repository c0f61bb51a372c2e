//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use functions_api::ErrorResponse;

use crate::errors::{ApiError, DeployerError};
use crate::utils::version_info;

/// HTTP client for the Cloud Functions API
pub struct HttpClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        access_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, DeployerError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(version_info().user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// The underlying client, for requests outside the API such as signed URLs
    pub(crate) fn raw(&self) -> &Client {
        &self.client
    }

    /// Build an API URL from a resource path and query parameters
    pub(crate) fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, DeployerError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw)
            .map_err(|e| DeployerError::ConfigError(format!("Invalid API URL {}: {}", raw, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, DeployerError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, self.bearer())
            .send()
            .await?;

        Self::parse(response, "GET").await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, DeployerError> {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, self.bearer())
            .json(body)
            .send()
            .await?;

        Self::parse(response, "POST").await
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, DeployerError> {
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(url)
            .header(header::AUTHORIZATION, self.bearer())
            .json(body)
            .send()
            .await?;

        Self::parse(response, "PATCH").await
    }

    async fn parse<T: DeserializeOwned>(response: Response, method: &str) -> Result<T, DeployerError> {
        if !response.status().is_success() {
            let err = api_error(response).await;
            if err.is_not_found() {
                debug!("HTTP {} not found: {}", method, err.message);
            } else {
                error!("HTTP {} failed: {}", method, err);
            }
            return Err(err.into());
        }

        let body = response.json().await?;
        Ok(body)
    }
}

/// Turn a non-2xx response into an [`ApiError`], keeping the raw body when it
/// is not a standard error envelope
pub(crate) async fn api_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => ApiError {
            status,
            reason: parsed.error.status,
            message: parsed.error.message,
        },
        Err(_) => ApiError {
            status,
            reason: String::new(),
            message: body,
        },
    }
}
