//! Archive upload client

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, error};

use functions_api::{GenerateUploadUrlRequest, GenerateUploadUrlResponse};

use crate::errors::DeployerError;
use crate::http::client::HttpClient;
use crate::provider::ArtifactStore;

/// Size range the signed URL accepts, sent with every upload
pub const CONTENT_LENGTH_RANGE: &str = "0,104857600";

#[async_trait]
impl ArtifactStore for HttpClient {
    async fn generate_upload_url(&self, parent: &str) -> Result<String, DeployerError> {
        let url = self.url(&format!("{}/functions:generateUploadUrl", parent), &[])?;
        let response: GenerateUploadUrlResponse =
            self.post(url, &GenerateUploadUrlRequest::default()).await?;
        Ok(response.upload_url)
    }

    async fn upload_archive(
        &self,
        upload_url: &str,
        archive: Vec<u8>,
    ) -> Result<(), DeployerError> {
        debug!("PUT {} ({} bytes)", upload_url, archive.len());

        let response = self
            .raw()
            .put(upload_url)
            .header(header::CONTENT_TYPE, "application/zip")
            .header("x-goog-content-length-range", CONTENT_LENGTH_RANGE)
            .body(archive)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() > 299 {
            error!("Archive upload failed: {}", status);
            return Err(DeployerError::UploadError(format!("{}\n\n{}", status, body)));
        }

        Ok(())
    }
}
