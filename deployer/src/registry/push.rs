//! Archive push
//!
//! Uploads a zip archive through a signed URL and hands the reconciler an
//! [`ArtifactRef`].

use tracing::{debug, info};

use crate::deploy::progress::ProgressSink;
use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::models::ArtifactRef;
use crate::provider::ArtifactStore;
use crate::utils::sha256_hash;

/// Largest archive accepted, in bytes
pub const MAX_ARCHIVE_SIZE: u64 = 100_000_000;

fn check_size(size: u64, progress: &dyn ProgressSink) -> Result<(), DeployerError> {
    if size > MAX_ARCHIVE_SIZE {
        progress.error("File size should not exceed 100MB");
        return Err(DeployerError::ArtifactTooLarge {
            size,
            limit: MAX_ARCHIVE_SIZE,
        });
    }
    Ok(())
}

/// Upload `archive` for functions in `project` / `region`.
///
/// The size limit is checked before any network call.
pub async fn push<S>(
    store: &S,
    project: &str,
    region: &str,
    archive: &File,
    progress: &dyn ProgressSink,
) -> Result<ArtifactRef, DeployerError>
where
    S: ArtifactStore + ?Sized,
{
    progress.info("Pushing archive to Google Cloud Storage");

    check_size(archive.size().await?, progress)?;

    let parent = format!("projects/{}/locations/{}", project, region);
    let upload_url = store.generate_upload_url(&parent).await?;
    debug!("Obtained upload URL for {}", parent);

    // The file may have grown since it was measured
    let contents = archive.read_bytes_up_to(MAX_ARCHIVE_SIZE + 1).await?;
    let size = contents.len() as u64;
    check_size(size, progress)?;
    let sha256 = sha256_hash(&contents);

    if let Err(e) = store.upload_archive(&upload_url, contents).await {
        progress.error("Error uploading archive");
        return Err(e);
    }

    info!(
        "Uploaded {} ({} bytes, sha256 {})",
        archive.path().display(),
        size,
        sha256
    );
    progress.success("Cloud Function Archive successfully uploaded to Google Cloud Functions");

    Ok(ArtifactRef {
        source: upload_url,
        project: project.to_string(),
        region: region.to_string(),
        size,
        sha256,
    })
}
