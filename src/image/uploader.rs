//! Asset host upload stage.
//!
//! Uploads go to a Cloudinary-style unsigned upload endpoint:
//! `POST {api_base}/{cloud_name}/image/upload` with a multipart body carrying
//! `file`, `upload_preset` and `folder`.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use super::types::{FetchedImage, UploadOutcome};
use crate::config::AssetHostConfig;
use crate::error::{CourierError, Result};

/// Extension appended to every uploaded filename, whatever the source type.
pub const UPLOAD_EXTENSION: &str = "jpg";

/// Upload API response.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Uploads fetched images to the configured asset host.
#[derive(Debug, Clone)]
pub struct AssetUploader {
    client: Client,
    config: AssetHostConfig,
}

impl AssetUploader {
    /// Create an uploader around an existing client.
    pub fn new(client: Client, config: &AssetHostConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Whether uploads will be attempted.
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Upload endpoint for the given account.
    pub fn endpoint(&self, cloud_name: &str) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.api_base.trim_end_matches('/'),
            cloud_name
        )
    }

    /// Folder for an optional usage hint.
    pub fn folder_for(&self, usage: Option<&str>) -> String {
        match usage {
            Some(usage) => format!("{}/{}", self.config.folder, usage),
            None => self.config.folder.clone(),
        }
    }

    /// Try to upload, converting every failure into [`UploadOutcome::FallBack`].
    pub async fn attempt(
        &self,
        image: &FetchedImage,
        filename: &str,
        usage: Option<&str>,
    ) -> UploadOutcome {
        if !self.is_enabled() {
            tracing::debug!("Asset host not configured, using data URI");
            return UploadOutcome::FallBack;
        }

        match self.upload(image, filename, usage).await {
            Ok(url) => UploadOutcome::Uploaded(url),
            Err(e) => {
                tracing::warn!(
                    cloud_name = self.config.cloud_name.as_deref().unwrap_or_default(),
                    folder = %self.folder_for(usage),
                    error = %e,
                    "Asset upload failed, falling back to data URI"
                );
                UploadOutcome::FallBack
            }
        }
    }

    /// Upload the image and return its secure URL.
    pub async fn upload(
        &self,
        image: &FetchedImage,
        filename: &str,
        usage: Option<&str>,
    ) -> Result<String> {
        let (cloud_name, preset) = self
            .config
            .credentials()
            .ok_or_else(|| CourierError::Config("asset host is not configured".to_string()))?;

        let part = Part::bytes(image.bytes.clone())
            .file_name(format!("{}.{}", filename, UPLOAD_EXTENSION));
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", preset.to_string())
            .text("folder", self.folder_for(usage));

        let response = self
            .client
            .post(self.endpoint(cloud_name))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CourierError::Upload(e.to_string()))?;

        let status = response.status();
        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|e| CourierError::Upload(format!("invalid upload response: {}", e)))?;

        if !status.is_success() {
            let message = payload
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Cloudinary upload failed".to_string());
            return Err(CourierError::Upload(message));
        }

        let url = payload
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| CourierError::Upload("upload response has no secure_url".to_string()))?;

        tracing::info!(url = %url, "Uploaded image to asset host");
        Ok(url)
    }
}
