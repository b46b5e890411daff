//! Image rehosting service.
//!
//! Request flow: validate, fetch the source, try the asset host, and fall
//! back to an inline `data:` URI when the upload is unavailable or fails.

use axum::http::{Method, StatusCode};

use super::encode::encode_data_uri;
use super::fetcher::{build_client, ImageFetcher};
use super::types::{ImageHostRequest, RehostedImage, UploadOutcome, REQUIRED_FIELDS};
use super::uploader::AssetUploader;
use crate::config::{AssetHostConfig, ImageConfig};
use crate::envelope::Envelope;
use crate::request;
use crate::{CourierError, Result};

/// Error returned when `source_url` is missing.
pub const MISSING_SOURCE_MESSAGE: &str = "source_url is required";

/// Error returned for unexpected failures.
pub const PROCESS_FAILED_MESSAGE: &str = "Failed to process image";

/// Fetches images and rehosts them on the asset host or inline.
#[derive(Debug, Clone)]
pub struct ImageRehoster {
    fetcher: ImageFetcher,
    uploader: AssetUploader,
    default_filename: String,
}

impl ImageRehoster {
    /// Create a rehoster from configuration.
    pub fn new(image: &ImageConfig, asset_host: &AssetHostConfig) -> Result<Self> {
        let client = build_client(image)?;
        Ok(Self {
            fetcher: ImageFetcher::new(client.clone(), image),
            uploader: AssetUploader::new(client, asset_host),
            default_filename: image.default_filename.clone(),
        })
    }

    /// Handle one invocation of the image endpoint.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Envelope {
        if *method != Method::POST {
            return Envelope::method_not_allowed();
        }

        let req = match request::decode::<ImageHostRequest>(body, REQUIRED_FIELDS) {
            Ok(req) => req,
            Err(CourierError::Validation(_)) => {
                return Envelope::bad_request(MISSING_SOURCE_MESSAGE);
            }
            Err(e) => {
                return Envelope::error_with_details(
                    StatusCode::BAD_REQUEST,
                    "Invalid JSON body",
                    e.to_string(),
                );
            }
        };

        match self.rehost(&req).await {
            Ok(image) => Envelope::url(image.into_url()),
            Err(CourierError::UpstreamStatus(status)) => {
                tracing::info!(status = %status, "Source image fetch rejected");
                Envelope::bad_request(format!("Failed to fetch source_url: {}", status))
            }
            Err(CourierError::Validation(msg)) => Envelope::bad_request(msg),
            Err(e) => {
                tracing::error!(error = %e, "Failed to process image");
                Envelope::internal(PROCESS_FAILED_MESSAGE, e.to_string())
            }
        }
    }

    /// Fetch the source image and rehost it.
    pub async fn rehost(&self, req: &ImageHostRequest) -> Result<RehostedImage> {
        let source_url = req
            .source_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CourierError::Validation(MISSING_SOURCE_MESSAGE.to_string()))?;

        let image = self.fetcher.fetch(source_url).await?;
        let filename = req.filename_or(&self.default_filename);

        match self.uploader.attempt(&image, filename, req.usage()).await {
            UploadOutcome::Uploaded(url) => Ok(RehostedImage::Hosted(url)),
            UploadOutcome::FallBack => Ok(RehostedImage::DataUri(encode_data_uri(
                &image.content_type,
                &image.bytes,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rehoster() -> ImageRehoster {
        ImageRehoster::new(&ImageConfig::default(), &AssetHostConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_non_post() {
        let env = rehoster()
            .handle(&Method::GET, br#"{"source_url":"http://127.0.0.1:1/a.png"}"#)
            .await;
        assert_eq!(env.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_source_url() {
        let env = rehoster().handle(&Method::POST, br#"{"usage":"header"}"#).await;
        assert_eq!(env.status(), StatusCode::BAD_REQUEST);
        assert_eq!(env.body()["error"], MISSING_SOURCE_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let env = rehoster().handle(&Method::POST, b"[1, 2").await;
        assert_eq!(env.status(), StatusCode::BAD_REQUEST);
        assert_eq!(env.body()["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_unsupported_scheme_is_bad_request() {
        let env = rehoster()
            .handle(&Method::POST, br#"{"source_url":"ftp://example.com/a.png"}"#)
            .await;
        assert_eq!(env.status(), StatusCode::BAD_REQUEST);
        assert!(env.body()["error"]
            .as_str()
            .unwrap()
            .contains("unsupported source_url scheme"));
    }

    #[tokio::test]
    async fn test_unreachable_source_is_internal_error() {
        let env = rehoster()
            .handle(&Method::POST, br#"{"source_url":"http://127.0.0.1:1/a.png"}"#)
            .await;
        assert_eq!(env.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(env.body()["error"], PROCESS_FAILED_MESSAGE);
        assert!(env.body()["details"].is_string());
    }
}
