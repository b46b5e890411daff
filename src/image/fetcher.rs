//! Source image fetcher.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use url::Url;

use super::types::FetchedImage;
use crate::config::ImageConfig;
use crate::error::{CourierError, Result};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for outbound requests.
pub const USER_AGENT: &str = "Courier/0.1 (email asset fetcher)";

/// Build the HTTP client shared by the fetch and upload stages.
pub fn build_client(config: &ImageConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CourierError::Http(format!("failed to create HTTP client: {}", e)))
}

/// Fetches images from caller-supplied URLs.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
    default_content_type: String,
}

impl ImageFetcher {
    /// Create a fetcher around an existing client.
    pub fn new(client: Client, config: &ImageConfig) -> Self {
        Self {
            client,
            default_content_type: config.default_content_type.clone(),
        }
    }

    /// Fetch the image at `url`.
    ///
    /// Errors:
    /// - [`CourierError::Validation`] if the URL is unusable
    /// - [`CourierError::UpstreamStatus`] if the source answers with a non-2xx status
    /// - [`CourierError::Fetch`] if no response could be read
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let url = validate_url(url)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CourierError::Fetch(format!("failed to fetch image: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CourierError::UpstreamStatus(status_line(status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.default_content_type)
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CourierError::Fetch(format!("failed to read response: {}", e)))?;

        tracing::debug!(
            content_type = %content_type,
            size = bytes.len(),
            "Fetched source image"
        );

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Status code and reason phrase, e.g. `404 Not Found`.
///
/// Codes without a registered reason are reported by number alone.
pub fn status_line(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("");
    format!("{} {}", status.as_str(), reason).trim().to_string()
}

/// Parse a source URL and check that it uses http or https.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| CourierError::Validation(format!("invalid source_url: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(CourierError::Validation(format!(
            "unsupported source_url scheme: {}",
            scheme
        ))),
    }
}
