//! Image rehosting types.

use serde::Deserialize;
use validator::Validate;

/// Fields an image request must carry, in reporting order.
pub const REQUIRED_FIELDS: &[&str] = &["source_url"];

/// Incoming request to rehost an image.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ImageHostRequest {
    /// Publicly reachable URL of the image.
    #[validate(required, length(min = 1))]
    pub source_url: Option<String>,
    /// Base filename for the uploaded asset.
    pub filename: Option<String>,
    /// Usage hint such as `header`; selects the upload sub-folder.
    pub usage: Option<String>,
}

impl ImageHostRequest {
    /// Filename to use, falling back to `default` when absent or empty.
    pub fn filename_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.filename
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(default)
    }

    /// Usage hint, if present and non-empty.
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref().filter(|s| !s.is_empty())
    }
}

/// Image bytes retrieved from the source URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    /// Raw body.
    pub bytes: Vec<u8>,
    /// Content type reported by the source, or the configured default.
    pub content_type: String,
}

/// Result of the upload stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The asset host accepted the image and returned its public URL.
    Uploaded(String),
    /// Upload was not configured or failed; encode inline instead.
    FallBack,
}

/// Final URL handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RehostedImage {
    /// Public URL on the asset host.
    Hosted(String),
    /// `data:` URI with the image inlined as base64.
    DataUri(String),
}

impl RehostedImage {
    /// The URL, whichever way the image was rehosted.
    pub fn url(&self) -> &str {
        match self {
            RehostedImage::Hosted(url) | RehostedImage::DataUri(url) => url,
        }
    }

    /// Consume and return the URL.
    pub fn into_url(self) -> String {
        match self {
            RehostedImage::Hosted(url) | RehostedImage::DataUri(url) => url,
        }
    }
}
