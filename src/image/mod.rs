//! Image rehosting for Courier.
//!
//! This module fetches a remote image and makes it embeddable in HTML email:
//! - Upload to an external asset host when one is configured
//! - Inline `data:` URI fallback when the host is absent or the upload fails

mod encode;
mod fetcher;
mod service;
mod types;
mod uploader;

pub use encode::encode_data_uri;
pub use fetcher::{build_client, validate_url, ImageFetcher, USER_AGENT};
pub use service::{ImageRehoster, MISSING_SOURCE_MESSAGE, PROCESS_FAILED_MESSAGE};
pub use types::{FetchedImage, ImageHostRequest, RehostedImage, UploadOutcome, REQUIRED_FIELDS};
pub use uploader::{AssetUploader, UPLOAD_EXTENSION};
