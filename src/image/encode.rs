//! Inline encoding of image bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode bytes as a `data:` URI with a base64 payload.
pub fn encode_data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}
