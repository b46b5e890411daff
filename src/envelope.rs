//! Result envelope shared by the mail and image components.
//!
//! Every invocation produces exactly one envelope: an HTTP status plus a JSON
//! body. Success bodies carry `message` or `url`; failures carry `error` and,
//! optionally, a `details` string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Status code and JSON body produced by a component invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    status: StatusCode,
    body: Value,
}

impl Envelope {
    /// 200 with `{"message": ...}`.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "message": message.into() }),
        }
    }

    /// 200 with `{"url": ...}`.
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "url": url.into() }),
        }
    }

    /// Error envelope with `{"error": ...}`.
    pub fn error(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error.into() }),
        }
    }

    /// Error envelope with `{"error": ..., "details": ...}`.
    pub fn error_with_details(
        status: StatusCode,
        error: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: json!({ "error": error.into(), "details": details.into() }),
        }
    }

    /// 400 with `{"error": ...}`.
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::error(StatusCode::BAD_REQUEST, error)
    }

    /// 405 for anything other than POST.
    pub fn method_not_allowed() -> Self {
        Self::error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    /// 500 carrying the failure detail as a string.
    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::error_with_details(StatusCode::INTERNAL_SERVER_ERROR, error, details)
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// JSON body.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// JSON-encoded body as sent on the wire.
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
