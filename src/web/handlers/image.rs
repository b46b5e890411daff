//! Email image hosting handler.

use axum::{body::Bytes, extract::State, http::Method};
use std::sync::Arc;

use super::AppState;
use crate::envelope::Envelope;

/// ANY /host-email-image - Rehost a remote image. Only POST is accepted.
pub async fn host_email_image(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Envelope {
    state.rehoster.handle(&method, &body).await
}
