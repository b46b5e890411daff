//! Email send handler.

use axum::{body::Bytes, extract::State, http::Method};
use std::sync::Arc;

use super::AppState;
use crate::envelope::Envelope;

/// ANY /send - Send an HTML email. Only POST is accepted.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Envelope {
    state.mailer.handle(&method, &body).await
}
