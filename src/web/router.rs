//! Router configuration for the HTTP front door.

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{host_email_image, send_email, AppState};
use super::middleware::create_cors_layer;
use crate::config::ServerConfig;

/// Create the main router.
///
/// Both component routes accept every method so that the components
/// themselves answer non-POST requests with 405.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/send", any(send_email))
        .route("/host-email-image", any(host_email_image))
        .layer(DefaultBodyLimit::max(config.body_limit_mb * 1024 * 1024))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&config.cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
