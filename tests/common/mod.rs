//! Test helpers for integration tests.
//!
//! Provides an in-memory mail transport and throw-away upstream servers that
//! stand in for the image source and the asset host.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_test::TestServer;
use lettre::Message;
use serde_json::json;
use tokio::net::TcpListener;

use courier::config::{AssetHostConfig, ImageConfig, ServerConfig, SmtpConfig};
use courier::web::{create_router, AppState};
use courier::{CourierError, ImageRehoster, MailTransport, Mailer};

/// PNG signature followed by bytes that are not valid UTF-8.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0x00, 0xFE,
];

/// Bytes served without a content type.
pub const RAW_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

/// Transport that records every message instead of delivering it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    /// Raw messages delivered so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: Message) -> courier::Result<()> {
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        self.sent.lock().unwrap().push(raw);
        Ok(())
    }
}

/// Transport that always fails like a rejecting relay.
pub struct RejectingTransport;

#[async_trait]
impl MailTransport for RejectingTransport {
    async fn send(&self, _message: Message) -> courier::Result<()> {
        Err(CourierError::Smtp(
            "permanent error (550): mailbox unavailable".to_string(),
        ))
    }
}

/// Upload received by the fake asset host.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub cloud_name: String,
    pub file_name: Option<String>,
    pub file: Vec<u8>,
    pub upload_preset: Option<String>,
    pub folder: Option<String>,
}

/// Uploads seen by the fake asset host.
pub type Uploads = Arc<Mutex<Vec<ReceivedUpload>>>;

/// Bind a router on an ephemeral loopback port and serve it in the background.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Upstream server failed");
    });
    addr
}

/// Start a fake image source.
///
/// - `/logo.png` serves [`PNG_BYTES`] as `image/png`
/// - `/raw` serves [`RAW_BYTES`] with no content type
/// - `/overloaded` answers 599, a code with no registered reason
/// - anything else is 404
pub async fn spawn_image_source() -> SocketAddr {
    let router = Router::new()
        .route(
            "/logo.png",
            get(|| async { ([(CONTENT_TYPE, "image/png")], PNG_BYTES.to_vec()) }),
        )
        .route(
            "/raw",
            get(|| async { Response::new(Body::from(RAW_BYTES.to_vec())) }),
        )
        .route(
            "/overloaded",
            get(|| async { StatusCode::from_u16(599).unwrap_or(StatusCode::SERVICE_UNAVAILABLE) }),
        )
        .fallback(|| async { StatusCode::NOT_FOUND });
    spawn(router).await
}

async fn upload(
    State(uploads): State<Uploads>,
    Path(cloud_name): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut received = ReceivedUpload {
        cloud_name: cloud_name.clone(),
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap();
        match name.as_str() {
            "file" => {
                received.file_name = file_name;
                received.file = data.to_vec();
            }
            "upload_preset" => {
                received.upload_preset = Some(String::from_utf8_lossy(&data).into_owned());
            }
            "folder" => {
                received.folder = Some(String::from_utf8_lossy(&data).into_owned());
            }
            _ => {}
        }
    }

    let folder = received.folder.clone().unwrap_or_default();
    let file_name = received.file_name.clone().unwrap_or_default();
    uploads.lock().unwrap().push(received);

    match cloud_name.as_str() {
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": "Upload preset not found" } })),
        )
            .into_response(),
        "no-url" => Json(json!({ "public_id": "x" })).into_response(),
        _ => Json(json!({
            "secure_url": format!(
                "https://res.example.com/{}/image/upload/{}/{}",
                cloud_name, folder, file_name
            )
        }))
        .into_response(),
    }
}

/// Start a fake asset host.
///
/// Cloud name `broken` answers 500, `no-url` answers 200 without a
/// `secure_url`, every other name succeeds.
pub async fn spawn_asset_host() -> (SocketAddr, Uploads) {
    let uploads: Uploads = Arc::default();
    let router = Router::new()
        .route("/:cloud_name/image/upload", post(upload))
        .with_state(uploads.clone());
    (spawn(router).await, uploads)
}

/// SMTP configuration used by the tests; never contacted.
pub fn smtp_config() -> SmtpConfig {
    SmtpConfig {
        host: "smtp.example.com".to_string(),
        username: "robot@example.com".to_string(),
        default_from: Some("news@example.com".to_string()),
        ..Default::default()
    }
}

/// Asset host configuration pointing at a fake host.
pub fn asset_host_config(addr: SocketAddr, cloud_name: &str) -> AssetHostConfig {
    AssetHostConfig {
        cloud_name: Some(cloud_name.to_string()),
        upload_preset: Some("unsigned-preset".to_string()),
        api_base: format!("http://{}", addr),
        ..Default::default()
    }
}

/// Create a test server with the given transport and asset host configuration.
pub fn create_test_server(
    transport: Arc<dyn MailTransport>,
    asset_host: AssetHostConfig,
) -> TestServer {
    let mailer = Mailer::with_transport(&smtp_config(), transport);
    let rehoster =
        ImageRehoster::new(&ImageConfig::default(), &asset_host).expect("Failed to create rehoster");
    let state = Arc::new(AppState::from_parts(mailer, rehoster));

    let router = create_router(state, &ServerConfig::default());
    TestServer::new(router).expect("Failed to create test server")
}
