//! Web server for Courier.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{Config, ServerConfig};
use crate::{CourierError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// HTTP server exposing the mail and image endpoints.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Server configuration.
    server_config: ServerConfig,
}

impl WebServer {
    /// Create a new web server from the full configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let app_state = AppState::new(config)?;
        Self::with_state(&config.server, Arc::new(app_state))
    }

    /// Create a new web server around existing application state.
    ///
    /// `config.host` must be an IP address.
    pub fn with_state(config: &ServerConfig, app_state: Arc<AppState>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                CourierError::Config(format!(
                    "invalid server address {}:{}: {}",
                    config.host, config.port, e
                ))
            })?;

        Ok(Self {
            addr,
            app_state,
            server_config: config.clone(),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(&self) -> Router {
        create_router(self.app_state.clone(), &self.server_config).merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
