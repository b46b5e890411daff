//! Route handlers.
//!
//! Handlers only adapt the HTTP request into a component invocation; the
//! method check, validation and error mapping all live in the components.

pub mod image;
pub mod send;

pub use image::host_email_image;
pub use send::send_email;

use crate::config::Config;
use crate::image::ImageRehoster;
use crate::mail::Mailer;
use crate::Result;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Outbound mailer.
    pub mailer: Mailer,
    /// Image rehoster.
    pub rehoster: ImageRehoster,
}

impl AppState {
    /// Build application state from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            mailer: Mailer::new(&config.smtp),
            rehoster: ImageRehoster::new(&config.image, &config.asset_host)?,
        })
    }

    /// Build application state from already constructed components.
    pub fn from_parts(mailer: Mailer, rehoster: ImageRehoster) -> Self {
        Self { mailer, rehoster }
    }
}
