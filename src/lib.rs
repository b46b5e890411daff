//! Courier - email delivery and email image hosting over HTTP.
//!
//! Two endpoints: one sends HTML email through an SMTP relay, the other
//! fetches a remote image and rehosts it on an asset host or inline as a
//! `data:` URI.

pub mod config;
pub mod envelope;
pub mod error;
pub mod image;
pub mod logging;
pub mod mail;
pub mod request;
pub mod web;

pub use config::Config;
pub use envelope::Envelope;
pub use error::{CourierError, Result};
pub use image::{ImageHostRequest, ImageRehoster, RehostedImage, UploadOutcome};
pub use mail::{MailRequest, MailTransport, Mailer, OutgoingMail, SmtpMailTransport};
pub use web::{AppState, WebServer};
