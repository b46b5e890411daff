//! Outbound mail for Courier.
//!
//! This module turns a JSON mail request into a MIME message and hands it
//! to a [`MailTransport`], by default an SMTP relay configured through
//! [`SmtpConfig`](crate::config::SmtpConfig).

mod service;
mod transport;
mod types;

pub use service::{Mailer, MISSING_FIELDS_MESSAGE, SEND_FAILED_MESSAGE, SENT_MESSAGE};
pub use transport::{MailTransport, SmtpMailTransport};
pub use types::{MailRequest, OutgoingMail, REQUIRED_FIELDS};
