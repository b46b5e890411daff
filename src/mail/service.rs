//! Outbound mail service.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Mailboxes, MultiPart};
use lettre::Message;

use super::transport::{MailTransport, SmtpMailTransport};
use super::types::{MailRequest, OutgoingMail, REQUIRED_FIELDS};
use crate::config::SmtpConfig;
use crate::envelope::Envelope;
use crate::request;
use crate::{CourierError, Result};

/// Confirmation returned after a successful send.
pub const SENT_MESSAGE: &str = "Email sent successfully";

/// Error returned when required fields are missing.
pub const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields: to, subject and html are required.";

/// Error returned when delivery fails.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send email";

/// Sends HTML email through a [`MailTransport`].
#[derive(Clone)]
pub struct Mailer {
    sender: Option<String>,
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    /// Create a mailer that delivers over SMTP.
    pub fn new(config: &SmtpConfig) -> Self {
        Self::with_transport(config, Arc::new(SmtpMailTransport::new(config)))
    }

    /// Create a mailer with a custom transport.
    pub fn with_transport(config: &SmtpConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            sender: config.sender().map(str::to_string),
            transport,
        }
    }

    /// Handle one invocation of the send endpoint.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Envelope {
        if *method != Method::POST {
            return Envelope::method_not_allowed();
        }

        let mail = match request::decode::<MailRequest>(body, REQUIRED_FIELDS)
            .and_then(OutgoingMail::try_from)
        {
            Ok(mail) => mail,
            Err(CourierError::Validation(missing)) => {
                tracing::debug!(missing = %missing, "Rejecting mail request");
                return Envelope::error_with_details(
                    StatusCode::BAD_REQUEST,
                    MISSING_FIELDS_MESSAGE,
                    missing,
                );
            }
            Err(e) => {
                return Envelope::error_with_details(
                    StatusCode::BAD_REQUEST,
                    "Invalid JSON body",
                    e.to_string(),
                );
            }
        };

        match self.send(&mail).await {
            Ok(()) => {
                tracing::info!(to = %mail.to, subject = %mail.subject, "Email sent");
                Envelope::message(SENT_MESSAGE)
            }
            Err(e) => {
                tracing::error!(to = %mail.to, error = %e, "Failed to send email");
                Envelope::internal(SEND_FAILED_MESSAGE, e.to_string())
            }
        }
    }

    /// Build and deliver a mail.
    pub async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = self.build_message(mail)?;
        self.transport.send(message).await
    }

    /// Build the MIME message for a mail.
    ///
    /// Without a text alternative the message is a single `text/html` part;
    /// with one it is `multipart/alternative` (plain, then HTML).
    pub fn build_message(&self, mail: &OutgoingMail) -> Result<Message> {
        let sender = self
            .sender
            .as_deref()
            .ok_or_else(|| CourierError::Smtp("no sender address configured".to_string()))?;
        let from: Mailbox = sender
            .parse()
            .map_err(|e| CourierError::Smtp(format!("invalid from address '{sender}': {e}")))?;
        let recipients: Mailboxes = mail
            .to
            .parse()
            .map_err(|e| CourierError::Smtp(format!("invalid recipient '{}': {e}", mail.to)))?;

        let mut builder = Message::builder().from(from).subject(mail.subject.clone());
        for mailbox in recipients {
            builder = builder.to(mailbox);
        }

        let message = match &mail.text {
            Some(text) => builder.multipart(MultiPart::alternative_plain_html(
                text.clone(),
                mail.html.clone(),
            )),
            None => builder
                .header(ContentType::TEXT_HTML)
                .body(mail.html.clone()),
        };

        message.map_err(|e| CourierError::Smtp(format!("failed to build message: {e}")))
    }
}
