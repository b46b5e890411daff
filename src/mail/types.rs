//! Mail types for Courier.

use serde::Deserialize;
use validator::Validate;

use crate::request::invalid_fields;
use crate::{CourierError, Result};

/// Fields a mail request must carry, in reporting order.
pub const REQUIRED_FIELDS: &[&str] = &["to", "subject", "html"];

/// Incoming request to send an HTML email.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct MailRequest {
    /// Recipient address, or a comma-separated list of addresses.
    #[validate(required, length(min = 1))]
    pub to: Option<String>,
    /// Subject line.
    #[validate(required, length(min = 1))]
    pub subject: Option<String>,
    /// HTML body.
    #[validate(required, length(min = 1))]
    pub html: Option<String>,
    /// Optional plain-text alternative.
    pub text: Option<String>,
}

/// A validated mail ready to be turned into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address list as supplied.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html: String,
    /// Plain-text alternative. Never empty.
    pub text: Option<String>,
}

impl OutgoingMail {
    /// Create a mail without a plain-text alternative.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
            text: None,
        }
    }

    /// Attach a plain-text alternative. An empty string leaves it unset.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.is_empty()).then_some(text);
        self
    }
}

impl TryFrom<MailRequest> for OutgoingMail {
    type Error = CourierError;

    /// Convert a request whose required fields pass validation.
    ///
    /// The failing fields are reported in [`REQUIRED_FIELDS`] order.
    fn try_from(req: MailRequest) -> Result<Self> {
        req.validate().map_err(|errors| {
            CourierError::Validation(invalid_fields(&errors, REQUIRED_FIELDS).join(", "))
        })?;

        let MailRequest {
            to: Some(to),
            subject: Some(subject),
            html: Some(html),
            text,
        } = req
        else {
            return Err(CourierError::Validation(REQUIRED_FIELDS.join(", ")));
        };

        Ok(Self::new(to, subject, html).with_text(text.unwrap_or_default()))
    }
}
