//! Mail delivery transports.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::{CourierError, Result};

/// Something that can deliver a fully built message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver the message.
    async fn send(&self, message: Message) -> Result<()>;
}

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS from the first byte (port 465).
    Implicit,
    /// Plain connection upgraded with STARTTLS, which the relay must offer.
    StartTls,
}

impl TlsMode {
    /// Pick the mode for a relay configuration.
    pub fn for_config(config: &SmtpConfig) -> Self {
        if config.implicit_tls() {
            Self::Implicit
        } else {
            Self::StartTls
        }
    }
}

/// SMTP delivery through a configured relay.
///
/// A fresh connection is built for every send; no connection state is shared
/// between invocations.
#[derive(Debug, Clone)]
pub struct SmtpMailTransport {
    config: SmtpConfig,
}

impl SmtpMailTransport {
    /// Create a transport for the given relay configuration.
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// TLS mode used for this relay.
    pub fn tls_mode(&self) -> TlsMode {
        TlsMode::for_config(&self.config)
    }

    /// Build the lettre transport.
    ///
    /// Port 465 uses implicit TLS, every other port upgrades with STARTTLS.
    pub fn build(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        self.build_with(self.tls_mode())
    }

    fn build_with(&self, mode: TlsMode) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let host = self.config.host.trim();
        if host.is_empty() {
            return Err(CourierError::Smtp("SMTP host is not configured".to_string()));
        }

        let builder = match mode {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
        };
        let builder = builder
            .map_err(|e| CourierError::Smtp(format!("failed to create SMTP transport: {e}")))?
            .port(self.config.port);

        let builder = if self.config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: Message) -> Result<()> {
        let transport = self.build()?;

        tracing::debug!(
            host = %self.config.host,
            port = self.config.port,
            tls = ?self.tls_mode(),
            "Connecting to SMTP relay"
        );

        transport
            .send(message)
            .await
            .map_err(|e| CourierError::Smtp(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn config(host: &str, port: u16) -> SmtpConfig {
        SmtpConfig {
            host: host.to_string(),
            port,
            username: "user@example.com".to_string(),
            password: "secret".to_string(),
            default_from: None,
        }
    }

    fn message() -> Message {
        Message::builder()
            .from("sender@example.com".parse().unwrap())
            .to("rcpt@example.com".parse().unwrap())
            .subject("Test")
            .body("body".to_string())
            .unwrap()
    }

    #[test]
    fn test_build_requires_host() {
        let transport = SmtpMailTransport::new(&config("", 587));
        let err = transport.build().unwrap_err();
        assert!(err.to_string().contains("SMTP host is not configured"));
    }

    /// Accept one connection, greet in plain text without offering STARTTLS
    /// and hand back the first bytes the client sent.
    async fn plaintext_relay() -> (u16, JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"220 relay.test ESMTP\r\n").await.unwrap();

            let mut buf = vec![0u8; 1024];
            let n = stream.read(&mut buf).await.unwrap();
            buf.truncate(n);

            let _ = stream.write_all(b"250 relay.test\r\n").await;
            buf
        });

        (port, handle)
    }

    #[test]
    fn test_tls_mode_by_port() {
        assert_eq!(
            SmtpMailTransport::new(&config("smtp.example.com", 465)).tls_mode(),
            TlsMode::Implicit
        );
        assert_eq!(
            SmtpMailTransport::new(&config("smtp.example.com", 587)).tls_mode(),
            TlsMode::StartTls
        );
        assert_eq!(
            SmtpMailTransport::new(&config("smtp.example.com", 25)).tls_mode(),
            TlsMode::StartTls
        );
    }

    #[test]
    fn test_build_starttls() {
        let transport = SmtpMailTransport::new(&config("smtp.example.com", 587));
        assert!(transport.build().is_ok());
    }

    #[test]
    fn test_build_implicit_tls() {
        let transport = SmtpMailTransport::new(&config("smtp.example.com", 465));
        assert!(transport.build().is_ok());
    }

    #[tokio::test]
    async fn test_starttls_speaks_plain_smtp_first() {
        let (port, relay) = plaintext_relay().await;
        let transport = SmtpMailTransport::new(&config("127.0.0.1", port));

        let result = transport
            .build_with(TlsMode::StartTls)
            .unwrap()
            .send(message())
            .await;
        let received = relay.await.unwrap();

        // The relay never offered STARTTLS, so the send must not go through.
        assert!(result.is_err());
        assert!(received.starts_with(b"EHLO"), "{:?}", received);
    }

    #[tokio::test]
    async fn test_implicit_tls_starts_with_handshake() {
        let (port, relay) = plaintext_relay().await;
        let transport = SmtpMailTransport::new(&config("127.0.0.1", port));

        let result = transport
            .build_with(TlsMode::Implicit)
            .unwrap()
            .send(message())
            .await;
        let received = relay.await.unwrap();

        assert!(result.is_err());
        // 0x16 is the TLS handshake record type (ClientHello).
        assert_eq!(received.first(), Some(&0x16));
    }

    #[tokio::test]
    async fn test_send_unreachable_relay() {
        // Port 1 on loopback refuses connections.
        let transport = SmtpMailTransport::new(&config("127.0.0.1", 1));
        let err = transport.send(message()).await.unwrap_err();
        assert!(matches!(err, CourierError::Smtp(_)));
    }
}
