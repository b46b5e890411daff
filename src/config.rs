//! Configuration module for Courier.

use serde::Deserialize;
use std::path::Path;

use crate::{CourierError, Result};

/// Port that selects implicit TLS for SMTP.
pub const SMTP_IMPLICIT_TLS_PORT: u16 = 465;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted request body size in megabytes.
    #[serde(default = "default_body_limit")]
    pub body_limit_mb: usize,
    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_body_limit() -> usize {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_mb: default_body_limit(),
            cors_origins: vec![],
        }
    }
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    #[serde(default)]
    pub host: String,
    /// SMTP port. 465 selects implicit TLS, anything else STARTTLS.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Username to authenticate with.
    #[serde(default)]
    pub username: String,
    /// Password or app token.
    #[serde(default)]
    pub password: String,
    /// Default From address. Falls back to `username` when unset.
    #[serde(default)]
    pub default_from: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            default_from: None,
        }
    }
}

impl SmtpConfig {
    /// Whether the configured port uses implicit TLS.
    pub fn implicit_tls(&self) -> bool {
        self.port == SMTP_IMPLICIT_TLS_PORT
    }

    /// Resolve the sender address.
    pub fn sender(&self) -> Option<&str> {
        self.default_from
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.username.as_str()).filter(|s| !s.is_empty()))
    }
}

/// External asset host (Cloudinary-style unsigned upload API) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetHostConfig {
    /// Cloud/account name.
    #[serde(default)]
    pub cloud_name: Option<String>,
    /// Unsigned upload preset.
    #[serde(default)]
    pub upload_preset: Option<String>,
    /// Base URL of the upload API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Root folder for uploaded assets.
    #[serde(default = "default_folder")]
    pub folder: String,
}

fn default_api_base() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_folder() -> String {
    "email-assets".to_string()
}

impl Default for AssetHostConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            upload_preset: None,
            api_base: default_api_base(),
            folder: default_folder(),
        }
    }
}

impl AssetHostConfig {
    /// Account name and upload preset, if both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let cloud = self.cloud_name.as_deref().filter(|s| !s.is_empty())?;
        let preset = self.upload_preset.as_deref().filter(|s| !s.is_empty())?;
        Some((cloud, preset))
    }

    /// Whether uploads should be attempted.
    pub fn is_enabled(&self) -> bool {
        self.credentials().is_some()
    }
}

/// Image fetching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// Base filename used when the request does not supply one.
    #[serde(default = "default_filename")]
    pub default_filename: String,
    /// Content type assumed when the source omits one.
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_filename() -> String {
    "email-asset".to_string()
}

fn default_content_type() -> String {
    "image/jpeg".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_timeout() -> u64 {
    30
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            default_filename: default_filename(),
            default_content_type: default_content_type(),
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// SMTP configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Asset host configuration.
    #[serde(default)]
    pub asset_host: AssetHostConfig,
    /// Image fetching configuration.
    #[serde(default)]
    pub image: ImageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CourierError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CourierError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: HTTP listen port
    /// - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`, `DEFAULT_FROM`
    /// - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_UPLOAD_PRESET`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    ///
    /// A port override that is not a valid port number is an error; the
    /// configuration is left untouched in that case.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let server_port = get("PORT").map(|v| parse_port("PORT", &v)).transpose()?;
        let smtp_port = get("SMTP_PORT")
            .map(|v| parse_port("SMTP_PORT", &v))
            .transpose()?;

        if let Some(port) = server_port {
            self.server.port = port;
        }
        if let Some(host) = get("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = smtp_port {
            self.smtp.port = port;
        }
        if let Some(user) = get("SMTP_USER") {
            self.smtp.username = user;
        }
        if let Some(pass) = get("SMTP_PASS") {
            self.smtp.password = pass;
        }
        if let Some(from) = get("DEFAULT_FROM") {
            self.smtp.default_from = Some(from);
        }
        if let Some(cloud) = get("CLOUDINARY_CLOUD_NAME") {
            self.asset_host.cloud_name = Some(cloud);
        }
        if let Some(preset) = get("CLOUDINARY_UPLOAD_PRESET") {
            self.asset_host.upload_preset = Some(preset);
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - SMTP port is 0
    /// - The request body limit is 0
    pub fn validate(&self) -> Result<()> {
        if self.smtp.port == 0 {
            return Err(CourierError::Config("smtp.port must not be 0".to_string()));
        }
        if self.server.body_limit_mb == 0 {
            return Err(CourierError::Config(
                "server.body_limit_mb must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| CourierError::Config(format!("invalid {key} override {value:?}: {e}")))
}
