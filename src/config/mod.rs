//! Configuration management for mail9
//!
//! Everything comes from `MAIL9_*` environment variables (a `.env` file is
//! honored in development). Provider selection happens here, once, at
//! startup: SMTP settings take precedence over a Resend API key.

use anyhow::{bail, Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Sender identity stamped on every outgoing message
    pub from: SenderConfig,
    /// Locale used when a request does not specify one, and as the
    /// translation fallback
    pub default_locale: String,
    /// Root directory holding one subdirectory per template
    pub templates_dir: String,
    /// Bearer token protecting the API; `None` leaves the API open
    pub api_token: Option<String>,
    /// Delivery provider, selected once at startup
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SenderConfig {
    pub name: String,
    pub email: String,
}

/// Delivery provider configuration
///
/// Exactly one variant is active per process. `MAIL9_SMTP_HOST` wins over
/// `MAIL9_RESEND_API_KEY` when both are set.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Smtp(SmtpConfig),
    Resend(ResendConfig),
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// STARTTLS when true, plain connection otherwise
    pub secure: bool,
    pub user: Option<String>,
    pub pass: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_host: env::var("MAIL9_HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("MAIL9_HTTP_PORT")
                .unwrap_or_else(|_| "4400".to_string())
                .parse()
                .context("Invalid MAIL9_HTTP_PORT")?,
            database: DatabaseConfig {
                url: env::var("MAIL9_DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://mail9.db".to_string()),
                max_connections: env::var("MAIL9_DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                min_connections: env::var("MAIL9_DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .unwrap_or(1),
            },
            from: SenderConfig {
                name: env::var("MAIL9_FROM_NAME").context("MAIL9_FROM_NAME is required")?,
                email: env::var("MAIL9_FROM_EMAIL").context("MAIL9_FROM_EMAIL is required")?,
            },
            default_locale: env::var("MAIL9_DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            templates_dir: env::var("MAIL9_TEMPLATES_DIR")
                .unwrap_or_else(|_| "templates".to_string()),
            api_token: env::var("MAIL9_API_TOKEN").ok().filter(|t| !t.is_empty()),
            provider: Self::provider_from_env()?,
        })
    }

    fn provider_from_env() -> Result<ProviderConfig> {
        if let Ok(host) = env::var("MAIL9_SMTP_HOST") {
            return Ok(ProviderConfig::Smtp(SmtpConfig {
                host,
                port: env::var("MAIL9_SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .context("Invalid MAIL9_SMTP_PORT")?,
                secure: env::var("MAIL9_SMTP_SECURE")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
                user: env::var("MAIL9_SMTP_USER").ok(),
                pass: env::var("MAIL9_SMTP_PASS").ok(),
            }));
        }

        if let Ok(api_key) = env::var("MAIL9_RESEND_API_KEY") {
            return Ok(ProviderConfig::Resend(ResendConfig { api_key }));
        }

        bail!("No provider configured: set MAIL9_SMTP_HOST or MAIL9_RESEND_API_KEY")
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
