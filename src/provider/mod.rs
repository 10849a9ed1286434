//! Delivery providers
//!
//! One provider is active per process, chosen from configuration at startup.

pub mod resend;
pub mod smtp;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, ProviderConfig};
use crate::domain::{EmailPayload, SendOutcome};
use resend::ResendProvider;
use smtp::SmtpProvider;

/// Uniform delivery contract
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Attempt delivery of a fully rendered message
    ///
    /// Delivery failure is a normal outcome, not an error: transport
    /// problems come back as `success = false` with `error` populated.
    async fn send(&self, payload: &EmailPayload) -> SendOutcome;

    /// Get the provider name
    fn name(&self) -> &'static str;
}

/// Factory that instantiates the provider selected in configuration
pub fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn Provider>> {
    match &config.provider {
        ProviderConfig::Smtp(smtp) => Ok(Arc::new(SmtpProvider::new(smtp)?)),
        ProviderConfig::Resend(resend) => {
            Ok(Arc::new(ResendProvider::new(resend.api_key.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider() {
        let mut mock = MockProvider::new();

        mock.expect_name().returning(|| "mock");
        mock.expect_send()
            .returning(|_| SendOutcome::success("msg-123"));

        assert_eq!(mock.name(), "mock");

        let payload = EmailPayload {
            from_name: "My App".to_string(),
            from_email: "noreply@example.com".to_string(),
            to: "user@example.com".to_string(),
            subject: "Test".to_string(),
            html: "<p>Hello</p>".to_string(),
            text: "Hello".to_string(),
        };
        let outcome = mock.send(&payload).await;
        assert!(outcome.success);
        assert_eq!(outcome.message_id.unwrap(), "msg-123");
    }

    #[test]
    fn test_build_provider_selects_configured_variant() {
        use crate::config::{DatabaseConfig, ResendConfig, SenderConfig, SmtpConfig};

        let mut config = Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 4400,
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            from: SenderConfig {
                name: "My App".to_string(),
                email: "noreply@example.com".to_string(),
            },
            default_locale: "en".to_string(),
            templates_dir: "templates".to_string(),
            api_token: None,
            provider: ProviderConfig::Smtp(SmtpConfig {
                host: "localhost".to_string(),
                port: 1025,
                secure: false,
                user: None,
                pass: None,
            }),
        };

        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "smtp");

        config.provider = ProviderConfig::Resend(ResendConfig {
            api_key: "re_123".to_string(),
        });
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "resend");
    }
}
