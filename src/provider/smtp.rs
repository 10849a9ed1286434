//! SMTP delivery provider using lettre

use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::Provider;
use crate::config::SmtpConfig;
use crate::domain::{EmailPayload, SendOutcome};

/// SMTP-based provider
pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpProvider {
    /// Create a provider from configuration
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let mut builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .context("Invalid SMTP host")?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        builder = builder.port(config.port);

        if let (Some(user), Some(pass)) = (&config.user, &config.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_message(&self, payload: &EmailPayload) -> Result<Message, String> {
        let from: Mailbox = format!("{} <{}>", payload.from_name, payload.from_email)
            .parse()
            .map_err(|e| format!("Invalid from address: {}", e))?;
        let to: Mailbox = payload
            .to
            .parse()
            .map_err(|e| format!("Invalid to address: {}", e))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&payload.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(payload.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(payload.html.clone()),
                    ),
            )
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Provider for SmtpProvider {
    async fn send(&self, payload: &EmailPayload) -> SendOutcome {
        let message = match self.build_message(payload) {
            Ok(message) => message,
            Err(error) => return SendOutcome::failure(error),
        };

        match self.transport.send(message).await {
            Ok(response) => SendOutcome {
                success: true,
                message_id: response.message().next().map(|s| s.to_string()),
                error: None,
            },
            Err(e) => SendOutcome::failure(e.to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
