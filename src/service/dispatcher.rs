//! Send/preview orchestration
//!
//! The pipeline is linear: resolve translations (with locale fallback),
//! interpolate, render, deliver, log. Any failure before the provider call
//! aborts the request with no log row. Once rendering succeeds the provider
//! is always called and the attempt is always logged, success or failure.
//! The log insert runs strictly after the delivery attempt, so a crash in
//! between loses the audit row for an already-delivered message; that window
//! is accepted rather than papered over with a two-phase write.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};
use validator::Validate;

use crate::config::{Config, SenderConfig};
use crate::domain::{
    CreateLogInput, EmailPayload, LogStatus, PreviewRequest, PreviewResponse, RenderedMessage,
    SendRequest, SendResponse,
};
use crate::error::Result;
use crate::i18n::{interpolate, TranslationResolver};
use crate::provider::Provider;
use crate::render::{validate_template_name, TemplateRenderer};
use crate::repository::LogsRepository;

/// Orchestrates the send/preview pipeline
pub struct Dispatcher {
    provider: Arc<dyn Provider>,
    logs: Arc<dyn LogsRepository>,
    resolver: TranslationResolver,
    renderer: TemplateRenderer,
    from: SenderConfig,
    default_locale: String,
}

impl Dispatcher {
    pub fn new(
        config: &Config,
        provider: Arc<dyn Provider>,
        logs: Arc<dyn LogsRepository>,
    ) -> Self {
        Self {
            provider,
            logs,
            resolver: TranslationResolver::new(config.templates_dir.clone()),
            renderer: TemplateRenderer::new(config.templates_dir.clone()),
            from: config.from.clone(),
            default_locale: config.default_locale.clone(),
        }
    }

    /// Full pipeline: render, deliver, log, respond
    ///
    /// Delivery failure still produces an `Ok` response; `success` is false
    /// and the log row carries the provider error.
    pub async fn send(&self, request: &SendRequest) -> Result<SendResponse> {
        request.validate()?;

        let (message, resolved_locale) = self
            .resolve_and_render(&request.template, request.locale.as_deref(), &request.variables)
            .await?;

        let payload = EmailPayload {
            from_name: self.from.name.clone(),
            from_email: self.from.email.clone(),
            to: request.to.clone(),
            subject: message.subject.clone(),
            html: message.html.clone(),
            text: message.text,
        };

        let outcome = self.provider.send(&payload).await;

        if outcome.success {
            info!(
                template = %request.template,
                to = %request.to,
                provider = self.provider.name(),
                "Email sent"
            );
        } else {
            error!(
                template = %request.template,
                to = %request.to,
                provider = self.provider.name(),
                error = outcome.error.as_deref().unwrap_or(""),
                "Email delivery failed"
            );
        }

        let entry = self
            .logs
            .insert(&CreateLogInput {
                template: request.template.clone(),
                locale: resolved_locale,
                recipient: request.to.clone(),
                channel: request
                    .channel
                    .clone()
                    .unwrap_or_else(|| "email".to_string()),
                subject: message.subject,
                html: message.html,
                status: if outcome.success {
                    LogStatus::Sent
                } else {
                    LogStatus::Error
                },
                message_id: outcome.message_id.clone(),
                error: outcome.error.clone(),
                variables: serde_json::to_string(&request.variables)
                    .unwrap_or_else(|_| "{}".to_string()),
            })
            .await?;

        Ok(SendResponse {
            success: outcome.success,
            log_id: entry.id,
            message_id: outcome.message_id,
            error: outcome.error,
        })
    }

    /// Rendering only: no delivery, no log row
    pub async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResponse> {
        request.validate()?;

        let (message, resolved_locale) = self
            .resolve_and_render(&request.template, request.locale.as_deref(), &request.variables)
            .await?;

        Ok(PreviewResponse {
            html: message.html,
            text: message.text,
            subject: message.subject,
            locale: resolved_locale,
        })
    }

    /// Steps shared by send and preview: validate the name, load the bundle
    /// with fallback, interpolate every translation value, render
    async fn resolve_and_render(
        &self,
        template: &str,
        locale: Option<&str>,
        variables: &HashMap<String, String>,
    ) -> Result<(RenderedMessage, String)> {
        validate_template_name(template)?;

        let locale = locale.unwrap_or(&self.default_locale);
        let bundle = self
            .resolver
            .load(template, locale, &self.default_locale)
            .await?;

        let interpolated: HashMap<String, String> = bundle
            .values
            .iter()
            .map(|(key, value)| (key.clone(), interpolate(value, variables)))
            .collect();

        let message = self
            .renderer
            .render(template, &interpolated, variables)
            .await?;

        Ok((message, bundle.locale))
    }
}
