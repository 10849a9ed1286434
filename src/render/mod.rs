//! Template rendering
//!
//! Each template is a directory under the templates root holding a pair of
//! Handlebars layouts, `template.html.hbs` and `template.txt.hbs`. Both are
//! compiled per render against the same context: the interpolated
//! translations as `t` and the raw request variables as `vars`. The subject
//! comes from the reserved `subject` translation key.

use handlebars::Handlebars;
use serde_json::json;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::RenderedMessage;
use crate::error::{AppError, Result};

const HTML_LAYOUT: &str = "template.html.hbs";
const TEXT_LAYOUT: &str = "template.txt.hbs";

/// Guards against path traversal in template names
///
/// Must run before any filesystem access keyed by the name.
pub fn validate_template_name(name: &str) -> Result<()> {
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(AppError::InvalidTemplateName(name.to_string()));
    }
    Ok(())
}

/// Renders template layouts to a concrete message
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    templates_dir: PathBuf,
}

impl TemplateRenderer {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Render the named template with interpolated translations and raw
    /// request variables
    pub async fn render(
        &self,
        template: &str,
        translations: &HashMap<String, String>,
        variables: &HashMap<String, String>,
    ) -> Result<RenderedMessage> {
        validate_template_name(template)?;

        let html_source = self.read_layout(template, HTML_LAYOUT).await?;
        let text_source = self.read_layout(template, TEXT_LAYOUT).await?;

        let context = json!({ "t": translations, "vars": variables });

        let html_registry = Handlebars::new();
        let html = html_registry
            .render_template(&html_source, &context)
            .map_err(|e| render_failure(template, e))?;

        let mut text_registry = Handlebars::new();
        text_registry.register_escape_fn(handlebars::no_escape);
        let text = text_registry
            .render_template(&text_source, &context)
            .map_err(|e| render_failure(template, e))?;

        let subject = translations.get("subject").cloned().unwrap_or_default();

        Ok(RenderedMessage {
            html,
            text,
            subject,
        })
    }

    async fn read_layout(&self, template: &str, layout: &str) -> Result<String> {
        let path = self.templates_dir.join(template).join(layout);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::RenderFailure {
                template: template.to_string(),
                reason: format!("cannot read {}: {}", layout, e),
            })
    }
}

fn render_failure(template: &str, err: handlebars::RenderError) -> AppError {
    AppError::RenderFailure {
        template: template.to_string(),
        reason: err.to_string(),
    }
}
