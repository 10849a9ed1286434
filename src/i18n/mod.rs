//! Translation loading and variable interpolation
//!
//! Bundles live at `<templates_dir>/<template>/locales/<locale>.json` as flat
//! key/value maps. They are re-read on every request; edits on disk take
//! effect immediately.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{(\w+)\}\}").unwrap();
}

/// Replaces `{{key}}` placeholders with values from the variables map
///
/// A key missing from `variables` renders as an empty string, never as the
/// literal placeholder.
pub fn interpolate(text: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            variables.get(&caps[1]).map(String::as_str).unwrap_or("")
        })
        .into_owned()
}

/// Translations for one template, tagged with the locale they resolved to
#[derive(Debug, Clone)]
pub struct TranslationBundle {
    pub values: HashMap<String, String>,
    /// May differ from the requested locale after fallback
    pub locale: String,
}

/// Loads translation bundles with fallback to the default locale
#[derive(Debug, Clone)]
pub struct TranslationResolver {
    templates_dir: PathBuf,
}

impl TranslationResolver {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Load the bundle for `locale`, falling back to `default_locale` when
    /// the requested one is absent
    ///
    /// The fallback is attempted only when the two locales differ; when they
    /// are equal a miss fails after a single lookup. Failure names the
    /// template and both attempted locales.
    pub async fn load(
        &self,
        template: &str,
        locale: &str,
        default_locale: &str,
    ) -> Result<TranslationBundle> {
        if let Some(values) = read_bundle(&self.bundle_path(template, locale)).await {
            return Ok(TranslationBundle {
                values,
                locale: locale.to_string(),
            });
        }

        if locale != default_locale {
            if let Some(values) = read_bundle(&self.bundle_path(template, default_locale)).await {
                return Ok(TranslationBundle {
                    values,
                    locale: default_locale.to_string(),
                });
            }
        }

        Err(AppError::TranslationsNotFound {
            template: template.to_string(),
            tried: format!("{}, {}", locale, default_locale),
        })
    }

    fn bundle_path(&self, template: &str, locale: &str) -> PathBuf {
        self.templates_dir
            .join(template)
            .join("locales")
            .join(format!("{}.json", locale))
    }
}

/// Reads one bundle file; any read or parse failure counts as absent
async fn read_bundle(path: &Path) -> Option<HashMap<String, String>> {
    let content = tokio::fs::read_to_string(path).await.ok()?;
    serde_json::from_str(&content).ok()
}
