//! Delivery log domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Terminal status of a delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LogStatus {
    Sent,
    Error,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Sent => "sent",
            LogStatus::Error => "error",
        }
    }
}

/// One delivery attempt, immutable after insertion
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub template: String,
    /// Locale the translations resolved to, after fallback
    pub locale: String,
    pub recipient: String,
    pub channel: String,
    pub subject: String,
    pub html: String,
    pub status: LogStatus,
    pub message_id: Option<String>,
    pub error: Option<String>,
    /// JSON-serialized variable map from the originating request
    pub variables: String,
    pub sent_at: DateTime<Utc>,
}

/// Input for appending a delivery attempt
#[derive(Debug, Clone)]
pub struct CreateLogInput {
    pub template: String,
    pub locale: String,
    pub recipient: String,
    pub channel: String,
    pub subject: String,
    pub html: String,
    pub status: LogStatus,
    pub message_id: Option<String>,
    pub error: Option<String>,
    pub variables: String,
}

/// Conjunctive filters for log queries
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub template: Option<String>,
    pub status: Option<LogStatus>,
}
