//! Send/preview pipeline domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Inbound request to send one message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendRequest {
    #[validate(length(min = 1))]
    pub template: String,
    /// Locale override; the configured default applies when absent
    pub locale: Option<String>,
    #[validate(email)]
    pub to: String,
    pub variables: HashMap<String, String>,
    /// Channel tag recorded in the audit log, defaults to "email"
    pub channel: Option<String>,
}

/// Inbound request to render a template without delivering it
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewRequest {
    #[validate(length(min = 1))]
    pub template: String,
    pub locale: Option<String>,
    pub variables: HashMap<String, String>,
}

/// Outcome of a `send`, returned once the audit row exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,
    pub log_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Rendered-but-not-delivered view of a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub html: String,
    pub text: String,
    pub subject: String,
    /// Locale the translations actually resolved to, after fallback
    pub locale: String,
}

/// Concrete message produced by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub html: String,
    pub text: String,
    pub subject: String,
}

/// Fully rendered message handed to a provider for delivery
#[derive(Debug, Clone)]
pub struct EmailPayload {
    pub from_name: String,
    pub from_email: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Result of one delivery attempt
///
/// Delivery failure is a value, not an error: providers normalize transport
/// problems into `success = false` with `error` populated.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn success(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_validation() {
        let request = SendRequest {
            template: "welcome".to_string(),
            locale: None,
            to: "user@example.com".to_string(),
            variables: HashMap::new(),
            channel: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_send_request_invalid_recipient() {
        let request = SendRequest {
            template: "welcome".to_string(),
            locale: None,
            to: "not-an-email".to_string(),
            variables: HashMap::new(),
            channel: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_send_request_empty_template() {
        let request = SendRequest {
            template: String::new(),
            locale: None,
            to: "user@example.com".to_string(),
            variables: HashMap::new(),
            channel: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_send_outcome_constructors() {
        let ok = SendOutcome::success("msg-123");
        assert!(ok.success);
        assert_eq!(ok.message_id.unwrap(), "msg-123");
        assert!(ok.error.is_none());

        let failed = SendOutcome::failure("Connection refused");
        assert!(!failed.success);
        assert!(failed.message_id.is_none());
        assert_eq!(failed.error.unwrap(), "Connection refused");
    }

    #[test]
    fn test_send_response_omits_absent_fields() {
        let response = SendResponse {
            success: true,
            log_id: 1,
            message_id: Some("<msg-1>".to_string()),
            error: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"message_id\""));
        assert!(!json.contains("\"error\""));
    }
}
