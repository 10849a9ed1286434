//! Resend delivery provider
//!
//! Talks to the Resend transactional email API over HTTPS. API-level
//! rejections and network errors both surface as failure outcomes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::Provider;
use crate::domain::{EmailPayload, SendOutcome};

const RESEND_API_BASE: &str = "https://api.resend.com";

/// Resend API provider
pub struct ResendProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SendApiResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: String,
}

impl ResendProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, RESEND_API_BASE)
    }

    /// Point the provider at a different API origin
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Provider for ResendProvider {
    async fn send(&self, payload: &EmailPayload) -> SendOutcome {
        let body = json!({
            "from": format!("{} <{}>", payload.from_name, payload.from_email),
            "to": [payload.to],
            "subject": payload.subject,
            "html": payload.html,
            "text": payload.text,
        });

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return SendOutcome::failure(e.to_string()),
        };

        if response.status().is_success() {
            match response.json::<SendApiResponse>().await {
                Ok(parsed) => SendOutcome::success(parsed.id),
                Err(e) => SendOutcome::failure(format!("Invalid Resend response: {}", e)),
            }
        } else {
            let status = response.status();
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("Resend API error: {}", status));
            SendOutcome::failure(message)
        }
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}
