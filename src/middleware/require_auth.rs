//! Authentication enforcement middleware for REST API
//!
//! Protected routes require the static API token configured at startup.
//! The middleware validates the Bearer token in the Authorization header
//! and rejects requests that do not carry the exact configured token.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Shared state for authentication middleware
#[derive(Clone)]
pub struct AuthMiddlewareState {
    api_token: String,
}

impl AuthMiddlewareState {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }
}

/// Authentication enforcement middleware
///
/// Requests without a Bearer token matching the configured API token are
/// rejected with 401 Unauthorized. The token comparison is constant-time.
///
/// The middleware checks for:
/// - Presence of Authorization header
/// - Bearer token scheme
/// - Exact match against the configured token
pub async fn require_auth_middleware(
    State(auth_state): State<AuthMiddlewareState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Extract the Authorization header
    let auth_header = match request.headers().get(AUTHORIZATION) {
        Some(header) => header,
        None => {
            return unauthorized_response("Missing authorization token");
        }
    };

    // Parse the header value
    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(_) => {
            return unauthorized_response("Invalid authorization header encoding");
        }
    };

    // Check for Bearer scheme
    let token = match auth_str.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            return unauthorized_response("Authorization header must use Bearer scheme");
        }
    };

    let valid: bool = token
        .as_bytes()
        .ct_eq(auth_state.api_token.as_bytes())
        .into();

    if !valid {
        return unauthorized_response("Invalid API token");
    }

    // Token is valid, proceed with the request
    next.run(request).await
}

/// Generate a 401 Unauthorized response
fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}
