//! HTTP middleware for mail9
//!
//! One concern lives here: bearer-token enforcement for the REST API.

pub mod require_auth;

pub use require_auth::{require_auth_middleware, AuthMiddlewareState};
