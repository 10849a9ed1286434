//! mail9 - Transactional Email Dispatch Service
//!
//! This crate provides a multi-locale transactional email service: templates
//! are resolved against per-locale translation bundles, interpolated, rendered
//! to HTML and text, delivered through a pluggable provider and recorded in an
//! append-only delivery log.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod migration;
pub mod provider;
pub mod render;
pub mod repository;
pub mod server;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
