//! Server initialization and routing

use crate::api;
use crate::config::{Config, DatabaseConfig};
use crate::middleware::{require_auth_middleware, AuthMiddlewareState};
use crate::migration::run_migrations;
use crate::provider::build_provider;
use crate::repository::{LogsRepository, LogsRepositoryImpl};
use crate::service::Dispatcher;
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
    pub logs: Arc<dyn LogsRepository>,
}

/// Create the SQLite connection pool, creating the database file when absent
pub async fn db_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Build the HTTP router
///
/// With an API token configured, /send, /preview and the log endpoints sit
/// behind the auth middleware. /health stays open either way.
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut protected = Router::new()
        .route("/send", post(api::send::send))
        .route("/preview", post(api::preview::preview))
        .route("/logs", get(api::logs::list))
        .route("/logs/{id}", get(api::logs::get));

    if let Some(token) = &state.config.api_token {
        protected = protected.layer(axum::middleware::from_fn_with_state(
            AuthMiddlewareState::new(token.clone()),
            require_auth_middleware,
        ));
    } else {
        warn!("MAIL9_API_TOKEN not set, API authentication is disabled");
    }

    Router::new()
        .merge(protected)
        // Health endpoint
        .route("/health", get(api::health::health))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Create database connection pool
    let pool = db_pool(&config.database).await?;
    info!("Connected to database");

    run_migrations(&pool).await?;

    // Create the delivery provider
    let provider = build_provider(&config)?;
    info!(provider = provider.name(), "Delivery provider configured");

    // Create repository and dispatcher
    let logs: Arc<dyn LogsRepository> = Arc::new(LogsRepositoryImpl::new(pool.clone()));
    let dispatcher = Arc::new(Dispatcher::new(&config, provider, logs.clone()));

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        dispatcher,
        logs,
    };

    let app = build_router(state);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
