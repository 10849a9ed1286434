//! Common test utilities

use std::collections::VecDeque;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::net::TcpListener;

use mail9::config::{Config, DatabaseConfig, ProviderConfig, SenderConfig, SmtpConfig};
use mail9::domain::{EmailPayload, SendOutcome};
use mail9::migration::run_migrations;
use mail9::provider::Provider;
use mail9::repository::{LogsRepository, LogsRepositoryImpl};
use mail9::server::{build_router, AppState};
use mail9::service::Dispatcher;

/// Delivery double that returns scripted outcomes and records every payload
///
/// Queued outcomes are consumed first, one per call; once the queue is empty
/// the fallback outcome repeats.
#[allow(dead_code)]
pub struct ScriptedProvider {
    queued: Mutex<VecDeque<SendOutcome>>,
    fallback: SendOutcome,
    calls: Mutex<Vec<EmailPayload>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn succeeding() -> Self {
        Self::with_fallback(SendOutcome::success("<test-message-id>"))
    }

    pub fn failing(error: &str) -> Self {
        Self::with_fallback(SendOutcome::failure(error))
    }

    pub fn with_fallback(fallback: SendOutcome) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-shot outcome ahead of the fallback
    pub fn push_outcome(&self, outcome: SendOutcome) {
        self.queued.lock().unwrap().push_back(outcome);
    }

    /// Payloads handed to the provider so far
    pub fn calls(&self) -> Vec<EmailPayload> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn send(&self, payload: &EmailPayload) -> SendOutcome {
        self.calls.lock().unwrap().push(payload.clone());
        let queued = self.queued.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Connect an in-memory SQLite pool with the schema applied
///
/// Capped at one connection: every new connection to `:memory:` would
/// otherwise get its own empty database.
#[allow(dead_code)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

/// Write the welcome fixture template (en + fr bundles) under `dir`
#[allow(dead_code)]
pub fn write_welcome_template(dir: &Path) {
    let root = dir.join("welcome");
    fs::create_dir_all(root.join("locales")).expect("Failed to create template dirs");
    fs::write(
        root.join("template.html.hbs"),
        "<h1>{{t.greeting}}</h1><p>{{t.body}}</p>",
    )
    .expect("Failed to write HTML layout");
    fs::write(root.join("template.txt.hbs"), "{{t.greeting}}\n\n{{t.body}}")
        .expect("Failed to write text layout");
    fs::write(
        root.join("locales").join("en.json"),
        r#"{
  "subject": "Welcome to {{app_name}}",
  "greeting": "Hello {{name}}!",
  "body": "Thanks for joining {{app_name}}."
}"#,
    )
    .expect("Failed to write en bundle");
    fs::write(
        root.join("locales").join("fr.json"),
        r#"{
  "subject": "Bienvenue sur {{app_name}}",
  "greeting": "Bonjour {{name}} !",
  "body": "Merci de rejoindre {{app_name}}."
}"#,
    )
    .expect("Failed to write fr bundle");
}

#[allow(dead_code)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub db_pool: SqlitePool,
    pub config: Config,
    pub provider: Arc<ScriptedProvider>,
    // Dropping the TempDir deletes the fixture templates
    _templates_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(ScriptedProvider::succeeding(), None).await
    }

    pub async fn spawn_with_provider(provider: ScriptedProvider) -> Self {
        Self::spawn_with(provider, None).await
    }

    pub async fn spawn_with_token(token: &str) -> Self {
        Self::spawn_with(ScriptedProvider::succeeding(), Some(token.to_string())).await
    }

    pub async fn spawn_with(provider: ScriptedProvider, api_token: Option<String>) -> Self {
        let templates_dir = TempDir::new().expect("Failed to create templates dir");
        write_welcome_template(templates_dir.path());

        let config = Config {
            http_host: "127.0.0.1".to_string(),
            http_port: 0, // Random port
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
            },
            from: SenderConfig {
                name: "My App".to_string(),
                email: "noreply@example.com".to_string(),
            },
            default_locale: "en".to_string(),
            templates_dir: templates_dir.path().to_string_lossy().into_owned(),
            api_token,
            provider: ProviderConfig::Smtp(SmtpConfig {
                host: "localhost".to_string(),
                port: 1025,
                secure: false,
                user: None,
                pass: None,
            }),
        };

        let db_pool = test_pool().await;

        let provider = Arc::new(provider);
        let logs: Arc<dyn LogsRepository> = Arc::new(LogsRepositoryImpl::new(db_pool.clone()));
        let dispatcher = Arc::new(Dispatcher::new(&config, provider.clone(), logs.clone()));

        let state = AppState {
            config: Arc::new(config.clone()),
            dispatcher,
            logs,
        };

        let app = build_router(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let addr = listener.local_addr().expect("Failed to get local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestApp {
            addr,
            db_pool,
            config,
            provider,
            _templates_dir: templates_dir,
        }
    }

    /// Create HTTP client for testing
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client")
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Count rows in the logs table
    pub async fn log_count(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count logs");
        count
    }
}
