//! Database schema bootstrap
//!
//! The schema is small enough to keep inline; every statement is idempotent
//! so this runs unconditionally at startup.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

/// Create the logs table and its indexes if they do not exist
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            template    TEXT NOT NULL,
            locale      TEXT NOT NULL,
            recipient   TEXT NOT NULL,
            channel     TEXT NOT NULL DEFAULT 'email',
            subject     TEXT NOT NULL DEFAULT '',
            html        TEXT NOT NULL DEFAULT '',
            status      TEXT NOT NULL CHECK(status IN ('sent', 'error')),
            message_id  TEXT,
            error       TEXT,
            variables   TEXT NOT NULL DEFAULT '{}',
            sent_at     TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create logs table")?;

    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_logs_template ON logs(template)",
        "CREATE INDEX IF NOT EXISTS idx_logs_status ON logs(status)",
        "CREATE INDEX IF NOT EXISTS idx_logs_sent_at ON logs(sent_at)",
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to create index")?;
    }

    info!("Database migrations completed");
    Ok(())
}
