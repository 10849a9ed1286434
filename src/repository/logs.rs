//! Delivery log repository
//!
//! Append-only: rows are inserted once per delivery attempt and never
//! updated or deleted. SQLite serializes the writes; readers always see the
//! latest committed insert.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::{CreateLogInput, LogEntry, LogFilter};
use crate::error::Result;

const COLUMNS: &str = "id, template, locale, recipient, channel, subject, html, status, \
                       message_id, error, variables, sent_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogsRepository: Send + Sync {
    /// Append one delivery attempt and return the persisted row
    async fn insert(&self, input: &CreateLogInput) -> Result<LogEntry>;

    async fn find_by_id(&self, id: i64) -> Result<Option<LogEntry>>;

    /// Page through attempts, newest first; `page` is 1-indexed
    async fn find_all(&self, page: i64, limit: i64, filter: &LogFilter) -> Result<Vec<LogEntry>>;

    async fn count(&self, filter: &LogFilter) -> Result<i64>;
}

pub struct LogsRepositoryImpl {
    pool: SqlitePool,
}

impl LogsRepositoryImpl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogsRepository for LogsRepositoryImpl {
    async fn insert(&self, input: &CreateLogInput) -> Result<LogEntry> {
        let result = sqlx::query(
            r#"
            INSERT INTO logs (template, locale, recipient, channel, subject, html, status, message_id, error, variables)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.template)
        .bind(&input.locale)
        .bind(&input.recipient)
        .bind(&input.channel)
        .bind(&input.subject)
        .bind(&input.html)
        .bind(input.status)
        .bind(&input.message_id)
        .bind(&input.error)
        .bind(&input.variables)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        let sql = format!("SELECT {} FROM logs WHERE id = ?", COLUMNS);
        let entry = sqlx::query_as::<_, LogEntry>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LogEntry>> {
        let sql = format!("SELECT {} FROM logs WHERE id = ?", COLUMNS);
        let entry = sqlx::query_as::<_, LogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn find_all(&self, page: i64, limit: i64, filter: &LogFilter) -> Result<Vec<LogEntry>> {
        let mut sql = format!("SELECT {} FROM logs WHERE 1=1", COLUMNS);

        if filter.template.is_some() {
            sql.push_str(" AND template = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }

        sql.push_str(" ORDER BY sent_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut query_builder = sqlx::query_as::<_, LogEntry>(&sql);

        if let Some(ref template) = filter.template {
            query_builder = query_builder.bind(template);
        }
        if let Some(status) = filter.status {
            query_builder = query_builder.bind(status);
        }

        let offset = (page - 1) * limit;
        query_builder = query_builder.bind(limit).bind(offset);

        let entries = query_builder.fetch_all(&self.pool).await?;
        Ok(entries)
    }

    async fn count(&self, filter: &LogFilter) -> Result<i64> {
        let mut sql = String::from("SELECT COUNT(*) FROM logs WHERE 1=1");

        if filter.template.is_some() {
            sql.push_str(" AND template = ?");
        }
        if filter.status.is_some() {
            sql.push_str(" AND status = ?");
        }

        let mut query_builder = sqlx::query_as::<_, (i64,)>(&sql);

        if let Some(ref template) = filter.template {
            query_builder = query_builder.bind(template);
        }
        if let Some(status) = filter.status {
            query_builder = query_builder.bind(status);
        }

        let (count,) = query_builder.fetch_one(&self.pool).await?;
        Ok(count)
    }
}
