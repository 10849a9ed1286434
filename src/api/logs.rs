//! Log listing and lookup handlers

use crate::api::{
    default_page, default_per_page, deserialize_page, deserialize_per_page, PaginatedResponse,
};
use crate::domain::{LogFilter, LogStatus};
use crate::error::{AppError, Result};
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

/// Query parameters for the log listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListLogsQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
    #[serde(
        default = "default_per_page",
        deserialize_with = "deserialize_per_page",
        alias = "limit"
    )]
    pub per_page: i64,
    pub template: Option<String>,
    pub status: Option<LogStatus>,
}

/// List log entries, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> Result<impl IntoResponse> {
    let filter = LogFilter {
        template: query.template.clone(),
        status: query.status,
    };
    let entries = state
        .logs
        .find_all(query.page, query.per_page, &filter)
        .await?;
    let total = state.logs.count(&filter).await?;

    Ok(Json(PaginatedResponse::new(
        entries,
        query.page,
        query.per_page,
        total,
    )))
}

/// Get one log entry by id
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse> {
    let entry = state
        .logs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Log not found".to_string()))?;

    Ok(Json(entry))
}
