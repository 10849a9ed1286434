//! Preview endpoint

use crate::domain::PreviewRequest;
use crate::error::Result;
use crate::server::AppState;
use axum::{extract::State, response::IntoResponse, Json};

/// Render a template without delivering or logging anything
pub async fn preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<impl IntoResponse> {
    let response = state.dispatcher.preview(&request).await?;
    Ok(Json(response))
}
