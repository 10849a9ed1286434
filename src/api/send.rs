//! Send endpoint

use crate::domain::SendRequest;
use crate::error::Result;
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// Dispatch one message through the full pipeline
///
/// Delivery failure comes back as a 500 whose body still carries the log id;
/// failures before the provider attempt surface as 400s with no log row.
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<impl IntoResponse> {
    let response = state.dispatcher.send(&request).await?;

    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(response)))
}
