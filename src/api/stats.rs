//! Library status endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::LibrarySummary};

/// Current library counters
#[utoipa::path(
    get,
    path = "/status",
    tag = "stats",
    responses(
        (status = 200, description = "Library counters", body = LibrarySummary)
    )
)]
pub async fn get_status(State(state): State<crate::AppState>) -> AppResult<Json<LibrarySummary>> {
    let summary = state
        .services
        .library
        .read(|library| library.summary())
        .await?;
    Ok(Json(summary))
}
