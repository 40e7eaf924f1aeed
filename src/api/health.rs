//! Readiness endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ready` once the library can be read
    pub status: String,
    pub version: String,
    /// Whether mutations are saved to a data file
    pub persistent: bool,
    pub total_books: usize,
}

/// Report whether the library is open and readable
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Library is ready", body = HealthResponse),
        (status = 500, description = "Library cannot be read", body = crate::error::ErrorResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> AppResult<Json<HealthResponse>> {
    let library = &state.services.library;
    let total_books = library.read(|library| library.summary().total_books).await?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        persistent: library.is_persistent(),
        total_books,
    }))
}
