//! Lending endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{loan::LoanRequest, LoanEvent},
};

/// Lend a book to a user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 201, description = "Book lent", body = LoanEvent),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "Book already on loan")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<(StatusCode, Json<LoanEvent>)> {
    request.validate()?;

    let event = state
        .services
        .library
        .write("lend", move |library| {
            library.lend(&request.isbn, &request.user_id).cloned()
        })
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/return",
    tag = "loans",
    request_body = LoanRequest,
    responses(
        (status = 200, description = "Book returned", body = LoanEvent),
        (status = 404, description = "Book or user not found"),
        (status = 422, description = "Book not on loan, or on loan to another user")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    Json(request): Json<LoanRequest>,
) -> AppResult<Json<LoanEvent>> {
    request.validate()?;

    let event = state
        .services
        .library
        .write("return", move |library| {
            library.return_book(&request.isbn, &request.user_id).cloned()
        })
        .await?;

    Ok(Json(event))
}
