//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppResult, LibraryError},
    models::{user::RegisterUser, Book, LoanEvent, User},
};

/// List registered users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users in registration order", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<crate::AppState>) -> AppResult<Json<Vec<User>>> {
    let users: Vec<User> = state
        .services
        .library
        .read(|library| library.users().cloned().collect())
        .await?;
    Ok(Json(users))
}

/// Get user details
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state
        .services
        .library
        .read(move |library| {
            library
                .find_user(&id)
                .cloned()
                .ok_or(LibraryError::UnknownUser(id))
        })
        .await??;
    Ok(Json(user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User ID already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    request.validate()?;

    let user = state
        .services
        .library
        .write("register user", move |library| {
            library.register_user(&request.user_id, &request.name)?;
            library
                .find_user(&request.user_id)
                .cloned()
                .ok_or(LibraryError::UnknownUser(request.user_id))
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Deregister a user holding no books
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deregistered"),
        (status = 404, description = "User not found"),
        (status = 409, description = "User still holds books")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .services
        .library
        .write("deregister user", move |library| library.deregister_user(&id).map(|_| ()))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Books currently borrowed by a user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Borrowed books", body = Vec<Book>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .library
        .read(move |library| {
            library
                .loans_for_user(&id)
                .map(|books| books.into_iter().cloned().collect::<Vec<_>>())
        })
        .await??;
    Ok(Json(books))
}

/// Loan and return history of a user
#[utoipa::path(
    get,
    path = "/users/{id}/history",
    tag = "loans",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Ledger entries for the user", body = Vec<LoanEvent>)
    )
)]
pub async fn get_user_history(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<LoanEvent>>> {
    let events: Vec<LoanEvent> = state
        .services
        .library
        .read(move |library| {
            library
                .history_for_user(&id)
                .into_iter()
                .cloned()
                .collect()
        })
        .await?;
    Ok(Json(events))
}
