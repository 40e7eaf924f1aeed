//! Error types for Libris server

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    StorageFailure = 2,
    BadValue = 3,
    NoSuchBook = 4,
    NoSuchUser = 5,
    DuplicateIsbn = 6,
    DuplicateUser = 7,
    BookOnLoan = 8,
    UserHasLoans = 9,
    BookUnavailable = 10,
    BookNotOnLoan = 11,
    LoanMismatch = 12,
}

/// Failures of the lending core.
///
/// Every variant is deterministic: retrying without changing the library
/// state yields the same error, and a failed operation leaves the library
/// exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("A user with id {0} already exists")]
    DuplicateUser(String),

    #[error("No book with ISBN {0}")]
    UnknownBook(String),

    #[error("No user with id {0}")]
    UnknownUser(String),

    #[error("Book {0} is on loan and cannot be removed")]
    BookOnLoan(String),

    #[error("User {user_id} still holds {count} book(s)")]
    UserHasLoans { user_id: String, count: usize },

    #[error("Book {0} is not available")]
    BookUnavailable(String),

    #[error("Book {0} is not on loan")]
    BookNotOnLoan(String),

    #[error("Book {isbn} is not on loan to user {user_id}")]
    LoanMismatch { isbn: String, user_id: String },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl LibraryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LibraryError::DuplicateIsbn(_) => ErrorCode::DuplicateIsbn,
            LibraryError::DuplicateUser(_) => ErrorCode::DuplicateUser,
            LibraryError::UnknownBook(_) => ErrorCode::NoSuchBook,
            LibraryError::UnknownUser(_) => ErrorCode::NoSuchUser,
            LibraryError::BookOnLoan(_) => ErrorCode::BookOnLoan,
            LibraryError::UserHasLoans { .. } => ErrorCode::UserHasLoans,
            LibraryError::BookUnavailable(_) => ErrorCode::BookUnavailable,
            LibraryError::BookNotOnLoan(_) => ErrorCode::BookNotOnLoan,
            LibraryError::LoanMismatch { .. } => ErrorCode::LoanMismatch,
            LibraryError::InvalidInput { .. } => ErrorCode::BadValue,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            LibraryError::UnknownBook(_) | LibraryError::UnknownUser(_) => StatusCode::NOT_FOUND,
            LibraryError::DuplicateIsbn(_)
            | LibraryError::DuplicateUser(_)
            | LibraryError::BookOnLoan(_)
            | LibraryError::UserHasLoans { .. }
            | LibraryError::BookUnavailable(_) => StatusCode::CONFLICT,
            LibraryError::BookNotOnLoan(_) | LibraryError::LoanMismatch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            LibraryError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

/// Failures of the flat-file snapshot store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Inconsistent snapshot: {0}")]
    Inconsistent(String),
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Library(e) => (e.status(), e.code(), e.to_string()),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::StorageFailure,
                    "Storage error".to_string(),
                )
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for lending core operations
pub type LibraryResult<T> = Result<T, LibraryError>;
