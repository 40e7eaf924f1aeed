//! Data models for Libris

pub mod book;
pub mod loan;
pub mod user;

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{LibraryError, LibraryResult};

// Re-export commonly used types
pub use book::{Book, SearchField};
pub use loan::{LoanAction, LoanEvent};
pub use user::User;

/// Counters describing the current library state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LibrarySummary {
    pub total_books: usize,
    pub total_users: usize,
    pub books_on_loan: usize,
    pub ledger_entries: usize,
}

/// Reject blank values for a required field
pub(crate) fn required<S: AsRef<str>>(field: &'static str, value: S) -> LibraryResult<S> {
    if value.as_ref().trim().is_empty() {
        return Err(LibraryError::InvalidInput {
            field,
            reason: "must not be blank".to_string(),
        });
    }
    Ok(value)
}
