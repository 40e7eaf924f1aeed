//! Loan ledger entries and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanAction {
    Loan,
    Return,
}

/// One immutable entry of the lending ledger.
///
/// Only identifiers are stored, plus a copy of the title at the time of the
/// event, so entries stay readable after the book or user is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanEvent {
    pub id: Uuid,
    pub action: LoanAction,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub isbn: String,
    pub title: String,
}

/// Lend or return request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoanRequest {
    /// ISBN of the book
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    /// Borrowing user
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
}
