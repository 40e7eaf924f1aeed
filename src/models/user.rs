//! Library user model and related types

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::required;
use crate::error::LibraryResult;

/// Registered library user.
///
/// `held_loans` only stores ISBNs; the books themselves stay owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "UserRecord")]
pub struct User {
    user_id: String,
    name: String,
    #[schema(value_type = Vec<String>)]
    held_loans: IndexSet<String>,
}

impl User {
    /// Create a user with no loans, rejecting a blank id or name
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> LibraryResult<Self> {
        let (user_id, name): (String, String) = (user_id.into(), name.into());
        Ok(Self {
            user_id: required("user_id", user_id)?,
            name: required("name", name)?,
            held_loans: IndexSet::new(),
        })
    }

    pub(crate) fn validate(&self) -> LibraryResult<()> {
        required("user_id", self.user_id.as_str())?;
        required("name", self.name.as_str())?;
        Ok(())
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// ISBNs currently borrowed, in borrowing order
    pub fn held_loans(&self) -> impl Iterator<Item = &str> {
        self.held_loans.iter().map(String::as_str)
    }

    pub fn holds(&self, isbn: &str) -> bool {
        self.held_loans.contains(isbn)
    }

    pub fn loan_count(&self) -> usize {
        self.held_loans.len()
    }

    pub fn has_loans(&self) -> bool {
        !self.held_loans.is_empty()
    }

    /// Returns false if the ISBN was already held
    pub(crate) fn hold(&mut self, isbn: &str) -> bool {
        self.held_loans.insert(isbn.to_string())
    }

    /// Returns false if the ISBN was not held
    pub(crate) fn release(&mut self, isbn: &str) -> bool {
        self.held_loans.shift_remove(isbn)
    }
}

/// Stored form of a user; a repeated ISBN in `held_loans` is rejected
#[derive(Deserialize)]
struct UserRecord {
    user_id: String,
    name: String,
    held_loans: Vec<String>,
}

impl TryFrom<UserRecord> for User {
    type Error = String;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let mut held_loans = IndexSet::with_capacity(record.held_loans.len());
        for isbn in record.held_loans {
            if let Some(isbn) = held_loans.replace(isbn) {
                return Err(format!(
                    "user '{}' holds '{}' more than once",
                    record.user_id, isbn
                ));
            }
        }
        Ok(Self {
            user_id: record.user_id,
            name: record.name,
            held_loans,
        })
    }
}

/// Register user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LibraryError;

    #[test]
    fn test_hold_and_release_keep_order() {
        let mut user = User::new("U1", "Ana").unwrap();
        assert!(user.hold("978-2"));
        assert!(user.hold("978-1"));
        assert!(!user.hold("978-2"));
        assert_eq!(user.held_loans().collect::<Vec<_>>(), vec!["978-2", "978-1"]);

        assert!(user.release("978-2"));
        assert!(!user.release("978-2"));
        assert_eq!(user.loan_count(), 1);
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = User::new("U1", "   ").unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput { field: "name", .. }));
    }

    #[test]
    fn test_serialized_held_loans_is_a_list() {
        let mut user = User::new("U1", "Ana").unwrap();
        user.hold("978-1");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["held_loans"], serde_json::json!(["978-1"]));
    }

    #[test]
    fn test_repeated_held_loan_is_rejected() {
        let value = serde_json::json!({
            "user_id": "U1",
            "name": "Ana",
            "held_loans": ["978-1", "978-2", "978-1"]
        });
        let err = serde_json::from_value::<User>(value).unwrap_err();
        assert!(err.to_string().contains("978-1"));

        let value = serde_json::json!({ "user_id": "U1", "name": "Ana", "held_loans": ["978-1"] });
        let user: User = serde_json::from_value(value).unwrap();
        assert!(user.holds("978-1"));
    }
}
