//! Book model and related types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::required;
use crate::error::{LibraryError, LibraryResult};

/// Catalog record for a single book.
///
/// ISBN, title and author are fixed at creation. The category can only be
/// changed through the catalog, and availability only through lending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    isbn: String,
    title: String,
    author: String,
    category: String,
    available: bool,
}

impl Book {
    /// Create an available book, rejecting blank ISBN, title or author
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> LibraryResult<Self> {
        let (isbn, title, author): (String, String, String) =
            (isbn.into(), title.into(), author.into());
        Ok(Self {
            isbn: required("isbn", isbn)?,
            title: required("title", title)?,
            author: required("author", author)?,
            category: category.into(),
            available: true,
        })
    }

    /// Re-check constructor rules on a record that bypassed `new` (e.g. deserialized)
    pub(crate) fn validate(&self) -> LibraryResult<()> {
        required("isbn", self.isbn.as_str())?;
        required("title", self.title.as_str())?;
        required("author", self.author.as_str())?;
        Ok(())
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_category(&mut self, category: String) {
        self.category = category;
    }

    pub(crate) fn mark_on_loan(&mut self) {
        self.available = false;
    }

    pub(crate) fn mark_available(&mut self) {
        self.available = true;
    }

    /// Case-insensitive containment test on one field.
    /// `needle` must already be lowercased.
    pub(crate) fn matches(&self, field: SearchField, needle: &str) -> bool {
        let haystack = match field {
            SearchField::Title => &self.title,
            SearchField::Author => &self.author,
            SearchField::Category => &self.category,
        };
        haystack.to_lowercase().contains(needle)
    }
}

/// Book field a catalog search runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Category,
}

impl FromStr for SearchField {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "author" => Ok(SearchField::Author),
            "category" => Ok(SearchField::Category),
            other => Err(LibraryError::InvalidInput {
                field: "field",
                reason: format!("unknown search field '{}'", other),
            }),
        }
    }
}

/// Add book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    pub category: String,
}

/// Change category request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategory {
    pub category: String,
}
