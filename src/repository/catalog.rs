//! In-memory book catalog

use indexmap::{map::Entry, IndexMap};

use crate::{
    error::{LibraryError, LibraryResult},
    models::{Book, SearchField},
};

/// Owns every book record, keyed by ISBN and kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: IndexMap<String, Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new, available book
    pub fn add_book(
        &mut self,
        isbn: &str,
        title: &str,
        author: &str,
        category: &str,
    ) -> LibraryResult<()> {
        if self.books.contains_key(isbn) {
            return Err(LibraryError::DuplicateIsbn(isbn.to_string()));
        }
        self.insert(Book::new(isbn, title, author, category)?)
    }

    /// Insert an already built record, keeping its availability as is
    pub(crate) fn insert(&mut self, book: Book) -> LibraryResult<()> {
        match self.books.entry(book.isbn().to_string()) {
            Entry::Occupied(entry) => Err(LibraryError::DuplicateIsbn(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(book);
                Ok(())
            }
        }
    }

    /// Remove a book that is not on loan
    pub fn remove_book(&mut self, isbn: &str) -> LibraryResult<Book> {
        match self.books.get(isbn) {
            None => return Err(LibraryError::UnknownBook(isbn.to_string())),
            Some(book) if !book.is_available() => {
                return Err(LibraryError::BookOnLoan(isbn.to_string()))
            }
            Some(_) => {}
        }
        self.books
            .shift_remove(isbn)
            .ok_or_else(|| LibraryError::UnknownBook(isbn.to_string()))
    }

    pub fn find_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub(crate) fn get_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    /// Case-insensitive substring search on one field, in catalog order.
    /// An empty substring matches every book.
    pub fn search(&self, field: SearchField, substring: &str) -> Vec<&Book> {
        let needle = substring.to_lowercase();
        self.books
            .values()
            .filter(|book| book.matches(field, &needle))
            .collect()
    }

    pub fn recategorize(&mut self, isbn: &str, category: &str) -> LibraryResult<()> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::UnknownBook(isbn.to_string()))?;
        book.set_category(category.to_string());
        Ok(())
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn on_loan_count(&self) -> usize {
        self.books.values().filter(|book| !book.is_available()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_book("978-1", "Dune", "Frank Herbert", "SciFi").unwrap();
        catalog.add_book("978-2", "Emma", "Jane Austen", "Classic").unwrap();
        catalog.add_book("978-3", "Children of Dune", "Frank Herbert", "SciFi").unwrap();
        catalog
    }

    #[test]
    fn test_duplicate_isbn() {
        let mut catalog = sample();
        let err = catalog.add_book("978-1", "Other", "Someone", "Misc").unwrap_err();
        assert_eq!(err, LibraryError::DuplicateIsbn("978-1".into()));
        assert_eq!(catalog.find_by_isbn("978-1").unwrap().title(), "Dune");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_search_keeps_insertion_order() {
        let catalog = sample();
        let found: Vec<_> = catalog
            .search(SearchField::Title, "DUNE")
            .into_iter()
            .map(Book::isbn)
            .collect();
        assert_eq!(found, vec!["978-1", "978-3"]);

        assert_eq!(catalog.search(SearchField::Author, "austen").len(), 1);
        assert_eq!(catalog.search(SearchField::Category, "").len(), 3);
        assert!(catalog.search(SearchField::Category, "poetry").is_empty());
    }

    #[test]
    fn test_remove_book() {
        let mut catalog = sample();
        assert_eq!(
            catalog.remove_book("999").unwrap_err(),
            LibraryError::UnknownBook("999".into())
        );

        catalog.get_mut("978-2").unwrap().mark_on_loan();
        assert_eq!(
            catalog.remove_book("978-2").unwrap_err(),
            LibraryError::BookOnLoan("978-2".into())
        );
        assert_eq!(catalog.len(), 3);

        let removed = catalog.remove_book("978-1").unwrap();
        assert_eq!(removed.isbn(), "978-1");
        let order: Vec<_> = catalog.books().map(Book::isbn).collect();
        assert_eq!(order, vec!["978-2", "978-3"]);
    }

    #[test]
    fn test_recategorize() {
        let mut catalog = sample();
        catalog.recategorize("978-2", "Romance").unwrap();
        assert_eq!(catalog.find_by_isbn("978-2").unwrap().category(), "Romance");
        assert!(catalog.recategorize("404", "x").is_err());
    }
}
