//! Lending service: catalog, user registry and ledger kept consistent together.
//!
//! A book is either `Available` or `OnLoan(holder)`. The book's own
//! availability flag is authoritative; the holder side is tracked in the
//! user's `held_loans`, and every operation here updates both sides or
//! neither. All checks run before the first mutation, so a failed call
//! leaves the library untouched.

use chrono::Utc;

use crate::{
    error::{LibraryError, LibraryResult, StoreError},
    models::{Book, LibrarySummary, LoanAction, LoanEvent, SearchField, User},
    repository::{Catalog, LendingLedger, Snapshot, UserRegistry},
};

#[derive(Debug, Clone, Default)]
pub struct LibraryService {
    catalog: Catalog,
    users: UserRegistry,
    ledger: LendingLedger,
}

impl LibraryService {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    pub fn add_book(
        &mut self,
        isbn: &str,
        title: &str,
        author: &str,
        category: &str,
    ) -> LibraryResult<()> {
        self.catalog.add_book(isbn, title, author, category)
    }

    /// Remove a book; refused while the book is on loan
    pub fn remove_book(&mut self, isbn: &str) -> LibraryResult<Book> {
        let book = self
            .catalog
            .find_by_isbn(isbn)
            .ok_or_else(|| LibraryError::UnknownBook(isbn.to_string()))?;
        if !book.is_available() {
            return Err(LibraryError::BookOnLoan(isbn.to_string()));
        }
        self.catalog.remove_book(isbn)
    }

    pub fn recategorize_book(&mut self, isbn: &str, category: &str) -> LibraryResult<()> {
        self.catalog.recategorize(isbn, category)
    }

    pub fn find_book(&self, isbn: &str) -> Option<&Book> {
        self.catalog.find_by_isbn(isbn)
    }

    pub fn search_books(&self, field: SearchField, substring: &str) -> Vec<&Book> {
        self.catalog.search(field, substring)
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.catalog.books()
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn register_user(&mut self, user_id: &str, name: &str) -> LibraryResult<()> {
        self.users.register(user_id, name)
    }

    /// Remove a user; refused while the user still holds books
    pub fn deregister_user(&mut self, user_id: &str) -> LibraryResult<User> {
        let user = self
            .users
            .find(user_id)
            .ok_or_else(|| LibraryError::UnknownUser(user_id.to_string()))?;
        if user.has_loans() {
            return Err(LibraryError::UserHasLoans {
                user_id: user_id.to_string(),
                count: user.loan_count(),
            });
        }
        self.users.deregister(user_id)
    }

    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.users.find(user_id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.users()
    }

    /// Books currently held by a user, in borrowing order
    pub fn loans_for_user(&self, user_id: &str) -> LibraryResult<Vec<&Book>> {
        let user = self
            .users
            .find(user_id)
            .ok_or_else(|| LibraryError::UnknownUser(user_id.to_string()))?;
        Ok(user
            .held_loans()
            .filter_map(|isbn| self.catalog.find_by_isbn(isbn))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Lending
    // -----------------------------------------------------------------------

    /// Available -> OnLoan(user_id)
    pub fn lend(&mut self, isbn: &str, user_id: &str) -> LibraryResult<&LoanEvent> {
        let book = self
            .catalog
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::UnknownBook(isbn.to_string()))?;
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LibraryError::UnknownUser(user_id.to_string()))?;
        if !book.is_available() {
            return Err(LibraryError::BookUnavailable(isbn.to_string()));
        }

        book.mark_on_loan();
        user.hold(isbn);

        Ok(self
            .ledger
            .record(LoanAction::Loan, user_id, isbn, book.title(), Utc::now()))
    }

    /// OnLoan(user_id) -> Available. Book and user must agree on the loan.
    pub fn return_book(&mut self, isbn: &str, user_id: &str) -> LibraryResult<&LoanEvent> {
        let book = self
            .catalog
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::UnknownBook(isbn.to_string()))?;
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LibraryError::UnknownUser(user_id.to_string()))?;
        if book.is_available() {
            return Err(LibraryError::BookNotOnLoan(isbn.to_string()));
        }
        if !user.holds(isbn) {
            return Err(LibraryError::LoanMismatch {
                isbn: isbn.to_string(),
                user_id: user_id.to_string(),
            });
        }

        user.release(isbn);
        book.mark_available();

        Ok(self
            .ledger
            .record(LoanAction::Return, user_id, isbn, book.title(), Utc::now()))
    }

    pub fn history_for_user(&self, user_id: &str) -> Vec<&LoanEvent> {
        self.ledger.history_for_user(user_id)
    }

    pub fn history_for_book(&self, isbn: &str) -> Vec<&LoanEvent> {
        self.ledger.history_for_book(isbn)
    }

    pub fn summary(&self) -> LibrarySummary {
        LibrarySummary {
            total_books: self.catalog.len(),
            total_users: self.users.len(),
            books_on_loan: self.catalog.on_loan_count(),
            ledger_entries: self.ledger.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            books: self.catalog.books().cloned().collect(),
            users: self.users.users().cloned().collect(),
            events: self.ledger.events().to_vec(),
        }
    }

    /// Rebuild a library from a snapshot, rejecting any record that breaks
    /// field rules, uniqueness or the loan relation between books and users.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let inconsistent = |e: LibraryError| StoreError::Inconsistent(e.to_string());
        let mut library = Self::new();

        for book in snapshot.books {
            book.validate().map_err(inconsistent)?;
            library.catalog.insert(book).map_err(inconsistent)?;
        }

        for user in snapshot.users {
            user.validate().map_err(inconsistent)?;
            for isbn in user.held_loans() {
                match library.catalog.find_by_isbn(isbn) {
                    None => {
                        return Err(StoreError::Inconsistent(format!(
                            "user {} holds unknown book {}",
                            user.user_id(),
                            isbn
                        )))
                    }
                    Some(book) if book.is_available() => {
                        return Err(StoreError::Inconsistent(format!(
                            "user {} holds book {} which is marked available",
                            user.user_id(),
                            isbn
                        )))
                    }
                    Some(_) => {}
                }
                if let Some(other) = library.users.holder_of(isbn) {
                    return Err(StoreError::Inconsistent(format!(
                        "book {} is held by both {} and {}",
                        isbn,
                        other.user_id(),
                        user.user_id()
                    )));
                }
            }
            library.users.insert(user).map_err(inconsistent)?;
        }

        if let Some(book) = library
            .catalog
            .books()
            .find(|book| !book.is_available() && library.users.holder_of(book.isbn()).is_none())
        {
            return Err(StoreError::Inconsistent(format!(
                "book {} is on loan but no user holds it",
                book.isbn()
            )));
        }

        for event in snapshot.events {
            library.ledger.append(event);
        }

        Ok(library)
    }
}
