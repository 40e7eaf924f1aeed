//! In-memory user registry

use indexmap::{map::Entry, IndexMap};

use crate::{
    error::{LibraryError, LibraryResult},
    models::User,
};

/// Owns every registered user, keyed by user id and kept in registration order
#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    users: IndexMap<String, User>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, user_id: &str, name: &str) -> LibraryResult<()> {
        if self.users.contains_key(user_id) {
            return Err(LibraryError::DuplicateUser(user_id.to_string()));
        }
        self.insert(User::new(user_id, name)?)
    }

    pub(crate) fn insert(&mut self, user: User) -> LibraryResult<()> {
        match self.users.entry(user.user_id().to_string()) {
            Entry::Occupied(entry) => Err(LibraryError::DuplicateUser(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(user);
                Ok(())
            }
        }
    }

    /// Remove a user holding no books
    pub fn deregister(&mut self, user_id: &str) -> LibraryResult<User> {
        match self.users.get(user_id) {
            None => return Err(LibraryError::UnknownUser(user_id.to_string())),
            Some(user) if user.has_loans() => {
                return Err(LibraryError::UserHasLoans {
                    user_id: user_id.to_string(),
                    count: user.loan_count(),
                })
            }
            Some(_) => {}
        }
        self.users
            .shift_remove(user_id)
            .ok_or_else(|| LibraryError::UnknownUser(user_id.to_string()))
    }

    pub fn find(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub(crate) fn get_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.get_mut(user_id)
    }

    /// User currently holding the given book, if any
    pub fn holder_of(&self, isbn: &str) -> Option<&User> {
        self.users.values().find(|user| user.holds(isbn))
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
