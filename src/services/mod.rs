//! Business logic services

pub mod library;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    error::{AppError, AppResult, LibraryResult},
    repository::SnapshotStore,
};

pub use library::LibraryService;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub library: LibraryHandle,
}

impl Services {
    /// Open the library from the given store, or start empty without one
    pub fn new(store: Option<Arc<dyn SnapshotStore>>) -> AppResult<Self> {
        Ok(Self {
            library: LibraryHandle::open(store)?,
        })
    }
}

/// Shared access to the single library instance.
///
/// Each call holds the lock for the whole operation, including the
/// persistence write, so operations never interleave. When a store is
/// configured a mutation is only kept if its snapshot was saved.
///
/// `read` and `write` run on tokio's blocking pool; `read_sync` and
/// `write_sync` are for callers outside the runtime.
#[derive(Clone)]
pub struct LibraryHandle {
    inner: Arc<Mutex<LibraryService>>,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl LibraryHandle {
    pub fn new(library: LibraryService, store: Option<Arc<dyn SnapshotStore>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(library)),
            store,
        }
    }

    /// Load the stored snapshot, or start with an empty library
    pub fn open(store: Option<Arc<dyn SnapshotStore>>) -> AppResult<Self> {
        let library = match store.as_ref().map(|s| s.load()).transpose()?.flatten() {
            Some(snapshot) => LibraryService::from_snapshot(snapshot)?,
            None => LibraryService::new(),
        };

        let summary = library.summary();
        tracing::info!(
            "Library opened: {} books, {} users, {} on loan, {} ledger entries",
            summary.total_books,
            summary.total_users,
            summary.books_on_loan,
            summary.ledger_entries
        );

        Ok(Self::new(library, store))
    }

    /// Whether mutations are written to a store
    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    /// Run a read-only operation without blocking the async runtime
    pub async fn read<T, F>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(&LibraryService) -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.clone();
        tokio::task::spawn_blocking(move || handle.read_sync(op))
            .await
            .map_err(|e| AppError::Internal(format!("library task failed: {}", e)))?
    }

    /// Run a mutating operation as one transaction without blocking the async runtime
    pub async fn write<T, F>(&self, action: &'static str, op: F) -> AppResult<T>
    where
        F: FnOnce(&mut LibraryService) -> LibraryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.clone();
        tokio::task::spawn_blocking(move || handle.write_sync(action, op))
            .await
            .map_err(|e| AppError::Internal(format!("library task failed: {}", e)))?
    }

    pub fn read_sync<T>(&self, op: impl FnOnce(&LibraryService) -> T) -> AppResult<T> {
        let library = self.lock()?;
        Ok(op(&library))
    }

    pub fn write_sync<T>(
        &self,
        action: &str,
        op: impl FnOnce(&mut LibraryService) -> LibraryResult<T>,
    ) -> AppResult<T> {
        let mut library = self.lock()?;
        let before = self.store.as_ref().map(|_| library.clone());

        let value = match op(&mut library) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("{} rejected: {}", action, e);
                return Err(e.into());
            }
        };

        if let (Some(store), Some(before)) = (&self.store, before) {
            if let Err(e) = store.save(&library.snapshot()) {
                tracing::error!("{} rolled back, snapshot not saved: {}", action, e);
                *library = before;
                return Err(e.into());
            }
        }

        tracing::info!("{} committed", action);
        Ok(value)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, LibraryService>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("library lock poisoned".to_string()))
    }
}
