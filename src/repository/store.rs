//! Flat-file persistence of the whole library.
//!
//! The on-disk format is JSON Lines with one record per entity, tagged by
//! kind: books first, then users, then ledger events in ledger order.
//!
//! ```text
//! {"record":"book","isbn":"978-1","title":"Dune","author":"Herbert","category":"SciFi","available":false}
//! {"record":"user","user_id":"U1","name":"Ana","held_loans":["978-1"]}
//! {"record":"event","id":"…","action":"loan","timestamp":"…","user_id":"U1","isbn":"978-1","title":"Dune"}
//! ```

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    models::{Book, LoanEvent, User},
};

/// Complete, ordered content of catalog, registry and ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub events: Vec<LoanEvent>,
}

#[derive(Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum Record {
    Book(Book),
    User(User),
    Event(LoanEvent),
}

#[derive(Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
enum RecordRef<'a> {
    Book(&'a Book),
    User(&'a User),
    Event(&'a LoanEvent),
}

/// Durable storage for library snapshots
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore: Send + Sync {
    /// Read the stored snapshot; `None` when nothing was stored yet
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp_path = self.temp_path();
        let result = write_records(&temp_path, snapshot)
            .and_then(|()| fs::rename(&temp_path, &self.path))
            .map_err(|e| self.io_error(e));

        if result.is_err() {
            // A partial temp file must not outlive a failed save
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_records(path: &Path, snapshot: &Snapshot) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    let records = snapshot
        .books
        .iter()
        .map(RecordRef::Book)
        .chain(snapshot.users.iter().map(RecordRef::User))
        .chain(snapshot.events.iter().map(RecordRef::Event));

    for record in records {
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}
