//! Append-only lending ledger

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{LoanAction, LoanEvent};

#[derive(Debug, Clone, Default)]
pub struct LendingLedger {
    events: Vec<LoanEvent>,
}

impl LendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new event and return it
    pub fn record(
        &mut self,
        action: LoanAction,
        user_id: &str,
        isbn: &str,
        title: &str,
        timestamp: DateTime<Utc>,
    ) -> &LoanEvent {
        self.append(LoanEvent {
            id: Uuid::new_v4(),
            action,
            timestamp,
            user_id: user_id.to_string(),
            isbn: isbn.to_string(),
            title: title.to_string(),
        })
    }

    pub(crate) fn append(&mut self, event: LoanEvent) -> &LoanEvent {
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    pub fn history_for_user(&self, user_id: &str) -> Vec<&LoanEvent> {
        self.events.iter().filter(|e| e.user_id == user_id).collect()
    }

    pub fn history_for_book(&self, isbn: &str) -> Vec<&LoanEvent> {
        self.events.iter().filter(|e| e.isbn == isbn).collect()
    }

    pub fn events(&self) -> &[LoanEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
