//! Bounded, persisted consultation history.

use super::persistence::{HISTORY_KEY, PersistenceStore, parse_json, read_json};
use crate::error::{MediflowError, Result};
use crate::session::{HistoryEntry, Message};
use chrono::{DateTime, Local};
use std::sync::Arc;

/// Number of entries kept in the persisted history.
pub const HISTORY_CAPACITY: usize = 50;

/// Most-recent-first log of completed exchanges.
///
/// There is no in-memory cache: each mutation reads the stored list, applies
/// its change and writes the whole list back through a single
/// [`PersistenceStore::update`] before returning.
#[derive(Clone)]
pub struct SessionHistoryStore {
    store: Arc<dyn PersistenceStore>,
    capacity: usize,
}

impl SessionHistoryStore {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        Self {
            store,
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Loads all entries, most recent first. A missing key reads as empty.
    pub fn load(&self) -> Result<Vec<HistoryEntry>> {
        Ok(read_json(self.store.as_ref(), HISTORY_KEY)?.unwrap_or_default())
    }

    /// Inserts `entry` at the front, evicting the oldest entries beyond capacity.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        self.modify(move |entries| {
            entries.insert(0, entry);
            Ok(())
        })
    }

    /// Builds an entry for the current conversation and appends it.
    ///
    /// The id is bumped past the current front entry when the clock has not
    /// advanced, so ids stay strictly increasing.
    pub fn record_exchange(
        &self,
        messages: &[Message],
        at: &DateTime<Local>,
    ) -> Result<Option<HistoryEntry>> {
        let Some(mut entry) = HistoryEntry::from_messages(messages, at) else {
            return Ok(None);
        };

        let entry = self.modify(move |entries| {
            if let Some(newest) = entries.first() {
                entry.id = entry.id.max(newest.id + 1);
            }
            entries.insert(0, entry.clone());
            Ok(entry)
        })?;

        tracing::debug!("[SessionHistoryStore] Recorded history entry {}", entry.id);
        Ok(Some(entry))
    }

    /// Removes exactly the entry at `index`. Other ids are left untouched.
    pub fn remove(&self, index: usize) -> Result<HistoryEntry> {
        self.modify(|entries| {
            if index >= entries.len() {
                return Err(MediflowError::not_found("history entry", index.to_string()));
            }
            Ok(entries.remove(index))
        })
    }

    /// Removes every entry.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(HISTORY_KEY)
    }

    /// Entries whose summary (case-insensitive) or date contains `filter`.
    ///
    /// A missing or blank filter returns everything in stored order. A
    /// non-blank filter is matched as given, surrounding spaces included.
    pub fn list(&self, filter: Option<&str>) -> Result<Vec<HistoryEntry>> {
        let entries = self.load()?;
        match filter.filter(|f| !f.trim().is_empty()) {
            Some(filter) => Ok(entries.into_iter().filter(|e| e.matches(filter)).collect()),
            None => Ok(entries),
        }
    }

    /// Applies `change` to the stored list as one store update, then caps it.
    fn modify<R>(&self, change: impl FnOnce(&mut Vec<HistoryEntry>) -> Result<R>) -> Result<R> {
        let capacity = self.capacity;
        let mut change = Some(change);
        let mut output = None;

        self.store.update(HISTORY_KEY, &mut |current: Option<String>| -> Result<String> {
            let mut entries: Vec<HistoryEntry> =
                parse_json(HISTORY_KEY, current.as_deref())?.unwrap_or_default();
            let change = change
                .take()
                .ok_or_else(|| MediflowError::internal("history update applied twice"))?;
            output = Some(change(&mut entries)?);
            entries.truncate(capacity);
            Ok(serde_json::to_string(&entries)?)
        })?;

        output.ok_or_else(|| MediflowError::internal("history update produced no result"))
    }
}
