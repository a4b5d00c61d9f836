//! Bounded, persistent cache of past optimize queries and results.
//!
//! Entries are kept newest-first and capped at [`HISTORY_CAPACITY`]; every
//! mutation rewrites the full persisted payload (the cap keeps it small).
//! A corrupt or absent payload degrades to an empty store, never an error.

use std::io::{self, ErrorKind};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::HistoryEntry;
use crate::storage::{HistoryStorage, StorageError};

/// Maximum number of retained entries.
pub const HISTORY_CAPACITY: usize = 10;

const PERSISTED_VERSION: u32 = 1;

/// Versioned on-disk envelope. Unknown versions are discarded on load.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedHistory {
    version: u32,
    entries: Vec<HistoryEntry>,
}

/// Current epoch milliseconds, the creation stamp for new entries.
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// The history cache. Owns its entries; the active selection is a
/// non-owning reference by timestamp, cleared whenever the referenced
/// entry leaves the store.
#[derive(Debug)]
pub struct HistoryStore<S> {
    entries: Vec<HistoryEntry>,
    selected: Option<u64>,
    storage: S,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Load the store from persisted state.
    pub fn open(storage: S) -> Self {
        let entries = match storage.load() {
            Ok(Some(bytes)) => decode(&bytes),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!("history storage unreadable, starting empty: {}", err);
                Vec::new()
            }
        };
        let mut store = Self {
            entries,
            selected: None,
            storage,
        };
        store.entries.truncate(HISTORY_CAPACITY);
        store
    }

    /// Insert a new entry at the front, evicting beyond capacity.
    ///
    /// A timestamp colliding with a stored key is bumped forward until
    /// unique; the stored key is returned.
    pub fn append(&mut self, mut entry: HistoryEntry) -> Result<u64, StorageError> {
        while self.entries.iter().any(|e| e.timestamp == entry.timestamp) {
            entry.timestamp += 1;
        }
        let key = entry.timestamp;
        self.entries.insert(0, entry);
        if self.entries.len() > HISTORY_CAPACITY {
            let evicted = self.entries.len() - HISTORY_CAPACITY;
            tracing::debug!("history at capacity, evicting {} oldest", evicted);
            self.entries.truncate(HISTORY_CAPACITY);
            if let Some(selected) = self.selected {
                if !self.contains(selected) {
                    self.selected = None;
                }
            }
        }
        self.persist()?;
        Ok(key)
    }

    /// Remove the entry with the given timestamp. Removing an absent key
    /// is a no-op, not an error; the list is re-persisted either way.
    pub fn remove(&mut self, timestamp: u64) -> Result<(), StorageError> {
        self.entries.retain(|entry| entry.timestamp != timestamp);
        if self.selected == Some(timestamp) {
            self.selected = None;
        }
        self.persist()
    }

    /// Empty the store and the selection.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.selected = None;
        self.persist()
    }

    /// Mark and return the entry for detail display. An absent key leaves
    /// the current selection untouched.
    pub fn select(&mut self, timestamp: u64) -> Option<&HistoryEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.timestamp == timestamp)?;
        self.selected = Some(timestamp);
        Some(&self.entries[index])
    }

    pub fn selected(&self) -> Option<&HistoryEntry> {
        let key = self.selected?;
        self.entries.iter().find(|entry| entry.timestamp == key)
    }

    pub fn selected_key(&self) -> Option<u64> {
        self.selected
    }

    /// Entries newest-first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains(&self, timestamp: u64) -> bool {
        self.entries.iter().any(|entry| entry.timestamp == timestamp)
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let payload = PersistedHistory {
            version: PERSISTED_VERSION,
            entries: self.entries.clone(),
        };
        let bytes = serde_json::to_vec(&payload)
            .map_err(|err| StorageError::Io(io::Error::new(ErrorKind::InvalidData, err)))?;
        self.storage.save(&bytes)
    }
}

/// Decode a persisted payload, degrading to empty on anything unexpected.
///
/// Accepts the current versioned envelope and migrates the legacy layout
/// (a bare entry array with no version tag).
fn decode(bytes: &[u8]) -> Vec<HistoryEntry> {
    match serde_json::from_slice::<PersistedHistory>(bytes) {
        Ok(payload) if payload.version == PERSISTED_VERSION => payload.entries,
        Ok(payload) => {
            tracing::warn!(
                "discarding persisted history with unknown version {}",
                payload.version
            );
            Vec::new()
        }
        Err(_) => match serde_json::from_slice::<Vec<HistoryEntry>>(bytes) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("corrupt persisted history, starting empty: {}", err);
                Vec::new()
            }
        },
    }
}
