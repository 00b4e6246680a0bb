//! Saved library — the user's kept suggestions, stored as one JSON array
//! under a single key.
//!
//! Every mutation is read-modify-write of the whole slot with no locking.
//! Two writers racing on the slot both succeed and the later write wins.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::library::kv::{KeyValueStore, KvError};
use crate::models::suggestion::SuggestionRecord;

/// The one storage key the library lives under.
pub const LIBRARY_KEY: &str = "savedProjects";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(#[from] KvError),

    #[error("stored library is not a JSON array of projects: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("could not serialize library: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A record with the same title is already stored; nothing was written.
    Duplicate,
}

#[derive(Clone)]
pub struct SavedLibrary {
    kv: Arc<dyn KeyValueStore>,
}

impl SavedLibrary {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Current contents in insertion order. An absent or empty slot is an empty library.
    pub async fn list(&self) -> Result<Vec<SuggestionRecord>, StoreError> {
        match self.kv.get(LIBRARY_KEY).await? {
            Some(blob) if !blob.trim().is_empty() => {
                serde_json::from_str(&blob).map_err(StoreError::Corrupt)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Appends `record` unless its title is already stored (exact, case-sensitive match).
    pub async fn add(&self, record: SuggestionRecord) -> Result<AddOutcome, StoreError> {
        let mut records = self.list().await?;
        if records.iter().any(|r| r.title == record.title) {
            debug!("'{}' already saved", record.title);
            return Ok(AddOutcome::Duplicate);
        }

        info!("Saving '{}' to library", record.title);
        records.push(record);
        self.write(&records).await?;
        Ok(AddOutcome::Added)
    }

    /// Drops every record titled `title`. Returns how many were removed; zero is fine.
    pub async fn remove(&self, title: &str) -> Result<usize, StoreError> {
        let mut records = self.list().await?;
        let before = records.len();
        records.retain(|r| r.title != title);
        let removed = before - records.len();

        if removed > 0 {
            info!("Removed {removed} record(s) titled '{title}' from library");
            self.write(&records).await?;
        }
        Ok(removed)
    }

    /// Deletes the whole slot.
    pub async fn clear(&self) -> Result<(), StoreError> {
        info!("Clearing saved library");
        self.kv.remove(LIBRARY_KEY).await?;
        Ok(())
    }

    async fn write(&self, records: &[SuggestionRecord]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(records).map_err(StoreError::Serialize)?;
        self.kv.set(LIBRARY_KEY, blob).await?;
        Ok(())
    }
}
