//! Snapshot storage collaborators
//!
//! The scheduler never touches storage; the review service loads a record,
//! schedules it and hands the result back here. `JsonSnapshotStore` keeps one
//! file per card:
//! ```text
//! {data-dir}/cards/
//! └── {card-id}.json   # CardRecord
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use super::models::CardRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid card id: {0:?}")]
    InvalidCardId(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persists one `CardRecord` per card id
pub trait SnapshotStore {
    fn load(&self, card_id: &str) -> Result<Option<CardRecord>>;

    fn save(&mut self, record: &CardRecord) -> Result<()>;

    fn list(&self) -> Result<Vec<CardRecord>>;

    /// Returns whether a record was removed
    fn remove(&mut self, card_id: &str) -> Result<bool>;
}

/// In-process store, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    records: BTreeMap<String, CardRecord>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, card_id: &str) -> Result<Option<CardRecord>> {
        Ok(self.records.get(card_id).cloned())
    }

    fn save(&mut self, record: &CardRecord) -> Result<()> {
        self.records.insert(record.card_id.clone(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<CardRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn remove(&mut self, card_id: &str) -> Result<bool> {
        Ok(self.records.remove(card_id).is_some())
    }
}

/// One pretty-printed JSON file per card
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    /// Base path for card files (e.g., ~/.local/share/leetstack/cards)
    cards_dir: PathBuf,
}

impl JsonSnapshotStore {
    /// Open a store under `data_dir`, creating the cards directory if needed
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        let cards_dir = data_dir.join("cards");
        fs::create_dir_all(&cards_dir)?;
        Ok(Self { cards_dir })
    }

    /// Get the path for a card's record
    fn card_path(&self, card_id: &str) -> Result<PathBuf> {
        let valid = !card_id.is_empty()
            && card_id != "."
            && card_id != ".."
            && !card_id.contains(['/', '\\', '\0']);
        if !valid {
            return Err(StoreError::InvalidCardId(card_id.to_string()));
        }
        Ok(self.cards_dir.join(format!("{}.json", card_id)))
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self, card_id: &str) -> Result<Option<CardRecord>> {
        let path = self.card_path(card_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let record: CardRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    fn save(&mut self, record: &CardRecord) -> Result<()> {
        let path = self.card_path(&record.card_id)?;
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<CardRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.cards_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<CardRecord>(&content) {
                    Ok(record) => records.push(record),
                    Err(e) => log::warn!("Skipping unreadable card file {:?}: {}", path, e),
                }
            }
        }

        records.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        Ok(records)
    }

    fn remove(&mut self, card_id: &str) -> Result<bool> {
        let path = self.card_path(card_id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}
