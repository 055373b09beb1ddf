//! Stored review state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::{CardSnapshot, ScheduleResult, DAY_SECONDS};

/// Interval (in seconds) from which a card counts as mature
pub const MATURE_INTERVAL_SECONDS: u64 = 21 * DAY_SECONDS;

/// What the storage collaborator keeps per card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub card_id: String,
    #[serde(default)]
    pub snapshot: CardSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl CardRecord {
    pub fn new(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            snapshot: CardSnapshot::default(),
            last_reviewed_at: None,
            next_review_date: None,
        }
    }

    /// Replace the scheduling state with a fresh decision
    pub fn apply(&mut self, result: &ScheduleResult) {
        self.snapshot = result.snapshot();
        self.last_reviewed_at = Some(result.last_reviewed_at);
        self.next_review_date = Some(result.next_review_date);
    }

    /// Never-reviewed cards are always due
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date.map_or(true, |due| due <= now)
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none() && self.snapshot.is_new()
    }

    pub fn is_mature(&self) -> bool {
        self.snapshot
            .interval
            .map_or(false, |interval| interval >= MATURE_INTERVAL_SECONDS)
    }

    /// Last-writer-wins merge of two copies of the same card, e.g. when two
    /// devices reviewed it close together. The later `last_reviewed_at` wins;
    /// ties and missing timestamps keep `self`.
    pub fn merge(self, other: CardRecord) -> CardRecord {
        match (self.last_reviewed_at, other.last_reviewed_at) {
            (Some(ours), Some(theirs)) if theirs > ours => other,
            (None, Some(_)) => other,
            _ => self,
        }
    }
}

/// Counts over all stored cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub mature_cards: usize,
    pub due_cards: usize,
}
