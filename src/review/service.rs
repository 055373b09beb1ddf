//! Fetch, schedule, persist

use chrono::{DateTime, Utc};

use crate::scheduler::{IntervalPreview, ReviewDifficulty, ReviewScheduler, ScheduleResult};

use super::clock::Clock;
use super::models::{CardRecord, ReviewStats};
use super::store::{Result, SnapshotStore};

/// Runs reviews against a store with an injected scheduler and clock
pub struct ReviewService<S, C> {
    scheduler: Box<dyn ReviewScheduler + Send + Sync>,
    store: S,
    clock: C,
}

impl<S: SnapshotStore, C: Clock> ReviewService<S, C> {
    pub fn new(scheduler: Box<dyn ReviewScheduler + Send + Sync>, store: S, clock: C) -> Self {
        Self {
            scheduler,
            store,
            clock,
        }
    }

    pub fn scheduler(&self) -> &dyn ReviewScheduler {
        self.scheduler.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current time according to the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Seconds a card is past its due date, zero when not yet due or new
    pub fn overdue_seconds(&self, record: &CardRecord) -> u64 {
        record
            .next_review_date
            .map(|date| (self.now() - date).num_seconds().max(0) as u64)
            .unwrap_or(0)
    }

    fn record(&self, card_id: &str) -> Result<CardRecord> {
        Ok(self
            .store
            .load(card_id)?
            .unwrap_or_else(|| CardRecord::new(card_id)))
    }

    /// Record a review and persist the new schedule
    pub fn review(&mut self, card_id: &str, difficulty: ReviewDifficulty) -> Result<ScheduleResult> {
        let mut record = self.record(card_id)?;
        let result = self
            .scheduler
            .schedule(&record.snapshot, difficulty, self.clock.now());

        record.apply(&result);
        self.store.save(&record)?;

        log::info!(
            "Reviewed {} as {}: next review {} (stage/reps {})",
            card_id,
            difficulty,
            result.next_review_date,
            result.repetitions
        );
        Ok(result)
    }

    /// Interval each rating would give a card, without saving anything
    pub fn preview(&self, card_id: &str) -> Result<Vec<IntervalPreview>> {
        let record = self.record(card_id)?;
        Ok(self.scheduler.preview(&record.snapshot, self.clock.now()))
    }

    /// Due date to show for a card that has not been reviewed yet
    pub fn initial_due_date(&self) -> DateTime<Utc> {
        self.clock.now() + crate::scheduler::models::seconds(self.scheduler.initial_interval_seconds())
    }

    /// Store a record coming from another device, keeping whichever copy was
    /// reviewed last
    pub fn merge_remote(&mut self, remote: CardRecord) -> Result<CardRecord> {
        let merged = match self.store.load(&remote.card_id)? {
            Some(local) => local.merge(remote),
            None => remote,
        };
        self.store.save(&merged)?;
        Ok(merged)
    }

    /// Cards due now, oldest due date first; never-reviewed cards lead
    pub fn due_cards(&self) -> Result<Vec<CardRecord>> {
        let now = self.clock.now();
        let mut due: Vec<CardRecord> = self
            .store
            .list()?
            .into_iter()
            .filter(|record| record.is_due(now))
            .collect();

        due.sort_by(|a, b| {
            a.next_review_date
                .cmp(&b.next_review_date)
                .then_with(|| a.card_id.cmp(&b.card_id))
        });
        Ok(due)
    }

    pub fn stats(&self) -> Result<ReviewStats> {
        let now = self.clock.now();
        let records = self.store.list()?;

        let mut stats = ReviewStats {
            total_cards: records.len(),
            ..ReviewStats::default()
        };

        for record in &records {
            if record.is_new() {
                stats.new_cards += 1;
            } else if record.is_mature() {
                stats.mature_cards += 1;
            } else {
                stats.learning_cards += 1;
            }

            if record.is_due(now) {
                stats.due_cards += 1;
            }
        }

        Ok(stats)
    }
}
