//! SM-2 Spaced Repetition Algorithm, in whole days
//!
//! Implementation of the SuperMemo 2 algorithm as the old mobile client ran
//! it. Intervals are stored in seconds but always land on whole days.
//!
//! Ratings map onto SM-2 quality (0-5):
//! - easy: 5, perfect response
//! - medium: 4, correct after hesitation
//! - hard: 2, incorrect, resets the card

use chrono::{DateTime, Utc};

use super::algorithm::{ReviewScheduler, SchedulerVariant};
use super::error::Result;
use super::models::{CardSnapshot, ReviewDifficulty, ScheduleResult, SchedulerConfig, DAY_SECONDS};

/// Ease penalty for a failed recall
const FAILURE_EASE_PENALTY: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct Sm2Scheduler {
    config: SchedulerConfig,
}

impl Sm2Scheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

fn quality(difficulty: ReviewDifficulty) -> u8 {
    match difficulty {
        ReviewDifficulty::Easy => 5,
        ReviewDifficulty::Medium => 4,
        ReviewDifficulty::Hard => 2,
    }
}

/// Whole days in an interval, never less than one
pub(crate) fn whole_days(interval_seconds: u64) -> u64 {
    ((interval_seconds as f64 / DAY_SECONDS as f64).round() as u64).max(1)
}

impl ReviewScheduler for Sm2Scheduler {
    fn schedule(
        &self,
        snapshot: &CardSnapshot,
        difficulty: ReviewDifficulty,
        now: DateTime<Utc>,
    ) -> ScheduleResult {
        let current = snapshot.resolve(&self.config);
        let quality = quality(difficulty);

        let (days, repetitions, ease_factor) = if quality >= 3 {
            let days = match current.repetitions {
                0 => 1,
                1 => 6,
                _ => ((whole_days(current.interval) as f64 * current.ease_factor).round() as u64).max(1),
            };

            // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
            let miss = f64::from(5 - quality);
            let ease_factor = current.ease_factor + (0.1 - miss * (0.08 + miss * 0.02));

            (days, current.repetitions.saturating_add(1), ease_factor)
        } else {
            (1, 0, current.ease_factor - FAILURE_EASE_PENALTY)
        };

        let ease_factor = self.config.clamp_ease(ease_factor);
        log::debug!(
            "sm2 schedule: {} (q={}) -> {}d, reps {}",
            difficulty,
            quality,
            days,
            repetitions
        );

        ScheduleResult::at(now, ease_factor, days.saturating_mul(DAY_SECONDS), repetitions)
    }

    fn initial_interval_seconds(&self) -> u64 {
        DAY_SECONDS
    }

    fn variant(&self) -> SchedulerVariant {
        SchedulerVariant::Sm2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn scheduler() -> Sm2Scheduler {
        Sm2Scheduler::new(SchedulerConfig::default()).unwrap()
    }

    #[test]
    fn test_first_review_correct() {
        let result = scheduler().schedule(&CardSnapshot::default(), ReviewDifficulty::Medium, now());

        assert_eq!(result.interval, DAY_SECONDS);
        assert_eq!(result.repetitions, 1);
        // quality 4 leaves the ease factor unchanged
        assert!((result.ease_factor - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_second_review_correct() {
        let snapshot = CardSnapshot::new(2.5, DAY_SECONDS, 1);
        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Medium, now());

        assert_eq!(result.interval, 6 * DAY_SECONDS);
        assert_eq!(result.repetitions, 2);
    }

    #[test]
    fn test_subsequent_review_correct() {
        let snapshot = CardSnapshot::new(2.5, 10 * DAY_SECONDS, 5);
        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Medium, now());

        // 10 * 2.5 = 25
        assert_eq!(result.interval, 25 * DAY_SECONDS);
    }

    #[test]
    fn test_easy_raises_ease() {
        let snapshot = CardSnapshot::new(2.5, 10 * DAY_SECONDS, 5);
        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Easy, now());

        assert!((result.ease_factor - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_review_incorrect_resets() {
        let snapshot = CardSnapshot::new(2.5, 30 * DAY_SECONDS, 5);
        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Hard, now());

        assert_eq!(result.interval, DAY_SECONDS);
        assert_eq!(result.repetitions, 0);
        assert!((result.ease_factor - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_ease_factor_minimum() {
        let snapshot = CardSnapshot::new(1.4, 10 * DAY_SECONDS, 5);

        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Hard, now());
        assert!(result.ease_factor >= 1.3);

        let result2 = scheduler().schedule(&result.snapshot(), ReviewDifficulty::Hard, now());
        assert!(result2.ease_factor >= 1.3);
    }

    #[test]
    fn test_sub_day_interval_counts_as_one_day() {
        let snapshot = CardSnapshot::new(2.5, 60, 3);
        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Medium, now());

        // round(1 * 2.5) = 3
        assert_eq!(result.interval, 3 * DAY_SECONDS);
    }
}
