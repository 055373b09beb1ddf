//! Stage-pattern scheduler
//!
//! A card's `repetitions` is its index into a fixed list of stage durations.
//! `easy` moves it up, `medium` moves it down, `hard` sends it back to the
//! first stage. The ease factor is tracked for analytics only and never feeds
//! into the interval.

use chrono::{DateTime, Utc};

use super::algorithm::{ReviewScheduler, SchedulerVariant};
use super::error::Result;
use super::models::{CardSnapshot, ReviewDifficulty, ScheduleResult, SchedulerConfig};

const EASY_EASE_DELTA: f64 = 0.15;
const MEDIUM_EASE_DELTA: f64 = -0.05;
const HARD_EASE_DELTA: f64 = -0.30;

#[derive(Debug, Clone)]
pub struct StageScheduler {
    config: SchedulerConfig,
}

impl StageScheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn next_stage(&self, stage: usize, difficulty: ReviewDifficulty) -> usize {
        match difficulty {
            ReviewDifficulty::Easy => stage
                .saturating_add(self.config.easy_step as usize)
                .min(self.config.last_stage()),
            ReviewDifficulty::Medium => stage.saturating_sub(self.config.medium_step as usize),
            ReviewDifficulty::Hard => 0,
        }
    }
}

/// Additive ease adjustment for a rating, shared with the learning-steps variant
pub(crate) fn ease_delta(difficulty: ReviewDifficulty) -> f64 {
    match difficulty {
        ReviewDifficulty::Easy => EASY_EASE_DELTA,
        ReviewDifficulty::Medium => MEDIUM_EASE_DELTA,
        ReviewDifficulty::Hard => HARD_EASE_DELTA,
    }
}

impl ReviewScheduler for StageScheduler {
    fn schedule(
        &self,
        snapshot: &CardSnapshot,
        difficulty: ReviewDifficulty,
        now: DateTime<Utc>,
    ) -> ScheduleResult {
        let current = snapshot.resolve(&self.config);

        let stage = (current.repetitions as usize).min(self.config.last_stage());
        let next_stage = self.next_stage(stage, difficulty);
        let interval = self.config.step(next_stage);
        let ease_factor = self
            .config
            .clamp_ease(current.ease_factor + ease_delta(difficulty));

        log::debug!(
            "stage schedule: {} moved stage {} -> {} ({}s)",
            difficulty,
            stage,
            next_stage,
            interval
        );

        ScheduleResult::at(now, ease_factor, interval, next_stage as u32)
    }

    fn initial_interval_seconds(&self) -> u64 {
        self.config.step(0)
    }

    fn variant(&self) -> SchedulerVariant {
        SchedulerVariant::Stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn scheduler() -> StageScheduler {
        StageScheduler::new(SchedulerConfig::with_steps(vec![20, 60, 180])).unwrap()
    }

    #[test]
    fn test_easy_advances_one_stage() {
        let result = scheduler().schedule(&CardSnapshot::new(2.5, 20, 0), ReviewDifficulty::Easy, now());

        assert_eq!(result.repetitions, 1);
        assert_eq!(result.interval, 60);
        assert!((result.ease_factor - 2.65).abs() < 1e-9);
    }

    #[test]
    fn test_medium_at_first_stage_stays() {
        let result = scheduler().schedule(&CardSnapshot::new(2.5, 20, 0), ReviewDifficulty::Medium, now());

        assert_eq!(result.repetitions, 0);
        assert_eq!(result.interval, 20);
        assert!((result.ease_factor - 2.45).abs() < 1e-9);
    }

    #[test]
    fn test_hard_resets_to_first_stage() {
        let result = scheduler().schedule(&CardSnapshot::new(2.0, 180, 2), ReviewDifficulty::Hard, now());

        assert_eq!(result.repetitions, 0);
        assert_eq!(result.interval, 20);
        assert!((result.ease_factor - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_easy_saturates_at_last_stage() {
        let snapshot = CardSnapshot {
            ease_factor: None,
            interval: Some(180),
            repetitions: Some(2),
        };
        let result = scheduler().schedule(&snapshot, ReviewDifficulty::Easy, now());

        assert_eq!(result.repetitions, 2);
        assert_eq!(result.interval, 180);
    }

    #[test]
    fn test_new_card_starts_at_first_stage() {
        let result = scheduler().schedule(&CardSnapshot::default(), ReviewDifficulty::Medium, now());

        assert_eq!(result.repetitions, 0);
        assert_eq!(result.interval, 20);
        assert!((result.ease_factor - 2.45).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_repetitions_are_clamped() {
        let result = scheduler().schedule(&CardSnapshot::new(2.5, 180, 40), ReviewDifficulty::Medium, now());

        assert_eq!(result.repetitions, 1);
        assert_eq!(result.interval, 60);
    }

    #[test]
    fn test_ease_factor_floor() {
        let mut snapshot = CardSnapshot::new(1.35, 20, 0);
        for _ in 0..5 {
            let result = scheduler().schedule(&snapshot, ReviewDifficulty::Hard, now());
            assert!(result.ease_factor >= 1.3);
            snapshot = result.snapshot();
        }
        assert_eq!(snapshot.ease_factor, Some(1.3));
    }

    #[test]
    fn test_larger_steps() {
        let mut config = SchedulerConfig::with_steps(vec![10, 20, 30, 40, 50]);
        config.easy_step = 2;
        config.medium_step = 3;
        let scheduler = StageScheduler::new(config).unwrap();

        let up = scheduler.schedule(&CardSnapshot::new(2.5, 20, 1), ReviewDifficulty::Easy, now());
        assert_eq!(up.repetitions, 3);

        let down = scheduler.schedule(&CardSnapshot::new(2.5, 40, 3), ReviewDifficulty::Medium, now());
        assert_eq!(down.repetitions, 0);
    }

    #[test]
    fn test_dates() {
        let result = scheduler().schedule(&CardSnapshot::default(), ReviewDifficulty::Easy, now());

        assert_eq!(result.last_reviewed_at, now());
        assert_eq!(result.next_review_date, now() + Duration::seconds(60));
    }

    #[test]
    fn test_initial_interval() {
        assert_eq!(scheduler().initial_interval_seconds(), 20);
    }
}
