//! Learning steps, then ease-scaled day intervals
//!
//! While `repetitions` is below the number of configured steps the card is
//! still learning and walks through `steps_seconds` one step per `medium`.
//! An `easy` rating graduates it straight away. Graduated cards grow by the
//! ease factor (times `easy_bonus` for `easy`), in whole days.

use chrono::{DateTime, Utc};

use super::algorithm::{ReviewScheduler, SchedulerVariant};
use super::error::Result;
use super::models::{CardSnapshot, ReviewDifficulty, ScheduleResult, SchedulerConfig, DAY_SECONDS};
use super::sm2::whole_days;
use super::stage::ease_delta;

#[derive(Debug, Clone)]
pub struct LearningStepsScheduler {
    config: SchedulerConfig,
}

impl LearningStepsScheduler {
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn step_count(&self) -> u32 {
        u32::try_from(self.config.steps_seconds.len()).unwrap_or(u32::MAX)
    }

    /// First graduated interval in days
    fn graduating_days(&self) -> u64 {
        let last_step = self.config.step(self.config.last_stage());
        last_step.div_ceil(DAY_SECONDS).max(1)
    }
}

impl ReviewScheduler for LearningStepsScheduler {
    fn schedule(
        &self,
        snapshot: &CardSnapshot,
        difficulty: ReviewDifficulty,
        now: DateTime<Utc>,
    ) -> ScheduleResult {
        let current = snapshot.resolve(&self.config);
        let steps = self.step_count();
        let learning = current.repetitions < steps;

        let (interval, repetitions) = match difficulty {
            ReviewDifficulty::Hard => (self.config.step(0), 1),
            ReviewDifficulty::Medium if learning => (
                self.config.step(current.repetitions as usize),
                current.repetitions + 1,
            ),
            ReviewDifficulty::Easy if learning => {
                let days = (self.graduating_days() as f64 * self.config.easy_bonus).ceil() as u64;
                (days.max(1) * DAY_SECONDS, steps)
            }
            ReviewDifficulty::Medium | ReviewDifficulty::Easy => {
                let bonus = if difficulty == ReviewDifficulty::Easy {
                    self.config.easy_bonus
                } else {
                    1.0
                };
                let prev_days = whole_days(current.interval);
                let days = ((prev_days as f64 * current.ease_factor * bonus).round() as u64)
                    .max(prev_days + 1);
                (
                    days.saturating_mul(DAY_SECONDS),
                    current.repetitions.saturating_add(1),
                )
            }
        };

        let ease_factor = self
            .config
            .clamp_ease(current.ease_factor + ease_delta(difficulty));

        log::debug!(
            "learning-steps schedule: {} (learning={}) -> {}s, reps {}",
            difficulty,
            learning,
            interval,
            repetitions
        );

        ScheduleResult::at(now, ease_factor, interval, repetitions)
    }

    fn initial_interval_seconds(&self) -> u64 {
        self.config.step(0)
    }

    fn variant(&self) -> SchedulerVariant {
        SchedulerVariant::LearningSteps
    }
}
