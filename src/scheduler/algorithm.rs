//! Scheduler capability and variant selection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::Result;
use super::learning_steps::LearningStepsScheduler;
use super::models::{
    CardSnapshot, IntervalPreview, ReviewDifficulty, ScheduleResult, SchedulerConfig, DAY_SECONDS,
};
use super::sm2::Sm2Scheduler;
use super::stage::StageScheduler;

/// Anything that can turn a snapshot and a rating into the next review.
///
/// Implementations are pure: the same snapshot, rating and `now` always give
/// the same result, and nothing is read from or written to storage.
pub trait ReviewScheduler {
    fn schedule(
        &self,
        snapshot: &CardSnapshot,
        difficulty: ReviewDifficulty,
        now: DateTime<Utc>,
    ) -> ScheduleResult;

    /// Interval handed to a card that has never been reviewed
    fn initial_interval_seconds(&self) -> u64;

    fn variant(&self) -> SchedulerVariant;

    /// Interval each rating would produce for this snapshot
    fn preview(&self, snapshot: &CardSnapshot, now: DateTime<Utc>) -> Vec<IntervalPreview> {
        ReviewDifficulty::ALL
            .iter()
            .map(|&difficulty| IntervalPreview {
                difficulty,
                interval: self.schedule(snapshot, difficulty, now).interval,
            })
            .collect()
    }
}

/// Which scheduling policy to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulerVariant {
    /// Stage-index pattern shared by all clients
    #[default]
    Stage,
    /// Whole-day SM-2, kept for snapshots written by the old mobile client
    Sm2,
    /// Learning steps followed by ease-scaled day intervals
    LearningSteps,
}

impl SchedulerVariant {
    pub fn build(self, config: SchedulerConfig) -> Result<Box<dyn ReviewScheduler + Send + Sync>> {
        Ok(match self {
            Self::Stage => Box::new(StageScheduler::new(config)?),
            Self::Sm2 => Box::new(Sm2Scheduler::new(config)?),
            Self::LearningSteps => Box::new(LearningStepsScheduler::new(config)?),
        })
    }
}

/// Format an interval in seconds to a short human-readable string
pub fn format_interval(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;

    if seconds == 0 {
        "now".to_string()
    } else if seconds < MINUTE {
        format!("{}s", seconds)
    } else if seconds < HOUR {
        format!("{}m", seconds / MINUTE)
    } else if seconds < DAY_SECONDS {
        format!("{}h", seconds / HOUR)
    } else {
        let days = seconds / DAY_SECONDS;
        if days < 7 {
            format!("{}d", days)
        } else if days < 30 {
            format!("{}w", days / 7)
        } else if days < 365 {
            format!("{}mo", days / 30)
        } else {
            format!("{}y", days / 365)
        }
    }
}
