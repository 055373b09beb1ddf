//! Data models for review scheduling

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{Result, SchedulerError};

/// Seconds in one day
pub const DAY_SECONDS: u64 = 86_400;

/// Longest interval any scheduler will hand out (100 years)
pub const MAX_INTERVAL_SECONDS: u64 = 36_500 * DAY_SECONDS;

/// Self-assessed recall difficulty, reported right after a review attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDifficulty {
    Easy,
    /// Some clients call this rating "good"
    #[serde(alias = "good")]
    Medium,
    Hard,
}

impl ReviewDifficulty {
    pub const ALL: [ReviewDifficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for ReviewDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewDifficulty {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" | "good" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(SchedulerError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Immutable tuning for a scheduler, validated at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Stage (or learning step) durations in seconds, shortest first
    pub steps_seconds: Vec<u64>,
    /// Stages advanced by an `easy` rating
    pub easy_step: u32,
    /// Stages retreated by a `medium` rating
    pub medium_step: u32,
    /// Interval multiplier for `easy` once a card has graduated
    pub easy_bonus: f64,
    pub initial_ease_factor: f64,
    pub min_ease_factor: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            steps_seconds: vec![
                DAY_SECONDS,
                3 * DAY_SECONDS,
                7 * DAY_SECONDS,
                14 * DAY_SECONDS,
                30 * DAY_SECONDS,
                90 * DAY_SECONDS,
            ],
            easy_step: 1,
            medium_step: 1,
            easy_bonus: 1.3,
            initial_ease_factor: 2.5,
            min_ease_factor: 1.3,
        }
    }
}

impl SchedulerConfig {
    /// Config with the given steps and default tuning for everything else
    pub fn with_steps(steps_seconds: Vec<u64>) -> Self {
        Self {
            steps_seconds,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps_seconds.is_empty() {
            return Err(SchedulerError::EmptySteps);
        }
        if let Some(index) = self.steps_seconds.iter().position(|&s| s == 0) {
            return Err(SchedulerError::NonPositiveStep { index });
        }
        if let Some(index) = self.steps_seconds.iter().position(|&s| s > MAX_INTERVAL_SECONDS) {
            return Err(SchedulerError::StepTooLong {
                index,
                max: MAX_INTERVAL_SECONDS,
            });
        }
        if !self.min_ease_factor.is_finite() || self.min_ease_factor <= 0.0 {
            return Err(SchedulerError::InvalidMinEaseFactor(self.min_ease_factor));
        }
        if !self.initial_ease_factor.is_finite() || self.initial_ease_factor < self.min_ease_factor {
            return Err(SchedulerError::InitialEaseBelowMinimum {
                initial: self.initial_ease_factor,
                min: self.min_ease_factor,
            });
        }
        if !self.easy_bonus.is_finite() || self.easy_bonus < 1.0 {
            return Err(SchedulerError::InvalidEasyBonus(self.easy_bonus));
        }
        Ok(())
    }

    /// Index of the last stage
    pub fn last_stage(&self) -> usize {
        self.steps_seconds.len().saturating_sub(1)
    }

    /// Duration of a stage, falling back to the last stage when out of range
    pub fn step(&self, stage: usize) -> u64 {
        self.steps_seconds
            .get(stage)
            .or_else(|| self.steps_seconds.last())
            .copied()
            .unwrap_or(DAY_SECONDS)
    }

    pub fn clamp_ease(&self, ease_factor: f64) -> f64 {
        ease_factor.max(self.min_ease_factor)
    }
}

/// Persisted scheduling state of one card. Absent fields mean "never scheduled".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,
    /// Last computed interval in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
}

/// A snapshot with every default filled in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSnapshot {
    pub ease_factor: f64,
    pub interval: u64,
    pub repetitions: u32,
}

impl CardSnapshot {
    pub fn new(ease_factor: f64, interval: u64, repetitions: u32) -> Self {
        Self {
            ease_factor: Some(ease_factor),
            interval: Some(interval),
            repetitions: Some(repetitions),
        }
    }

    pub fn is_new(&self) -> bool {
        self.repetitions.is_none() && self.interval.is_none()
    }

    /// Fill missing fields from the config. Schedulers call this once before
    /// doing anything else.
    pub fn resolve(&self, config: &SchedulerConfig) -> ResolvedSnapshot {
        ResolvedSnapshot {
            ease_factor: self.ease_factor.unwrap_or(config.initial_ease_factor),
            interval: self.interval.unwrap_or(0),
            repetitions: self.repetitions.unwrap_or(0),
        }
    }
}

/// Outcome of one scheduling decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub ease_factor: f64,
    /// Seconds until the next review
    pub interval: u64,
    pub repetitions: u32,
    pub next_review_date: DateTime<Utc>,
    pub last_reviewed_at: DateTime<Utc>,
}

impl ScheduleResult {
    pub(crate) fn at(now: DateTime<Utc>, ease_factor: f64, interval: u64, repetitions: u32) -> Self {
        let interval = interval.clamp(1, MAX_INTERVAL_SECONDS);
        Self {
            ease_factor,
            interval,
            repetitions,
            next_review_date: now + seconds(interval),
            last_reviewed_at: now,
        }
    }

    /// The subset a caller persists as the card's new snapshot
    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot::new(self.ease_factor, self.interval, self.repetitions)
    }
}

/// Interval a rating would produce, for showing on rating buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalPreview {
    pub difficulty: ReviewDifficulty,
    pub interval: u64,
}

/// Seconds as a chrono duration, capped at [`MAX_INTERVAL_SECONDS`]
pub(crate) fn seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_INTERVAL_SECONDS) as i64)
}
