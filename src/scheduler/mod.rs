//! Spaced repetition scheduling for LeetStack
//!
//! This module provides:
//! - The `ReviewScheduler` capability shared by every scheduling policy
//! - The stage-pattern scheduler (the one all clients use)
//! - SM-2 and learning-steps schedulers for older persisted snapshots
//! - Snapshot/result models and config validation

pub mod algorithm;
pub mod error;
pub mod learning_steps;
pub mod models;
pub mod sm2;
pub mod stage;

pub use algorithm::{format_interval, ReviewScheduler, SchedulerVariant};
pub use error::SchedulerError;
pub use learning_steps::LearningStepsScheduler;
pub use models::*;
pub use sm2::Sm2Scheduler;
pub use stage::StageScheduler;
