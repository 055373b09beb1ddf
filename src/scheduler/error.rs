use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("steps_seconds must contain at least one step")]
    EmptySteps,

    #[error("step {index} must be a positive number of seconds")]
    NonPositiveStep { index: usize },

    #[error("step {index} is longer than the {max} second interval cap")]
    StepTooLong { index: usize, max: u64 },

    #[error("min_ease_factor must be a positive finite number, got {0}")]
    InvalidMinEaseFactor(f64),

    #[error("initial_ease_factor {initial} is below min_ease_factor {min}")]
    InitialEaseBelowMinimum { initial: f64, min: f64 },

    #[error("easy_bonus must be a finite number >= 1.0, got {0}")]
    InvalidEasyBonus(f64),

    #[error("unknown difficulty rating: {0:?}")]
    UnknownDifficulty(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
