//! LeetStack core: spaced-repetition scheduling and note chunking.
//!
//! Both engines are pure functions over explicit inputs. The `review` and
//! `config` modules are the thin layer a client uses to run them against
//! stored card records.

pub mod chunker;
pub mod config;
pub mod review;
pub mod scheduler;

pub use chunker::{chunk_by_blocks, chunk_by_headings, group_chunks_by_size, Chunk, ChunkOptions};
pub use config::AppConfig;
pub use review::ReviewService;
pub use scheduler::{
    CardSnapshot, ReviewDifficulty, ReviewScheduler, ScheduleResult, SchedulerConfig, SchedulerVariant,
    StageScheduler,
};
