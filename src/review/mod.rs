//! Review bookkeeping around the scheduler
//!
//! This module provides:
//! - Injectable clocks
//! - Card records and last-writer-wins merging
//! - Snapshot stores (in-memory and JSON files)
//! - `ReviewService`: load, schedule, persist, plus due lists and stats

pub mod clock;
pub mod models;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use models::{CardRecord, ReviewStats, MATURE_INTERVAL_SECONDS};
pub use service::ReviewService;
pub use store::{JsonSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreError};
