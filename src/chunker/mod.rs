//! Content chunking for flashcard generation.
//!
//! Two independent strategies:
//! - heading-aware sections (`chunk_by_headings`) grouped by token budget
//! - overlapping line blocks (`chunk_by_blocks`) with anchor-based resumption

mod blocks;
mod headings;
mod models;

pub use blocks::{chunk_by_blocks, is_likely_heading, skip_past_anchor, split_blocks};
pub use headings::{chunk_by_headings, estimate_tokens, group_chunks_by_size, join_chunks};
pub use models::{
    Chunk, ChunkAnchor, ChunkGroup, ChunkOptions, DEFAULT_OVERLAP_BLOCKS, DEFAULT_TARGET_SIZE,
};
