//! Data models for chunking operations.

use serde::{Deserialize, Serialize};

/// Default soft character budget per block chunk.
pub const DEFAULT_TARGET_SIZE: usize = 500;

/// Default number of trailing blocks repeated at the start of the next chunk.
pub const DEFAULT_OVERLAP_BLOCKS: usize = 2;

/// A heading-delimited section of a markdown document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// `section-{n}`, 1-indexed in document order
    pub id: String,
    pub title: String,
    /// Heading level, 1-6
    pub level: u8,
    /// Heading line plus body, trimmed
    pub content: String,
    /// Byte offset of the chunk's first line in the source text
    pub start_index: usize,
    /// Byte offset just past the chunk's last line (clamped to the text length)
    pub end_index: usize,
}

/// Snippets from a previously generated flashcard, used to resume chunking
/// after content that has already been turned into cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkAnchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl ChunkAnchor {
    /// Non-blank snippets in lookup order: front, back, extra
    pub fn snippets(&self) -> impl Iterator<Item = &str> {
        [&self.front, &self.back, &self.extra]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.snippets().next().is_none()
    }
}

/// Options for the block-overlap chunker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkOptions {
    #[serde(default = "default_target_size")]
    pub target_size: usize,
    #[serde(default = "default_overlap_blocks")]
    pub overlap_blocks: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<ChunkAnchor>,
}

fn default_target_size() -> usize {
    DEFAULT_TARGET_SIZE
}

fn default_overlap_blocks() -> usize {
    DEFAULT_OVERLAP_BLOCKS
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            overlap_blocks: DEFAULT_OVERLAP_BLOCKS,
            anchor: None,
        }
    }
}

impl ChunkOptions {
    #[must_use]
    pub fn with_anchor(mut self, anchor: ChunkAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// Consecutive heading chunks packed under a token budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkGroup {
    pub chunks: Vec<Chunk>,
    pub estimated_tokens: usize,
}

impl ChunkGroup {
    /// Group contents separated by a blank line, ready to go into a prompt.
    pub fn text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
