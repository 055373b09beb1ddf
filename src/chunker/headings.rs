//! Heading-aware section chunking.
//!
//! Splits markdown into one chunk per ATX heading so that each section can be
//! summarized on its own, and packs sections into token-bounded groups for the
//! text-generation call.

use std::sync::OnceLock;

use regex::Regex;

use super::models::{Chunk, ChunkGroup};

/// Approximate characters per token (rough estimate for English text).
const CHARS_PER_TOKEN: usize = 4;

/// Title used when a section has no heading of its own.
const UNTITLED_SECTION: &str = "Content";

fn heading_pattern() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^(#{1,6}) +(.+)$").expect("Invalid heading regex"))
}

/// Parse an ATX heading line into (level, title).
fn parse_heading(line: &str) -> Option<(u8, String)> {
    let caps = heading_pattern().captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let title = caps.get(2)?.as_str().trim().to_string();
    Some((level, title))
}

/// Section being accumulated while scanning lines.
struct OpenSection<'a> {
    title: String,
    level: u8,
    start: usize,
    lines: Vec<&'a str>,
}

impl OpenSection<'_> {
    fn close(self, id: usize, end: usize) -> Chunk {
        Chunk {
            id: format!("section-{}", id),
            title: self.title,
            level: self.level,
            content: self.lines.join("\n").trim().to_string(),
            start_index: self.start,
            end_index: end,
        }
    }
}

/// Split markdown into sections, one per heading.
///
/// Each chunk contains its heading line and every line up to the next
/// heading. Text before the first heading becomes an untitled level-1 chunk.
/// Input without any heading comes back as a single untitled chunk, and
/// whitespace-only input yields no chunks.
pub fn chunk_by_headings(markdown: &str) -> Vec<Chunk> {
    if markdown.trim().is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut found_heading = false;
    let mut offset = 0;
    let mut current = OpenSection {
        title: UNTITLED_SECTION.to_string(),
        level: 1,
        start: 0,
        lines: Vec::new(),
    };

    for line in markdown.split('\n') {
        if let Some((level, title)) = parse_heading(line) {
            found_heading = true;
            let previous = std::mem::replace(
                &mut current,
                OpenSection {
                    title,
                    level,
                    start: offset,
                    lines: Vec::new(),
                },
            );
            if previous.lines.iter().any(|l| !l.trim().is_empty()) {
                let id = chunks.len() + 1;
                chunks.push(previous.close(id, offset));
            }
        }
        current.lines.push(line);
        offset += line.len() + 1;
    }

    if !found_heading {
        return vec![Chunk {
            id: "section-1".to_string(),
            title: UNTITLED_SECTION.to_string(),
            level: 1,
            content: markdown.trim().to_string(),
            start_index: 0,
            end_index: markdown.len(),
        }];
    }

    let id = chunks.len() + 1;
    chunks.push(current.close(id, offset.min(markdown.len())));

    log::debug!("Split {} bytes of markdown into {} sections", markdown.len(), chunks.len());
    chunks
}

/// Rejoin section contents in document order.
pub fn join_chunks(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Estimate the number of tokens in text.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Greedily pack consecutive chunks into groups of at most `max_tokens`.
///
/// Chunks are never split. A chunk that exceeds the budget on its own gets a
/// group to itself.
pub fn group_chunks_by_size(chunks: &[Chunk], max_tokens: usize) -> Vec<ChunkGroup> {
    let mut groups: Vec<ChunkGroup> = Vec::new();
    let mut current = ChunkGroup {
        chunks: Vec::new(),
        estimated_tokens: 0,
    };

    for chunk in chunks {
        let tokens = estimate_tokens(&chunk.content);
        if !current.chunks.is_empty() && current.estimated_tokens + tokens > max_tokens {
            groups.push(std::mem::replace(
                &mut current,
                ChunkGroup {
                    chunks: Vec::new(),
                    estimated_tokens: 0,
                },
            ));
        }
        current.chunks.push(chunk.clone());
        current.estimated_tokens += tokens;
    }

    if !current.chunks.is_empty() {
        groups.push(current);
    }

    groups
}
