//! Block-overlap chunking for flashcard generation.
//!
//! Text is split into line blocks that are packed into chunks of roughly
//! `target_size` characters. Chunk boundaries are pulled back to the nearest
//! heading-like block so a topic is not cut in half, and the trailing blocks
//! of each chunk are repeated at the start of the next for context.

use std::ops::Range;

use regex::RegexBuilder;

use super::models::{ChunkAnchor, ChunkOptions};

/// How far past `target_size` a chunk may grow before the next block is refused.
const OVERSHOOT_CHARS: usize = 200;

/// Blocks with more words than this are treated as body text.
const MAX_HEADING_WORDS: usize = 12;

/// Chunk text into overlapping block-aligned segments.
pub fn chunk_by_blocks(text: &str, options: &ChunkOptions) -> Vec<String> {
    let text = match &options.anchor {
        Some(anchor) => skip_past_anchor(text, anchor),
        None => text,
    };

    let blocks = split_blocks(text);
    let chunks: Vec<String> = block_ranges(&blocks, options)
        .into_iter()
        .map(|range| blocks[range].join("\n").trim().to_string())
        .filter(|chunk| !chunk.is_empty())
        .collect();

    log::debug!(
        "Chunked {} blocks into {} chunks (target {} chars)",
        blocks.len(),
        chunks.len(),
        options.target_size
    );
    chunks
}

/// Drop everything up to and including the line holding the first anchor
/// snippet found. Snippets are tried in order front, back, extra and matched
/// case-insensitively. Text without any match is returned unchanged.
pub fn skip_past_anchor<'a>(text: &'a str, anchor: &ChunkAnchor) -> &'a str {
    for snippet in anchor.snippets() {
        let pattern = match RegexBuilder::new(&regex::escape(snippet))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(e) => {
                log::warn!("Skipping unusable anchor snippet: {}", e);
                continue;
            }
        };

        if let Some(found) = pattern.find(text) {
            let rest = &text[found.end()..];
            return match rest.find('\n') {
                Some(newline) => &rest[newline + 1..],
                None => "",
            };
        }
    }

    text
}

/// Split text into trimmed, non-empty line blocks.
pub fn split_blocks(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether a block looks like a section heading.
///
/// Markdown headings always count. Otherwise a short line that is not a list
/// item and does not end like a sentence is taken as a heading.
pub fn is_likely_heading(block: &str) -> bool {
    let block = block.trim();
    if block.starts_with('#') {
        return true;
    }
    if block.starts_with('-') || block.starts_with('*') {
        return false;
    }
    block.split_whitespace().count() <= MAX_HEADING_WORDS
        && !block.ends_with(['.', '!', '?'])
}

/// Block index ranges for each chunk, in order.
///
/// Every range is non-empty and each one starts strictly after the previous
/// one, so the loop always terminates.
pub(crate) fn block_ranges(blocks: &[&str], options: &ChunkOptions) -> Vec<Range<usize>> {
    let total = blocks.len();
    let lengths: Vec<usize> = blocks.iter().map(|block| block.chars().count()).collect();
    let hard_limit = options.target_size.saturating_add(OVERSHOOT_CHARS);
    let mut ranges = Vec::new();
    let mut start = 0;

    while start < total {
        // Greedy fill; the first block always goes in
        let mut end = start;
        let mut size = 0_usize;
        while end < total {
            let added = lengths[end] + usize::from(end > start);
            if end > start && size.saturating_add(added) > hard_limit {
                break;
            }
            size = size.saturating_add(added);
            end += 1;
            if size >= options.target_size {
                break;
            }
        }

        // Pull the boundary back to the last heading inside the chunk
        if let Some(heading) = (start + 1..end).rev().find(|&i| is_likely_heading(blocks[i])) {
            end = heading;
        }

        ranges.push(start..end);
        start = end.saturating_sub(options.overlap_blocks).max(start + 1);
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(n: usize) -> String {
        format!("Sentence number {} explains one more detail about the algorithm in plain words.", n)
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk_by_blocks("", &ChunkOptions::default()).is_empty());
        assert!(chunk_by_blocks("   \n \n", &ChunkOptions::default()).is_empty());
    }

    #[test]
    fn test_short_text_repeats_tail_block() {
        let chunks = chunk_by_blocks("  Binary search.\n\n  Halve the range each step.  ", &ChunkOptions::default());
        assert_eq!(
            chunks,
            vec![
                "Binary search.\nHalve the range each step.".to_string(),
                "Halve the range each step.".to_string(),
            ]
        );
    }

    #[test]
    fn test_oversized_block_is_kept_whole() {
        let long = "word ".repeat(300);
        let options = ChunkOptions {
            target_size: 100,
            overlap_blocks: 0,
            anchor: None,
        };
        let chunks = chunk_by_blocks(&long, &options);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], long.trim());
    }

    #[test]
    fn test_overlap_repeats_trailing_blocks() {
        let text: Vec<String> = (0..30).map(sentence).collect();
        let text = text.join("\n");
        let chunks = chunk_by_blocks(&text, &ChunkOptions::default());

        assert!(chunks.len() > 1);
        let first: Vec<&str> = chunks[0].lines().collect();
        let second: Vec<&str> = chunks[1].lines().collect();
        assert_eq!(&first[first.len() - 2..], &second[..2]);

        let blocks = split_blocks(&text);
        let ranges = block_ranges(&blocks, &ChunkOptions::default());
        for pair in ranges.windows(2) {
            assert_eq!(pair[1].start, pair[0].end.saturating_sub(2).max(pair[0].start + 1));
        }
    }

    #[test]
    fn test_tail_chunks_run_until_last_block() {
        let chunks = chunk_by_blocks("Arrays\nTwo pointers\nSliding window", &ChunkOptions::default());
        assert_eq!(
            chunks,
            vec![
                "Arrays\nTwo pointers".to_string(),
                "Two pointers".to_string(),
                "Sliding window".to_string(),
            ]
        );

        let blocks = ["Arrays", "Two pointers", "Sliding window"];
        let options = ChunkOptions {
            overlap_blocks: 0,
            ..ChunkOptions::default()
        };
        assert_eq!(block_ranges(&blocks, &options), vec![0..2, 2..3]);
    }

    #[test]
    fn test_huge_target_size_does_not_overflow() {
        let options = ChunkOptions {
            target_size: usize::MAX,
            overlap_blocks: 0,
            anchor: None,
        };
        assert_eq!(chunk_by_blocks("a.\nb.", &options), vec!["a.\nb.".to_string()]);
    }

    #[test]
    fn test_size_counts_characters_not_bytes() {
        let line = "二分查找每次把搜索区间缩小一半直到找到目标值为止好吧.";
        let text = vec![line; 40].join("\n");
        let options = ChunkOptions {
            target_size: 500,
            overlap_blocks: 0,
            anchor: None,
        };
        let chunks = chunk_by_blocks(&text, &options);

        let first = chunks[0].chars().count();
        assert!(first >= 500 && first <= 500 + OVERSHOOT_CHARS, "first chunk has {} chars", first);
        assert!(chunks[0].len() > 500 + OVERSHOOT_CHARS);
    }

    #[test]
    fn test_chunk_size_stays_near_target() {
        let text: Vec<String> = (0..50).map(sentence).collect();
        let text = text.join("\n");
        let options = ChunkOptions::default();
        for chunk in chunk_by_blocks(&text, &options) {
            assert!(chunk.chars().count() <= options.target_size + OVERSHOOT_CHARS);
        }
    }

    #[test]
    fn test_boundary_moves_to_heading() {
        let mut lines: Vec<String> = (0..5).map(sentence).collect();
        lines.push("## Complexity".to_string());
        lines.extend((5..12).map(sentence));
        let blocks: Vec<&str> = lines.iter().map(String::as_str).collect();

        let options = ChunkOptions {
            target_size: 500,
            overlap_blocks: 0,
            anchor: None,
        };
        let ranges = block_ranges(&blocks, &options);

        assert_eq!(ranges[0], 0..5);
        assert_eq!(blocks[ranges[1].start], "## Complexity");
    }

    #[test]
    fn test_ranges_start_strictly_increasing() {
        let text: Vec<String> = (0..40)
            .map(|n| if n % 4 == 0 { format!("Topic {}", n) } else { sentence(n) })
            .collect();
        let blocks: Vec<&str> = text.iter().map(String::as_str).collect();

        for overlap in [0, 1, 2, 5, 50] {
            let options = ChunkOptions {
                target_size: 120,
                overlap_blocks: overlap,
                anchor: None,
            };
            let ranges = block_ranges(&blocks, &options);
            assert!(!ranges.is_empty());
            assert!(ranges.iter().all(|r| r.start < r.end));
            assert!(ranges.windows(2).all(|w| w[0].start < w[1].start));
            assert_eq!(ranges.last().map(|r| r.end), Some(blocks.len()));
        }
    }

    #[test]
    fn test_is_likely_heading() {
        assert!(is_likely_heading("# Two Sum"));
        assert!(is_likely_heading("Approach"));
        assert!(is_likely_heading("Time complexity: O(n)"));
        assert!(!is_likely_heading("- use a hash map"));
        assert!(!is_likely_heading("* sort first"));
        assert!(!is_likely_heading("Store each value."));
        assert!(!is_likely_heading("Why does this work?"));
        assert!(!is_likely_heading(
            "one two three four five six seven eight nine ten eleven twelve thirteen"
        ));
    }

    #[test]
    fn test_anchor_skips_processed_content() {
        let text = "# Two Sum\nUse a HASH MAP for lookups\nnext idea\nfinal idea";
        let anchor = ChunkAnchor {
            front: Some("hash map".to_string()),
            ..ChunkAnchor::default()
        };
        assert_eq!(skip_past_anchor(text, &anchor), "next idea\nfinal idea");

        let chunks = chunk_by_blocks(text, &ChunkOptions::default().with_anchor(anchor));
        assert_eq!(chunks, vec!["next idea".to_string(), "final idea".to_string()]);
    }

    #[test]
    fn test_anchor_on_last_line_leaves_nothing() {
        let anchor = ChunkAnchor {
            back: Some("tail".to_string()),
            ..ChunkAnchor::default()
        };
        assert_eq!(skip_past_anchor("head\ntail", &anchor), "");
        assert!(chunk_by_blocks("head\ntail", &ChunkOptions::default().with_anchor(anchor)).is_empty());
    }

    #[test]
    fn test_anchor_order_and_fallbacks() {
        let text = "alpha\nbeta\ngamma\ndelta";
        let anchor = ChunkAnchor {
            front: Some("not present".to_string()),
            back: Some("   ".to_string()),
            extra: Some("Gamma".to_string()),
        };
        assert_eq!(skip_past_anchor(text, &anchor), "delta");

        let missing = ChunkAnchor {
            front: Some("zeta".to_string()),
            ..ChunkAnchor::default()
        };
        assert_eq!(skip_past_anchor(text, &missing), text);
    }

    #[test]
    fn test_anchor_with_regex_metacharacters() {
        let anchor = ChunkAnchor {
            front: Some("O(n log n)".to_string()),
            ..ChunkAnchor::default()
        };
        assert_eq!(skip_past_anchor("sort is O(N LOG N) here\nrest", &anchor), "rest");
    }
}
