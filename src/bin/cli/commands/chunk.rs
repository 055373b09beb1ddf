use anyhow::Result;

use leetstack_lib::chunker::{
    chunk_by_blocks, chunk_by_headings, estimate_tokens, group_chunks_by_size, ChunkOptions,
};

use crate::OutputFormat;

pub fn run_sections(text: &str, format: &OutputFormat) -> Result<()> {
    let chunks = chunk_by_headings(text);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        OutputFormat::Plain => {
            for chunk in &chunks {
                println!(
                    "{} {} {} [{}..{}] ~{} tokens",
                    chunk.id,
                    "#".repeat(chunk.level as usize),
                    chunk.title,
                    chunk.start_index,
                    chunk.end_index,
                    estimate_tokens(&chunk.content)
                );
            }
        }
    }

    Ok(())
}

pub fn run_blocks(text: &str, options: &ChunkOptions, format: &OutputFormat) -> Result<()> {
    let chunks = chunk_by_blocks(text, options);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        OutputFormat::Plain => {
            for (index, chunk) in chunks.iter().enumerate() {
                println!("--- chunk {} ({} chars) ---", index + 1, chunk.len());
                println!("{}", chunk);
            }
        }
    }

    Ok(())
}

pub fn run_groups(text: &str, max_tokens: usize, format: &OutputFormat) -> Result<()> {
    let groups = group_chunks_by_size(&chunk_by_headings(text), max_tokens);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        OutputFormat::Plain => {
            for (index, group) in groups.iter().enumerate() {
                let titles: Vec<&str> = group.chunks.iter().map(|c| c.title.as_str()).collect();
                println!(
                    "group {} (~{} tokens): {}",
                    index + 1,
                    group.estimated_tokens,
                    titles.join(", ")
                );
            }
        }
    }

    Ok(())
}
