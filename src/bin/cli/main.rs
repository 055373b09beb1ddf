mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use leetstack_lib::scheduler::ReviewDifficulty;

#[derive(Parser)]
#[command(name = "leetstack-cli", about = "LeetStack review scheduler and note chunker", version)]
struct Cli {
    /// Config file (default: <config dir>/leetstack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding card records (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Record a review and print the next due date
    Review {
        /// Card id (problem slug or flashcard id)
        card: String,
        /// easy, medium (or good), hard
        #[arg(value_parser = parse_difficulty)]
        rating: ReviewDifficulty,
    },

    /// Show the interval each rating would give a card
    Preview {
        /// Card id
        card: String,
    },

    /// List cards that are due now
    Due,

    /// Show review statistics
    Stats,

    /// Split a notes file into chunks
    #[command(subcommand)]
    Chunk(ChunkCommand),
}

#[derive(Subcommand)]
enum ChunkCommand {
    /// One chunk per markdown heading
    Sections {
        /// Input file ("-" for stdin)
        file: String,
    },

    /// Overlapping line-block chunks
    Blocks {
        /// Input file ("-" for stdin)
        file: String,
        /// Soft character budget per chunk
        #[arg(long)]
        target_size: Option<usize>,
        /// Blocks repeated at the start of the next chunk
        #[arg(long)]
        overlap: Option<usize>,
        /// Front of the last generated card; chunking resumes after it
        #[arg(long)]
        front: Option<String>,
        /// Back of the last generated card
        #[arg(long)]
        back: Option<String>,
        /// Extra text of the last generated card
        #[arg(long)]
        extra: Option<String>,
    },

    /// Heading sections packed into token-bounded groups
    Groups {
        /// Input file ("-" for stdin)
        file: String,
        /// Token budget per group
        #[arg(long)]
        max_tokens: Option<usize>,
    },
}

fn parse_difficulty(value: &str) -> Result<ReviewDifficulty, String> {
    value.parse().map_err(|e: leetstack_lib::scheduler::SchedulerError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Review { card, rating } => {
            let mut service = app.review_service()?;
            commands::review::run_review(&mut service, &card, rating, &cli.format)?;
        }
        Command::Preview { card } => {
            let service = app.review_service()?;
            commands::review::run_preview(&service, &card, &cli.format)?;
        }
        Command::Due => {
            let service = app.review_service()?;
            commands::review::run_due(&service, &cli.format)?;
        }
        Command::Stats => {
            let service = app.review_service()?;
            commands::review::run_stats(&service, &cli.format)?;
        }
        Command::Chunk(ChunkCommand::Sections { file }) => {
            let text = app::read_input(&file)?;
            commands::chunk::run_sections(&text, &cli.format)?;
        }
        Command::Chunk(ChunkCommand::Blocks { file, target_size, overlap, front, back, extra }) => {
            let text = app::read_input(&file)?;
            let mut options = app.config.chunker.chunk_options();
            if let Some(target_size) = target_size {
                options.target_size = target_size;
            }
            if let Some(overlap) = overlap {
                options.overlap_blocks = overlap;
            }
            let anchor = leetstack_lib::chunker::ChunkAnchor { front, back, extra };
            if !anchor.is_empty() {
                options = options.with_anchor(anchor);
            }
            commands::chunk::run_blocks(&text, &options, &cli.format)?;
        }
        Command::Chunk(ChunkCommand::Groups { file, max_tokens }) => {
            let text = app::read_input(&file)?;
            let max_tokens = max_tokens.unwrap_or(app.config.chunker.max_group_tokens);
            commands::chunk::run_groups(&text, max_tokens, &cli.format)?;
        }
    }

    Ok(())
}
