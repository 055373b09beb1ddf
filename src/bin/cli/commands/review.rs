use anyhow::Result;

use leetstack_lib::review::{Clock, ReviewService, SnapshotStore};
use leetstack_lib::scheduler::{format_interval, ReviewDifficulty};

use crate::OutputFormat;

pub fn run_review<S: SnapshotStore, C: Clock>(
    service: &mut ReviewService<S, C>,
    card: &str,
    rating: ReviewDifficulty,
    format: &OutputFormat,
) -> Result<()> {
    let result = service.review(card, rating)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}: {} -> next review in {} ({})",
                card,
                rating,
                format_interval(result.interval),
                result.next_review_date.format("%Y-%m-%d %H:%M UTC")
            );
            println!(
                "    stage {}  ease {:.2}",
                result.repetitions, result.ease_factor
            );
        }
    }

    Ok(())
}

pub fn run_preview<S: SnapshotStore, C: Clock>(
    service: &ReviewService<S, C>,
    card: &str,
    format: &OutputFormat,
) -> Result<()> {
    let preview = service.preview(card)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        OutputFormat::Plain => {
            for entry in &preview {
                println!("{:<8} {}", entry.difficulty, format_interval(entry.interval));
            }
        }
    }

    Ok(())
}

pub fn run_due<S: SnapshotStore, C: Clock>(
    service: &ReviewService<S, C>,
    format: &OutputFormat,
) -> Result<()> {
    let due = service.due_cards()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due.");
            }
            for record in &due {
                match record.next_review_date {
                    Some(_) => {
                        let overdue = service.overdue_seconds(record);
                        println!("  {} (overdue {})", record.card_id, format_interval(overdue));
                    }
                    None => println!("  {} (new)", record.card_id),
                }
            }
        }
    }

    Ok(())
}

pub fn run_stats<S: SnapshotStore, C: Clock>(
    service: &ReviewService<S, C>,
    format: &OutputFormat,
) -> Result<()> {
    let stats = service.stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Cards:    {}", stats.total_cards);
            println!("  new:      {}", stats.new_cards);
            println!("  learning: {}", stats.learning_cards);
            println!("  mature:   {}", stats.mature_cards);
            println!("Due now:  {}", stats.due_cards);
        }
    }

    Ok(())
}
