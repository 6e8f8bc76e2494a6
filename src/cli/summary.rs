use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::summary::{ScoreStats, summarize};

use super::args::SummaryArgs;

pub(crate) fn handle_summary(args: SummaryArgs) -> Result<()> {
    let config = Config::load_unvalidated()?;
    let dataset = Dataset::load(&args.input)?;
    if dataset.is_empty() {
        println!("{} has no rows", args.input.display());
        return Ok(());
    }
    let summary = summarize(&dataset, &config.dataset)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", format!("Summary of {}", args.input.display()).bold());
    println!("   Rows: {}", summary.rows);
    println!("   Pending: {}", summary.pending);
    println!("   Error records: {}", summary.error_records);
    println!("   Complete verdicts: {}", summary.verdicts);
    println!();
    print_stats("Weighted final score", summary.weighted_final_score.as_ref());
    print_stats("Completeness", summary.completeness.as_ref());
    print_stats("Readability", summary.readability.as_ref());
    print_stats("Clinical utility", summary.clinical_utility.as_ref());
    print_stats("Errors per report", summary.errors_per_report.as_ref());

    if summary.verdicts > 0 {
        println!();
        println!("   {:<14} {:>16} {:>10}", "Dimension", "False predictions", "Omissions");
        for totals in &summary.dimensions {
            println!(
                "   {:<14} {:>16} {:>10}",
                totals.dimension, totals.false_predictions, totals.omissions
            );
        }
    }

    Ok(())
}

fn print_stats(label: &str, stats: Option<&ScoreStats>) {
    match stats {
        Some(stats) => println!(
            "   {label}: mean {:.3} (min {:.3}, max {:.3}, n={})",
            stats.mean, stats.min, stats.max, stats.count
        ),
        None => println!("   {label}: {}", "no data".dimmed()),
    }
}
