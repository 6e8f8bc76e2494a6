use anyhow::{Context, Result};
use colored::Colorize;

use crate::client::{HttpClientFactory, LlmClientFactory};
use crate::config::Config;
use crate::runner::{RunOptions, run_evaluation};

use super::args::EvalArgs;

pub(crate) async fn handle_eval(args: EvalArgs) -> Result<()> {
    let config = Config::load(|config| apply_overrides(&args, config))?;

    let client = HttpClientFactory.build(&config.llm)?;

    let options = RunOptions {
        output: args.output,
        limit: args.limit,
        force: args.force,
        show_progress: !args.no_progress,
        ..RunOptions::new(args.input)
    };

    println!(
        "Grading {} with {} via {} ({})",
        options.input.display(),
        config.generation.model.bold(),
        config.llm.provider.display_name(),
        config.llm.base_url
    );

    let summary = run_evaluation(client.as_ref(), &config, &options)
        .await
        .context("Evaluation run failed")?;

    println!();
    println!("{}", "Evaluation finished".green().bold());
    println!("   Rows considered: {}", summary.total);
    println!("   Graded: {}", summary.graded);
    println!("   Already done: {}", summary.skipped);
    if summary.failed > 0 {
        println!(
            "   {} {} (rerun to retry them)",
            "Failed:".red(),
            summary.failed
        );
    }
    println!("   Results: {}", options.output_path().display());

    Ok(())
}

fn apply_overrides(args: &EvalArgs, config: &mut Config) {
    if let Some(model) = &args.model {
        config.generation.model = model.clone();
    }
    if let Some(max_tokens) = args.max_tokens {
        config.generation.max_tokens = max_tokens;
    }
    if let Some(column) = &args.prediction_column {
        config.dataset.prediction_column = column.clone();
    }
    if let Some(column) = &args.reference_column {
        config.dataset.reference_column = column.clone();
    }
}
