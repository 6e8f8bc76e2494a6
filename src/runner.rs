use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::{DynLlmClient, log_verbose};
use crate::config::Config;
use crate::dataset::Dataset;
use crate::grader::evaluate_report;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Defaults to rewriting `input` in place.
    pub output: Option<PathBuf>,
    pub limit: Option<usize>,
    /// Re-grade rows that already carry a score.
    pub force: bool,
    pub show_progress: bool,
}

impl RunOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            limit: None,
            force: false,
            show_progress: true,
        }
    }

    pub fn output_path(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub skipped: usize,
    pub graded: usize,
    pub failed: usize,
}

/// Grades every pending row, saving after each one so an interrupted run
/// resumes where it stopped.
pub async fn run_evaluation(
    client: &DynLlmClient,
    config: &Config,
    options: &RunOptions,
) -> Result<RunSummary> {
    let output = options.output_path();
    // A separate output that already exists holds the progress of an earlier run.
    let source = if output != options.input && output.exists() {
        output
    } else {
        options.input.as_path()
    };

    let mut dataset = Dataset::load(source)?;
    let settings = &config.dataset;
    let prediction_col = dataset.column_index(&settings.prediction_column)?;
    let reference_col = dataset.column_index(&settings.reference_column)?;
    let result_col = dataset.ensure_column(&settings.result_column);
    let score_col = dataset.ensure_column(&settings.score_column);

    let total = options
        .limit
        .map_or(dataset.len(), |limit| limit.min(dataset.len()));
    let mut summary = RunSummary {
        total,
        ..RunSummary::default()
    };

    log_verbose(
        "dataset",
        format!(
            "{} rows from {} (processing {total}) -> {}",
            dataset.len(),
            source.display(),
            output.display()
        ),
    );

    log_verbose("dataset", format!("columns: {}", dataset.headers().join(", ")));

    let progress = create_progress(total as u64, options.show_progress)?;

    for row in 0..total {
        if !options.force && dataset.is_completed(row, score_col) {
            summary.skipped += 1;
            progress.inc(1);
            continue;
        }

        let candidate = dataset.get(row, prediction_col).to_string();
        let reference = dataset.get(row, reference_col).to_string();

        let outcome = evaluate_report(
            client,
            &config.generation,
            &config.extraction,
            &candidate,
            &reference,
        )
        .await;

        if outcome.is_failure() {
            summary.failed += 1;
            let reason = outcome.result["error"].as_str().unwrap_or_default();
            progress.println(format!("{} row {row}: {reason}", "warning:".yellow().bold()));
        } else {
            summary.graded += 1;
        }

        let result_json =
            serde_json::to_string(&outcome.result).context("Failed to encode evaluation result")?;
        dataset.set(row, result_col, result_json);
        dataset.set(
            row,
            score_col,
            outcome.score.map(|score| score.to_string()).unwrap_or_default(),
        );
        dataset
            .save(output)
            .with_context(|| format!("Failed to save progress after row {row}"))?;

        progress.inc(1);
        progress.set_message(format!("graded={} failed={}", summary.graded, summary.failed));
    }

    // Persist the new columns even when every row was skipped.
    if summary.graded + summary.failed == 0 {
        dataset.save(output)?;
    }

    progress.finish_with_message(format!(
        "graded={} failed={} skipped={}",
        summary.graded, summary.failed, summary.skipped
    ));

    Ok(summary)
}

fn create_progress(total: u64, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} (eta {eta}) {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}
