use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::commands;

/// Entry point for the `gema` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "gema",
    about = "Grade generated radiology reports against references with an LLM",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging of LLM requests and responses
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grade every pending row of a CSV dataset, saving after each row.
    Eval(EvalArgs),
    /// Pull the grading JSON object out of raw model output.
    Extract(ExtractArgs),
    /// Aggregate the scores and error counts of a graded dataset.
    Summary(SummaryArgs),
    /// List grader checkpoints and the models served by the configured endpoint.
    Models,
    /// Show or update persisted settings.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct EvalArgs {
    /// CSV file with candidate and reference report columns.
    pub input: PathBuf,

    /// Write results here instead of updating the input in place.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Only consider the first N rows.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Re-grade rows that already have a score.
    #[arg(long)]
    pub force: bool,

    /// Override the grader model for this run.
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Override max_tokens for this run.
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Column holding the generated report.
    #[arg(long)]
    pub prediction_column: Option<String>,

    /// Column holding the reference report.
    #[arg(long)]
    pub reference_column: Option<String>,

    /// Hide the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// File with model output; reads piped stdin when omitted.
    pub file: Option<PathBuf>,

    /// Key that must appear inside the target object.
    #[arg(long)]
    pub start_key: Option<String>,

    /// Key that must appear after the start key.
    #[arg(long)]
    pub end_key: Option<String>,

    /// Print the typed verdict instead of the raw object.
    #[arg(long)]
    pub verdict: bool,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Graded CSV file.
    pub input: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Select the LLM provider (local, openrouter or cerebras)
    #[arg(long)]
    pub provider: Option<String>,

    /// Set the API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Set the OpenAI-compatible base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Set the grader model
    #[arg(long)]
    pub model: Option<String>,

    /// Set timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Set max tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Set the generated report column
    #[arg(long)]
    pub prediction_column: Option<String>,

    /// Set the reference report column
    #[arg(long)]
    pub reference_column: Option<String>,
}

impl ConfigArgs {
    pub fn has_updates(&self) -> bool {
        self.provider.is_some()
            || self.api_key.is_some()
            || self.base_url.is_some()
            || self.model.is_some()
            || self.timeout.is_some()
            || self.max_tokens.is_some()
            || self.prediction_column.is_some()
            || self.reference_column.is_some()
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        commands::run(self).await
    }
}
