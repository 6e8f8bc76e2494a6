mod cli;
mod client;
mod config;
mod dataset;
mod extract;
mod grader;
mod prompt;
mod runner;
mod schema;
mod summary;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.run().await
}
