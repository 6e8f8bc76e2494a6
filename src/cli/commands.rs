use anyhow::Result;

use crate::client::set_verbose_logging;

use super::args::{Cli, Command};
use super::config_cmd;
use super::eval;
use super::extract;
use super::models;
use super::summary;

pub(crate) async fn run(cli: Cli) -> Result<()> {
    set_verbose_logging(cli.verbose);

    match cli.command {
        Command::Eval(args) => eval::handle_eval(args).await,
        Command::Extract(args) => extract::handle_extract(args),
        Command::Summary(args) => summary::handle_summary(args),
        Command::Models => models::handle_models().await,
        Command::Config(args) => config_cmd::handle_config(args),
    }
}
