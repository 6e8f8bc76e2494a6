mod args;
mod commands;
mod config_cmd;
mod eval;
mod extract;
mod models;
mod summary;
mod util;

pub use args::Cli;
