//! Configuration management for the gema evaluator.
//!
//! Settings are layered:
//! - Built-in defaults matching the distilled GEMA-Score grader
//! - JSON file at `~/.gema/config`
//! - Environment variable overrides
//!
//! and validated before any dataset is touched.

mod builder;
mod constants;
mod defaults;
mod environment;
mod loader;
mod types;
mod validation;

pub use types::{
    Config, DatasetSettings, ExtractionSettings, GenerationSettings, LlmProvider, LlmSettings,
};

pub use constants::{CHECKPOINT_REPO, KNOWN_CHECKPOINTS};
