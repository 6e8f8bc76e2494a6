use anyhow::{Context, Result, bail};

use crate::config::{Config, ExtractionSettings};
use crate::extract::KeyBounds;
use crate::schema::Verdict;

use super::args::ExtractArgs;
use super::util::read_text_input;

pub(crate) fn handle_extract(args: ExtractArgs) -> Result<()> {
    let text = read_text_input(args.file.as_deref())?;
    let defaults = Config::load_unvalidated()?.extraction;
    let bounds = resolve_bounds(args.start_key, args.end_key, defaults)?;

    let object = bounds
        .extract(&text)
        .context("Could not extract a JSON object from the input")?;

    let rendered = if args.verdict {
        let verdict = Verdict::from_map(&object)?;
        serde_json::to_string_pretty(&verdict)?
    } else {
        serde_json::to_string_pretty(&object)?
    };
    println!("{rendered}");

    Ok(())
}

/// Flag values win over the configured keys; neither may be empty.
fn resolve_bounds(
    start_key: Option<String>,
    end_key: Option<String>,
    defaults: ExtractionSettings,
) -> Result<KeyBounds> {
    let start_key = start_key.unwrap_or(defaults.start_key);
    let end_key = end_key.unwrap_or(defaults.end_key);
    if start_key.is_empty() || end_key.is_empty() {
        bail!("Extraction start and end keys must be non-empty");
    }
    Ok(KeyBounds::new(start_key, end_key))
}
