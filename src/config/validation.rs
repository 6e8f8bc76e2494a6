use anyhow::{Result, anyhow, bail};

use super::types::Config;

pub fn validate(config: &Config) -> Result<()> {
    let provider = config.llm.provider;
    if provider.requires_api_key() && config.llm.api_key.trim().is_empty() {
        return Err(anyhow!(
            "{} API key not found. Set {} or add it to {}",
            provider.display_name(),
            provider.api_key_env_var(),
            Config::config_path()?.display()
        ));
    }

    if config.llm.base_url.trim().is_empty() {
        bail!("LLM base URL cannot be empty");
    }

    if config.generation.model.trim().is_empty() {
        bail!("Model name cannot be empty");
    }

    if config.generation.max_tokens == 0 {
        bail!("max_tokens must be greater than zero");
    }

    if config.extraction.start_key.is_empty() || config.extraction.end_key.is_empty() {
        bail!("Extraction start and end keys must be non-empty");
    }

    let dataset = &config.dataset;
    for (name, value) in [
        ("prediction", &dataset.prediction_column),
        ("reference", &dataset.reference_column),
        ("result", &dataset.result_column),
        ("score", &dataset.score_column),
    ] {
        if value.trim().is_empty() {
            bail!("The {name} column name cannot be empty");
        }
    }

    if dataset.result_column == dataset.score_column {
        bail!(
            "Result and score columns must differ (both are '{}')",
            dataset.result_column
        );
    }

    for input in [&dataset.prediction_column, &dataset.reference_column] {
        if input == &dataset.result_column || input == &dataset.score_column {
            bail!("Input column '{input}' would be overwritten by evaluation output");
        }
    }

    Ok(())
}
