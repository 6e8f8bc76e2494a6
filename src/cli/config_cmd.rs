use anyhow::Result;

use crate::config::{Config, LlmProvider};

use super::args::ConfigArgs;
use super::util::mask_api_key;

pub(crate) fn handle_config(args: ConfigArgs) -> Result<()> {
    let mut config = Config::load_unvalidated()?;

    if args.has_updates() {
        apply_updates(&args, &mut config)?;
        config.validate()?;
        config.save()?;
        println!(
            "✅ Configuration saved to {}",
            Config::config_path()?.display()
        );
    }

    print_config(&config);
    Ok(())
}

fn apply_updates(args: &ConfigArgs, config: &mut Config) -> Result<()> {
    if let Some(provider) = &args.provider {
        let provider = provider.parse::<LlmProvider>()?;
        if provider != config.llm.provider {
            config.llm.provider = provider;
            config.llm.base_url = provider.default_base_url().to_string();
        }
    }
    if let Some(api_key) = &args.api_key {
        config.llm.api_key = api_key.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.llm.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.llm.timeout_secs = timeout;
    }
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
    Ok(())
}

fn print_config(config: &Config) {
    println!("📋 Current configuration:");
    println!("   Provider: {}", config.llm.provider.display_name());
    println!("   Base URL: {}", config.llm.base_url);
    println!("   API Key: {}", mask_api_key(&config.llm.api_key));
    println!("   Timeout: {}s", config.llm.timeout_secs);
    println!("   Model: {}", config.generation.model);
    println!("   Max Tokens: {}", config.generation.max_tokens);
    println!(
        "   Sampling: temperature {} / repetition penalty {}",
        config.generation.temperature, config.generation.repetition_penalty
    );
    println!(
        "   Columns: {} vs {} -> {}, {}",
        config.dataset.prediction_column,
        config.dataset.reference_column,
        config.dataset.result_column,
        config.dataset.score_column
    );
    println!(
        "   Extraction keys: {} .. {}",
        config.extraction.start_key, config.extraction.end_key
    );
}
