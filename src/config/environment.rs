use anyhow::{anyhow, Result, Context};
use std::env;

use super::builder::ConfigBuilder;
use super::types::LlmProvider;

pub fn apply_env_overrides(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(provider_raw) = env_string("GEMA_PROVIDER")? {
        let provider = provider_raw
            .parse::<LlmProvider>()
            .with_context(|| format!("Failed to parse GEMA_PROVIDER value '{provider_raw}'"))?;
        builder = builder.with_llm(|llm| {
            if llm.provider != provider {
                llm.provider = provider;
                llm.base_url = provider.default_base_url().to_string();
            }
        });
    }

    if let Some(base_url) = env_string("GEMA_BASE_URL")? {
        builder = builder.with_llm(|llm| llm.base_url = base_url);
    }

    if let Some(api_key) = env_string("GEMA_API_KEY")? {
        builder = builder.with_llm(|llm| llm.api_key = api_key);
    }

    if let Some(api_key) = env_string("OPENROUTER_API_KEY")? {
        builder = builder.with_llm(|llm| {
            if llm.provider == LlmProvider::OpenRouter {
                llm.api_key = api_key;
            }
        });
    }

    if let Some(api_key) = env_string("CEREBRAS_API_KEY")? {
        builder = builder.with_llm(|llm| {
            if llm.provider == LlmProvider::Cerebras {
                llm.api_key = api_key;
            }
        });
    }

    if let Some(timeout) = env_u64("GEMA_TIMEOUT_SECS")? {
        builder = builder.with_llm(|llm| llm.timeout_secs = timeout);
    }

    if let Some(model) = env_string("GEMA_MODEL")? {
        builder = builder.with_generation(|generation| generation.model = model);
    }

    if let Some(max_tokens) = env_u32("GEMA_MAX_TOKENS")? {
        builder = builder.with_generation(|generation| generation.max_tokens = max_tokens);
    }

    if let Some(column) = env_string("GEMA_PREDICTION_COLUMN")? {
        builder = builder.with_dataset(|dataset| dataset.prediction_column = column);
    }

    if let Some(column) = env_string("GEMA_REFERENCE_COLUMN")? {
        builder = builder.with_dataset(|dataset| dataset.reference_column = column);
    }

    Ok(builder)
}

pub fn env_string(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(anyhow!("{key} contains invalid UTF-8")),
    }
}

pub fn env_u64(key: &str) -> Result<Option<u64>> {
    if let Some(value) = env_string(key)? {
        let parsed = value
            .parse::<u64>()
            .with_context(|| format!("Failed to parse {key} as u64"))?;
        Ok(Some(parsed))
    } else {
        Ok(None)
    }
}

pub fn env_u32(key: &str) -> Result<Option<u32>> {
    if let Some(value) = env_string(key)? {
        let parsed = value
            .parse::<u32>()
            .with_context(|| format!("Failed to parse {key} as u32"))?;
        Ok(Some(parsed))
    } else {
        Ok(None)
    }
}
