use anyhow::{Context, Result};
use dirs::home_dir;
use std::{fs, path::Path};

use super::builder::ConfigBuilder;
use super::environment::apply_env_overrides;
use super::types::{FileConfig, LlmProvider, PersistedConfig};
use super::validation::validate;
use super::Config;

impl Config {
    pub fn config_path() -> Result<std::path::PathBuf> {
        let mut path = home_dir().context("Could not determine home directory")?;
        path.push(".gema/config");
        Ok(path)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Defaults, then the config file, then environment overrides, then
    /// `adjust` (command-line flags), validated last.
    pub fn load(adjust: impl FnOnce(&mut Config)) -> Result<Self> {
        let mut config = Self::load_unvalidated()?;
        adjust(&mut config);
        validate(&config)?;
        Ok(config)
    }

    /// Same layering as [`Config::load`] without the final validation, so
    /// `gema config` can repair an incomplete setup.
    pub fn load_unvalidated() -> Result<Self> {
        let path = Self::config_path()?;
        let mut builder = Self::builder();

        if path.exists() {
            builder = Self::apply_file(builder, &path)?;
        }

        builder = apply_env_overrides(builder)?;
        builder.build()
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let payload = PersistedConfig::from(self);
        let json = serde_json::to_string_pretty(&payload)
            .context("Failed to serialize configuration to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate(self)
    }

    fn apply_file(builder: ConfigBuilder, path: &Path) -> Result<ConfigBuilder> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config at {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(builder);
        }

        let raw: FileConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing JSON config at {}", path.display()))?;

        raw.apply(builder)
            .with_context(|| format!("Invalid settings in config at {}", path.display()))
    }
}

impl FileConfig {
    pub fn apply(self, mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
        if let Some(llm) = self.llm {
            let provider = llm
                .provider
                .as_deref()
                .map(str::parse::<LlmProvider>)
                .transpose()?;

            builder = builder.with_llm(|settings| {
                if let Some(parsed) = provider {
                    if settings.provider != parsed {
                        settings.provider = parsed;
                        settings.base_url = parsed.default_base_url().to_string();
                    }
                }
                if let Some(api_key) = llm.api_key {
                    settings.api_key = api_key;
                }
                if let Some(timeout) = llm.timeout_secs {
                    settings.timeout_secs = timeout;
                }
                if let Some(base_url) = llm.base_url {
                    settings.base_url = base_url;
                }
                if let Some(user_agent) = llm.user_agent {
                    settings.user_agent = user_agent;
                }
            });
        }

        if let Some(generation) = self.generation {
            builder = builder.with_generation(|settings| {
                if let Some(model) = generation.model {
                    settings.model = model;
                }
                if let Some(max_tokens) = generation.max_tokens {
                    settings.max_tokens = max_tokens;
                }
                if let Some(temperature) = generation.temperature {
                    settings.temperature = temperature;
                }
                if let Some(penalty) = generation.repetition_penalty {
                    settings.repetition_penalty = penalty;
                }
            });
        }

        if let Some(dataset) = self.dataset {
            builder = builder.with_dataset(|settings| {
                if let Some(column) = dataset.prediction_column {
                    settings.prediction_column = column;
                }
                if let Some(column) = dataset.reference_column {
                    settings.reference_column = column;
                }
                if let Some(column) = dataset.result_column {
                    settings.result_column = column;
                }
                if let Some(column) = dataset.score_column {
                    settings.score_column = column;
                }
            });
        }

        if let Some(extraction) = self.extraction {
            builder = builder.with_extraction(|settings| {
                if let Some(start_key) = extraction.start_key {
                    settings.start_key = start_key;
                }
                if let Some(end_key) = extraction.end_key {
                    settings.end_key = end_key;
                }
            });
        }

        Ok(builder)
    }
}
