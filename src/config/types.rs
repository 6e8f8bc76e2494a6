use anyhow::anyhow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::KeyBounds;

use super::constants::{
    DEFAULT_CEREBRAS_BASE_URL, DEFAULT_LOCAL_BASE_URL, DEFAULT_OPENROUTER_BASE_URL,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub generation: GenerationSettings,
    pub dataset: DatasetSettings,
    pub extraction: ExtractionSettings,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub api_key: String,
    pub timeout_secs: u64,
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LlmProvider {
    Local,
    OpenRouter,
    Cerebras,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Local => write!(f, "local"),
            LlmProvider::OpenRouter => write!(f, "openrouter"),
            LlmProvider::Cerebras => write!(f, "cerebras"),
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(LlmProvider::Local),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            "cerebras" => Ok(LlmProvider::Cerebras),
            other => Err(anyhow!("Unknown LLM provider '{other}'")),
        }
    }
}

impl LlmProvider {
    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::Local => DEFAULT_LOCAL_BASE_URL,
            LlmProvider::OpenRouter => DEFAULT_OPENROUTER_BASE_URL,
            LlmProvider::Cerebras => DEFAULT_CEREBRAS_BASE_URL,
        }
    }

    pub fn api_key_env_var(self) -> &'static str {
        match self {
            LlmProvider::Local => "GEMA_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::Cerebras => "CEREBRAS_API_KEY",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LlmProvider::Local => "Local server",
            LlmProvider::OpenRouter => "OpenRouter",
            LlmProvider::Cerebras => "Cerebras",
        }
    }

    /// Self-hosted servers usually run without authentication.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, LlmProvider::Local)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub repetition_penalty: f32,
}

#[derive(Debug, Clone)]
pub struct DatasetSettings {
    pub prediction_column: String,
    pub reference_column: String,
    pub result_column: String,
    pub score_column: String,
}

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub start_key: String,
    pub end_key: String,
}

impl ExtractionSettings {
    pub fn bounds(&self) -> KeyBounds {
        KeyBounds::new(self.start_key.clone(), self.end_key.clone())
    }
}

// File configuration types
#[derive(Debug, Default, Deserialize)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub llm: Option<FileLlmSettings>,
    #[serde(default)]
    pub generation: Option<FileGenerationSettings>,
    #[serde(default)]
    pub dataset: Option<FileDatasetSettings>,
    #[serde(default)]
    pub extraction: Option<FileExtractionSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileLlmSettings {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileGenerationSettings {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub repetition_penalty: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileDatasetSettings {
    pub prediction_column: Option<String>,
    pub reference_column: Option<String>,
    pub result_column: Option<String>,
    pub score_column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileExtractionSettings {
    pub start_key: Option<String>,
    pub end_key: Option<String>,
}

// Serialization helpers
#[derive(Serialize)]
pub(super) struct PersistedConfig<'a> {
    pub llm: PersistedLlm<'a>,
    pub generation: PersistedGeneration<'a>,
    pub dataset: PersistedDataset<'a>,
    pub extraction: PersistedExtraction<'a>,
}

#[derive(Serialize)]
pub(super) struct PersistedLlm<'a> {
    pub provider: LlmProvider,
    pub api_key: &'a str,
    pub timeout_secs: u64,
    pub base_url: &'a str,
    pub user_agent: &'a str,
}

#[derive(Serialize)]
pub(super) struct PersistedGeneration<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
    pub repetition_penalty: f32,
}

#[derive(Serialize)]
pub(super) struct PersistedDataset<'a> {
    pub prediction_column: &'a str,
    pub reference_column: &'a str,
    pub result_column: &'a str,
    pub score_column: &'a str,
}

#[derive(Serialize)]
pub(super) struct PersistedExtraction<'a> {
    pub start_key: &'a str,
    pub end_key: &'a str,
}

impl<'a> From<&'a Config> for PersistedConfig<'a> {
    fn from(config: &'a Config) -> Self {
        PersistedConfig {
            llm: PersistedLlm {
                provider: config.llm.provider,
                api_key: &config.llm.api_key,
                timeout_secs: config.llm.timeout_secs,
                base_url: &config.llm.base_url,
                user_agent: &config.llm.user_agent,
            },
            generation: PersistedGeneration {
                model: &config.generation.model,
                max_tokens: config.generation.max_tokens,
                temperature: config.generation.temperature,
                repetition_penalty: config.generation.repetition_penalty,
            },
            dataset: PersistedDataset {
                prediction_column: &config.dataset.prediction_column,
                reference_column: &config.dataset.reference_column,
                result_column: &config.dataset.result_column,
                score_column: &config.dataset.score_column,
            },
            extraction: PersistedExtraction {
                start_key: &config.extraction.start_key,
                end_key: &config.extraction.end_key,
            },
        }
    }
}
