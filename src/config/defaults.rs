use super::constants::*;
use super::types::{
    DatasetSettings, ExtractionSettings, GenerationSettings, LlmProvider, LlmSettings,
};
use crate::extract::{DEFAULT_END_KEY, DEFAULT_START_KEY};

pub fn default_user_agent() -> String {
    format!("gema/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for LlmSettings {
    fn default() -> Self {
        let provider = LlmProvider::Local;
        Self {
            provider,
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: provider.default_base_url().to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            repetition_penalty: DEFAULT_REPETITION_PENALTY,
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            prediction_column: DEFAULT_PREDICTION_COLUMN.to_string(),
            reference_column: DEFAULT_REFERENCE_COLUMN.to_string(),
            result_column: DEFAULT_RESULT_COLUMN.to_string(),
            score_column: DEFAULT_SCORE_COLUMN.to_string(),
        }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            start_key: DEFAULT_START_KEY.to_string(),
            end_key: DEFAULT_END_KEY.to_string(),
        }
    }
}
