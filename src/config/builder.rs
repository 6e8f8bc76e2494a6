use anyhow::Result;
use super::types::{Config, DatasetSettings, ExtractionSettings, GenerationSettings, LlmSettings};

#[derive(Debug)]
pub struct ConfigBuilder {
    pub(super) llm: LlmSettings,
    pub(super) generation: GenerationSettings,
    pub(super) dataset: DatasetSettings,
    pub(super) extraction: ExtractionSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            llm: LlmSettings::default(),
            generation: GenerationSettings::default(),
            dataset: DatasetSettings::default(),
            extraction: ExtractionSettings::default(),
        }
    }

    pub fn with_llm<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut LlmSettings),
    {
        update(&mut self.llm);
        self
    }

    pub fn with_generation<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut GenerationSettings),
    {
        update(&mut self.generation);
        self
    }

    pub fn with_dataset<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut DatasetSettings),
    {
        update(&mut self.dataset);
        self
    }

    pub fn with_extraction<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ExtractionSettings),
    {
        update(&mut self.extraction);
        self
    }

    pub fn build(self) -> Result<Config> {
        Ok(Config {
            llm: self.llm,
            generation: self.generation,
            dataset: self.dataset,
            extraction: self.extraction,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
