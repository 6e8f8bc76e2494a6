use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use colored::Colorize;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{LlmProvider, LlmSettings};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose_logging(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn verbose_logging_enabled() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Prints a labelled block to stderr when verbose logging is on.
pub fn log_verbose(label: &str, body: impl AsRef<str>) {
    if verbose_logging_enabled() {
        eprintln!("{} {}", format!("[{label}]").dimmed(), body.as_ref());
    }
}

/// Anything that can answer an OpenAI-style chat completion request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(&self, request: ChatCompletionRequest)
    -> Result<ChatCompletionResponse>;
}

pub type DynLlmClient = dyn LlmClient;

pub trait LlmClientFactory: Send + Sync {
    fn build(&self, settings: &LlmSettings) -> Result<Arc<DynLlmClient>>;
}

/// Builds real HTTP clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpClientFactory;

impl LlmClientFactory for HttpClientFactory {
    fn build(&self, settings: &LlmSettings) -> Result<Arc<DynLlmClient>> {
        Ok(Arc::new(AIClient::new(settings)?))
    }
}

#[derive(Debug, Clone)]
pub struct AIClient {
    http: Client,
    base_url: String,
    api_key: String,
    user_agent: String,
    provider: LlmProvider,
}

impl AIClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            user_agent: settings.user_agent.clone(),
            provider: settings.provider,
        })
    }
}

#[async_trait]
impl LlmClient for AIClient {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        log_verbose(
            "request",
            format!(
                "POST {url} model={} messages={} max_tokens={:?}",
                request.model,
                request.messages.len(),
                request.max_tokens
            ),
        );

        let mut req_builder = self
            .http
            .post(&url)
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .json(&request);

        if !self.api_key.trim().is_empty() {
            req_builder = req_builder.bearer_auth(&self.api_key);
        }

        if matches!(self.provider, LlmProvider::OpenRouter) {
            req_builder = req_builder.header("X-Title", "gema");
        }

        let response = req_builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = response.status();
        log_verbose("response", format!("status {status}"));

        match status {
            reqwest::StatusCode::OK => {
                let parsed = response
                    .json::<ChatCompletionResponse>()
                    .await
                    .context("Failed to parse chat completion response JSON")?;
                if let Some(choice) = parsed.choices.first() {
                    log_verbose("completion", &choice.message.content);
                }
                Ok(parsed)
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let error_text = response.text().await.unwrap_or_default();
                Err(anyhow!(
                    "Rate limit exceeded. Please wait before trying again. (API response: {})",
                    error_text
                ))
            }
            reqwest::StatusCode::UNAUTHORIZED => Err(anyhow!(
                "Invalid API key. Please check your {} API key configuration.",
                self.provider.display_name()
            )),
            reqwest::StatusCode::BAD_REQUEST => {
                let error_text = response.text().await.unwrap_or_default();
                Err(anyhow!("Invalid request: {}", error_text))
            }
            reqwest::StatusCode::INTERNAL_SERVER_ERROR
            | reqwest::StatusCode::SERVICE_UNAVAILABLE => Err(anyhow!(
                "Service is temporarily unavailable. Please try again later."
            )),
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(anyhow!("API error (status {}): {}", status, error_text))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}
