use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use reqwest::Client;
use serde::Deserialize;

use crate::config::{CHECKPOINT_REPO, Config, KNOWN_CHECKPOINTS, LlmSettings};

#[derive(Debug, Deserialize)]
pub struct ServedModel {
    pub id: String,
    #[serde(default)]
    pub max_model_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Vec<ServedModel>,
}

/// Lists the models behind an OpenAI-compatible `/models` endpoint.
pub(crate) async fn fetch_served_models(settings: &LlmSettings) -> Result<Vec<ServedModel>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs.min(30)))
        .build()
        .context("Failed to build HTTP client")?;

    let url = format!("{}/models", settings.base_url.trim_end_matches('/'));
    let mut request = client.get(&url).header("User-Agent", &settings.user_agent);
    if !settings.api_key.trim().is_empty() {
        request = request.bearer_auth(&settings.api_key);
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to fetch models from {url}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("Model listing failed: {}", response.status()));
    }

    let models: ModelsResponse = response
        .json()
        .await
        .context("Failed to parse models response")?;

    Ok(models.data)
}

pub(crate) async fn handle_models() -> Result<()> {
    let config = Config::load_unvalidated()?;

    println!("{}", format!("Distilled grader checkpoints ({CHECKPOINT_REPO}):").bold());
    for (name, description) in KNOWN_CHECKPOINTS {
        let marker = if *name == config.generation.model { "*" } else { " " };
        println!(" {marker} {name:<34} {description}");
    }

    println!();
    println!(
        "{}",
        format!(
            "Served by {} ({}):",
            config.llm.provider.display_name(),
            config.llm.base_url
        )
        .bold()
    );
    match fetch_served_models(&config.llm).await {
        Ok(models) if models.is_empty() => println!("   (none)"),
        Ok(models) => {
            for model in models {
                match model.max_model_len {
                    Some(len) => println!("   {} (context {len})", model.id),
                    None => println!("   {}", model.id),
                }
            }
        }
        Err(err) => println!("   {} {err:#}", "unavailable:".yellow()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProvider;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn fetch_served_models_reads_openai_listing() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/models");
                then.status(200).json_body(json!({
                    "object": "list",
                    "data": [
                        {"id": "GEMA-Score-distilled-CT-llama", "object": "model", "max_model_len": 8192},
                        {"id": "other", "object": "model"}
                    ]
                }));
            })
            .await;

        let settings = LlmSettings {
            provider: LlmProvider::Local,
            base_url: server.url("/v1"),
            ..LlmSettings::default()
        };

        let models = fetch_served_models(&settings).await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].id, "GEMA-Score-distilled-CT-llama");
        assert_eq!(models[0].max_model_len, Some(8192));
        assert_eq!(models[1].max_model_len, None);
        mock.assert_async().await;
    }
}
