use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value, json};

use crate::client::{
    ChatCompletionRequest, ChatMessage, ChatMessageRole, DynLlmClient, log_verbose,
};
use crate::config::{ExtractionSettings, GenerationSettings};
use crate::prompt::build_grading_prompt;
use crate::schema::weighted_final_score;

/// Asks the grader model to compare one candidate report with its
/// reference and returns the raw completion text.
pub async fn grade_report(
    client: &DynLlmClient,
    generation: &GenerationSettings,
    candidate: &str,
    reference: &str,
) -> Result<String> {
    let request = ChatCompletionRequest {
        model: generation.model.clone(),
        messages: vec![ChatMessage {
            role: ChatMessageRole::User,
            content: build_grading_prompt(candidate, reference),
        }],
        max_tokens: Some(generation.max_tokens),
        temperature: Some(generation.temperature),
        repetition_penalty: Some(generation.repetition_penalty),
    };

    let response = client
        .chat_completion(request)
        .await
        .context("Grader call failed")?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Grader returned no choices"))?;

    if choice.finish_reason.as_deref() == Some("length") {
        log_verbose("grader", "completion hit max_tokens; the verdict may be cut off");
    }

    let content = choice.message.content.trim();
    if content.is_empty() {
        return Err(anyhow!("Grader response was empty"));
    }

    Ok(content.to_string())
}

/// What gets stored for one dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub result: Value,
    pub score: Option<f64>,
}

impl GradeOutcome {
    pub fn success(verdict: Map<String, Value>) -> Self {
        let score = weighted_final_score(&verdict);
        Self {
            result: Value::Object(verdict),
            score,
        }
    }

    pub fn failure(error: impl Into<String>, raw_output: Option<&str>) -> Self {
        Self {
            result: json!({
                "error": error.into(),
                "raw_output": raw_output.unwrap_or("N/A"),
            }),
            score: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        is_error_record(&self.result)
    }
}

/// True for the `{"error": ..., "raw_output": ...}` placeholder.
pub fn is_error_record(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("error") && map.contains_key("raw_output"))
}

/// Grades one report pair. Generation and extraction failures become an
/// error record instead of an `Err`, so a bad row never stops a batch.
pub async fn evaluate_report(
    client: &DynLlmClient,
    generation: &GenerationSettings,
    extraction: &ExtractionSettings,
    candidate: &str,
    reference: &str,
) -> GradeOutcome {
    let raw = match grade_report(client, generation, candidate, reference).await {
        Ok(raw) => raw,
        Err(err) => return GradeOutcome::failure(format!("{err:#}"), None),
    };

    match extraction.bounds().extract(&raw) {
        Ok(verdict) => GradeOutcome::success(verdict),
        Err(err) => GradeOutcome::failure(err.to_string(), Some(&raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedClient, verdict_reply};

    fn settings() -> (GenerationSettings, ExtractionSettings) {
        (GenerationSettings::default(), ExtractionSettings::default())
    }

    #[tokio::test]
    async fn grade_report_sends_single_user_prompt() {
        let client = ScriptedClient::new(vec![Ok("  reply  ")]);
        let (generation, _) = settings();

        let raw = grade_report(&client, &generation, "cand", "ref").await.unwrap();

        assert_eq!(raw, "reply");
        let requests = client.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.model, generation.model);
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, ChatMessageRole::User);
        assert_eq!(request.messages[0].content, build_grading_prompt("cand", "ref"));
        assert_eq!(request.max_tokens, Some(2048));
        assert_eq!(request.repetition_penalty, Some(generation.repetition_penalty));
    }

    #[tokio::test]
    async fn grade_report_rejects_blank_completion() {
        let client = ScriptedClient::new(vec![Ok("   \n")]);
        let (generation, _) = settings();

        let err = grade_report(&client, &generation, "c", "r").await.unwrap_err();

        assert!(err.to_string().contains("empty"));
    }

    #[tokio::test]
    async fn evaluate_report_extracts_verdict_and_score() {
        let reply = verdict_reply(0.85);
        let client = ScriptedClient::new(vec![Ok(reply.as_str())]);
        let (generation, extraction) = settings();

        let outcome = evaluate_report(&client, &generation, &extraction, "c", "r").await;

        assert!(!outcome.is_failure());
        assert_eq!(outcome.score, Some(0.85));
        assert_eq!(outcome.result["entity_name omission"], json!(1));
        assert_eq!(outcome.result["true_positive_matches"], json!(2));
    }

    #[tokio::test]
    async fn evaluate_report_records_extraction_failure_with_raw_output() {
        let client = ScriptedClient::new(vec![Ok(r#"{"weighted_final_score": 0.4}"#)]);
        let (generation, extraction) = settings();

        let outcome = evaluate_report(&client, &generation, &extraction, "c", "r").await;

        assert!(outcome.is_failure());
        assert_eq!(outcome.score, None);
        assert_eq!(
            outcome.result["error"],
            json!("Start key '\"entity_name false_prediction\"' not found")
        );
        assert_eq!(outcome.result["raw_output"], json!(r#"{"weighted_final_score": 0.4}"#));
    }

    #[tokio::test]
    async fn evaluate_report_records_generation_failure_without_raw_output() {
        let client = ScriptedClient::new(vec![Err("connection refused")]);
        let (generation, extraction) = settings();

        let outcome = evaluate_report(&client, &generation, &extraction, "c", "r").await;

        assert!(outcome.is_failure());
        assert_eq!(outcome.result["raw_output"], json!("N/A"));
        let error = outcome.result["error"].as_str().unwrap();
        assert!(error.contains("Grader call failed"));
        assert!(error.contains("connection refused"));
    }

    #[tokio::test]
    async fn verdict_without_score_keeps_result_but_no_score() {
        let reply = r#"{"entity_name false_prediction": 0, "true_positive_matches": 1}"#;
        let client = ScriptedClient::new(vec![Ok(reply)]);
        let (generation, extraction) = settings();

        let outcome = evaluate_report(&client, &generation, &extraction, "c", "r").await;

        assert!(!outcome.is_failure());
        assert_eq!(outcome.score, None);
    }
}
