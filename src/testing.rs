use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::client::{
    ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageRole,
    LlmClient,
};

/// Replays canned completions in order and records every request.
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub(crate) requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|reply| reply.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));

        match reply {
            Ok(content) => Ok(ChatCompletionResponse {
                choices: vec![ChatChoice {
                    message: ChatMessage {
                        role: ChatMessageRole::Assistant,
                        content,
                    },
                    finish_reason: Some("stop".to_string()),
                }],
            }),
            Err(message) => Err(anyhow!(message)),
        }
    }
}

/// A complete grading object wrapped in chatter, ending with the default end key.
pub(crate) fn verdict_reply(score: f64) -> String {
    format!(
        concat!(
            "Sure, here is the evaluation.\n",
            "{{\"entity_name false_prediction\": 0, \"entity_name false_prediction_explanation\": \"\", ",
            "\"entity_name omission\": 1, \"entity_name omission_explanation\": \"Missed atelectasis.\", ",
            "\"location false_prediction\": 0, \"location false_prediction_explanation\": \"\", ",
            "\"location omission\": 0, \"location omission_explanation\": \"\", ",
            "\"severity false_prediction\": 0, \"severity false_prediction_explanation\": \"\", ",
            "\"severity omission\": 0, \"severity omission_explanation\": \"\", ",
            "\"uncertainty false_prediction\": 0, \"uncertainty false_prediction_explanation\": \"\", ",
            "\"uncertainty omission\": 0, \"uncertainty omission_explanation\": \"\", ",
            "\"completeness_score\": 0.8, \"completeness_reason\": \"One omission.\", ",
            "\"readability_score\": 1.0, \"readability_reason\": \"Clear.\", ",
            "\"clinical_utility_score\": 0.9, \"clinical_utility_reason\": \"Minor.\", ",
            "\"weighted_final_score\": {score}, \"true_positive_matches\": 2}}\n",
            "Done."
        ),
        score = score
    )
}
