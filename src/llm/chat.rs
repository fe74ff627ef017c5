//! OpenAI-compatible chat client
//!
//! Async HTTP client for a `/chat/completions` endpoint with a bounded
//! transport retry budget. Internal deployments point this at a
//! self-hosted model server; the credential is passed through but
//! typically never checked there.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{truncate_chars, Config, ErrandError, Message, Result};
use crate::llm::traits::{ChatResponse, LlmProvider};

/// Chat-completion API client
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    debug: bool,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
}

/// One completion choice
#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Message within a completion choice
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ChatClient {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .map_err(|e| ErrandError::llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.llm.base_url.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            max_retries: config.llm.max_retries,
            debug: config.agent.debug,
        })
    }

    /// Debug print if enabled, truncated for readability
    fn debug_print(&self, label: &str, content: &str) {
        if self.debug {
            let shown = truncate_chars(content, 500);
            if shown.len() < content.len() {
                eprintln!("DEBUG {}: {}...", label, shown);
            } else {
                eprintln!("DEBUG {}: {}", label, content);
            }
        }
    }

    /// Send one completion request without retries
    async fn send_once(&self, messages: &[Message]) -> Result<ChatResponse> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: Some(0.1),
            stream: false,
        };

        let request_json = serde_json::to_string(&request)?;
        self.debug_print("Request", &request_json);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ErrandError::llm(format!(
                "Model API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        self.debug_print("Response", &response_text);

        let completion: CompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| ErrandError::llm(format!("Failed to parse response: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ErrandError::llm("Model returned no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content,
            model: completion.model,
        })
    }
}

#[async_trait]
impl LlmProvider for ChatClient {
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                self.debug_print("Retry", &format!("attempt {}/{}", attempt, self.max_retries));
                tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
            }

            match self.send_once(messages).await {
                Ok(response) => return Ok(response),
                // API-level rejections (bad model name, malformed request)
                // won't improve with retries; transport errors get the
                // remaining budget
                Err(e @ ErrandError::Llm(_)) => return Err(e),
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(ErrandError::Http(e)) if e.is_connect() => Err(ErrandError::llm(format!(
                "Cannot connect to model endpoint at {}. Is it reachable?",
                self.base_url
            ))),
            Some(e) => Err(e),
            None => Err(ErrandError::llm("Chat request failed")),
        }
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
