//! LLM provider trait for abstracting chat backends
//!
//! The agent loop only needs one capability: send a conversation, get a
//! completion back. Keeping it behind a trait lets tests script the model.

use async_trait::async_trait;

use crate::core::{Message, Result};

/// Response from a chat completion
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Text content of the completion
    pub content: String,
    /// Model that generated the response
    pub model: String,
}

/// A chat-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a conversation and return the completion
    async fn chat(&self, messages: &[Message]) -> Result<ChatResponse>;

    /// Provider name for diagnostics
    fn name(&self) -> &str;
}
