//! LLM module - chat-completion client and provider abstraction

pub mod chat;
pub mod traits;

pub use chat::ChatClient;
pub use traits::{ChatResponse, LlmProvider};
