//! Custom error types for errand
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for errand operations
#[derive(Error, Debug)]
pub enum ErrandError {
    /// Chat-completion endpoint errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Browser session errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Agent run errors
    #[error("Agent error: {0}")]
    Agent(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Task intake errors (empty query, malformed request)
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Wall-clock budget exceeded
    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    /// Worker process errors
    #[error("Worker error: {0}")]
    Worker(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Browser automation CLI not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for errand operations
pub type Result<T> = std::result::Result<T, ErrandError>;

impl ErrandError {
    /// Create an LLM error
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create an agent error
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a worker error
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }
}
