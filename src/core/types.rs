//! Shared types used across errand modules
//!
//! Contains the task request/result wire shapes and chat message structures.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single browsing task handed to the runner
///
/// Created by the caller, consumed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Free-text task instruction
    pub query: String,
    /// Opaque correlation token
    pub task_id: String,
}

impl TaskRequest {
    /// Create a request with a freshly generated task id
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            task_id: generate_task_id(),
        }
    }

    /// Create a request with an explicit task id
    pub fn with_id(query: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            task_id: task_id.into(),
        }
    }

    /// Whether the query carries any instruction at all
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// Generate a correlation token: millisecond timestamp plus a random suffix
fn generate_task_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let suffix: u32 = rand::rng().random_range(0..0xFFFF);
    format!("{}-{:04x}", millis, suffix)
}

/// Outcome of a task run, produced exactly once per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Whether the task produced a usable outcome
    pub success: bool,
    /// Echo of the original query
    pub task: String,
    /// Result text (empty on failure)
    pub result: String,
    /// Human-readable error (empty on success)
    pub error: String,
}

impl TaskResult {
    /// Create a successful result
    pub fn completed(task: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            success: true,
            task: task.into(),
            result: result.into(),
            error: String::new(),
        }
    }

    /// Create a failed result
    pub fn failed(task: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            task: task.into(),
            result: String::new(),
            error: error.into(),
        }
    }
}

/// Truncate to at most `max` characters, always on a char boundary
///
/// Task text is routinely non-ASCII, so byte slicing is never safe here.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// A message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}
