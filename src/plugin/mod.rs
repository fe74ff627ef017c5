//! Plugin surface - invocation from an embedding host
//!
//! Hosts hand over a parameter map and receive a stream of messages back,
//! the last of which carries the task result as JSON. The host usually owns
//! an async runtime already, so invocation always goes through the
//! loop-fallback dispatch.

use serde_json::Value;

use crate::core::{Config, TaskRequest, TaskResult};
use crate::run::dispatch::run_with_fallback;

/// A message yielded to the embedding host
#[derive(Debug, Clone)]
pub enum PluginMessage {
    /// Structured result payload
    Json(Value),
    /// Human-readable progress line
    Text(String),
}

impl PluginMessage {
    /// Wrap a task result as a JSON message
    pub fn result(result: &TaskResult) -> Self {
        Self::Json(serde_json::to_value(result).unwrap_or(Value::Null))
    }
}

/// Browsing tool exposed to plugin hosts
pub struct BrowseTool {
    config: Config,
}

impl BrowseTool {
    /// Create the tool with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run one invocation from a host parameter map
    ///
    /// Expects a `query` key; everything else is ignored. Always yields
    /// exactly one JSON message carrying the task result.
    pub fn invoke(&self, parameters: &Value) -> Vec<PluginMessage> {
        let query = parameters
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();

        if query.is_empty() {
            let result = TaskResult::failed("", "query must not be empty");
            return vec![PluginMessage::result(&result)];
        }

        let request = TaskRequest::new(&query);
        let mut messages = vec![PluginMessage::Text(format!(
            "Running browsing task {}",
            request.task_id
        ))];

        let result = run_with_fallback(&self.config, &request);
        messages.push(PluginMessage::result(&result));
        messages
    }
}
