//! Agent action protocol
//!
//! The model answers each step with one JSON object describing the next
//! action. Models wrap JSON in prose or code fences often enough that
//! parsing scans for the object instead of trusting the whole reply.

use serde::{Deserialize, Serialize};

use crate::core::{truncate_chars, ErrandError, Result};

/// One action chosen by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentAction {
    /// Navigate to a URL
    Navigate {
        /// Target URL
        url: String,
    },
    /// Click an element by its snapshot ref
    Click {
        /// Element ref from the latest snapshot (e.g. "e12")
        #[serde(rename = "ref")]
        ref_id: String,
    },
    /// Type text into an input element
    Fill {
        /// Element ref from the latest snapshot
        #[serde(rename = "ref")]
        ref_id: String,
        /// Text to type
        text: String,
    },
    /// Record visible text from the page into the run history
    Extract {
        /// Element ref to read from; omit for the whole page
        #[serde(default, rename = "ref")]
        ref_id: Option<String>,
    },
    /// Finish the task
    Done {
        /// Final answer to report
        #[serde(default)]
        result: Option<String>,
    },
}

impl AgentAction {
    /// Parse an action from a model reply
    pub fn parse(reply: &str) -> Result<Self> {
        let json = extract_json_object(reply).ok_or_else(|| {
            ErrandError::agent(format!(
                "Model reply contains no action object: {}",
                truncate_chars(reply, 200)
            ))
        })?;

        serde_json::from_str(json)
            .map_err(|e| ErrandError::agent(format!("Malformed action: {} in {}", e, json)))
    }
}

/// Find the first balanced JSON object in a reply
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => in_string = false,
                _ => escaped = false,
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
