//! Agent engine - the bounded action loop driving one browser session
//!
//! Each step asks the model for one action, executes it on the session, and
//! feeds the observation back. The loop stops on a `done` action or when the
//! step budget runs out; whatever was gathered by then lands in the history.

use crate::agent::action::AgentAction;
use crate::agent::history::AgentHistory;
use crate::agent::prompts::build_system_message;
use crate::browser::BrowserSession;
use crate::core::config::AgentConfig;
use crate::core::{truncate_chars, Message, Result};
use crate::llm::LlmProvider;

/// Cap on observation text fed back to the model
const MAX_OBSERVATION_CHARS: usize = 6000;

/// Drives one task to completion against one browser session
pub struct Agent<'a> {
    task: String,
    llm: &'a dyn LlmProvider,
    session: &'a BrowserSession,
    use_vision: bool,
    max_steps: usize,
    debug: bool,
    system_message: String,
}

impl<'a> Agent<'a> {
    /// Create an agent for one task
    pub fn new(
        task: impl Into<String>,
        llm: &'a dyn LlmProvider,
        session: &'a BrowserSession,
        config: &AgentConfig,
    ) -> Self {
        Self {
            task: task.into(),
            llm,
            session,
            use_vision: config.use_vision,
            max_steps: config.max_steps,
            debug: config.debug,
            system_message: build_system_message(
                config.extend_system_message.as_deref(),
                config.extend_planner_system_message.as_deref(),
            ),
        }
    }

    /// Run the action loop to completion
    pub async fn run(self) -> Result<AgentHistory> {
        let mut history = AgentHistory::new();
        let mut messages = vec![
            Message::system(&self.system_message),
            Message::user(format!("Task: {}", self.task)),
        ];

        for step in 1..=self.max_steps {
            let response = self.llm.chat(&messages).await?;
            messages.push(Message::assistant(&response.content));
            history.record_step();

            let action = match AgentAction::parse(&response.content) {
                Ok(action) => action,
                Err(e) => {
                    if self.debug {
                        eprintln!("DEBUG step {}: {}", step, e);
                    }
                    messages.push(Message::user(format!(
                        "Observation: {}. Reply with exactly one JSON action object.",
                        e
                    )));
                    continue;
                }
            };

            if self.debug {
                eprintln!("DEBUG step {}/{}: {:?}", step, self.max_steps, action);
            }

            if let AgentAction::Done { result } = &action {
                history.finish(result.clone());
                break;
            }

            let observation = self.execute(&action, &mut history).await;
            messages.push(Message::user(format!(
                "Observation: {}",
                truncate_chars(&observation, MAX_OBSERVATION_CHARS)
            )));
        }

        Ok(history)
    }

    /// Execute one action on the session. Browser failures become
    /// observations so the model can route around them.
    async fn execute(&self, action: &AgentAction, history: &mut AgentHistory) -> String {
        match action {
            AgentAction::Navigate { url } => match self.session.open(url).await {
                Ok(message) => self.with_snapshot(message).await,
                Err(e) => format!("Failed to navigate to {}: {}", url, e),
            },

            AgentAction::Click { ref_id } => match self.session.click(ref_id).await {
                Ok(message) => self.with_snapshot(message).await,
                Err(e) => format!("Failed to click {}: {}", ref_id, e),
            },

            AgentAction::Fill { ref_id, text } => {
                match self.session.fill(ref_id, text).await {
                    Ok(message) => message,
                    Err(e) => format!("Failed to fill {}: {}", ref_id, e),
                }
            }

            AgentAction::Extract { ref_id } => {
                match self.session.get_text(ref_id.as_deref()).await {
                    Ok(text) => {
                        history.record_extracted(text.clone());
                        format!(
                            "Extracted {} characters:\n{}",
                            text.len(),
                            truncate_chars(&text, MAX_OBSERVATION_CHARS)
                        )
                    }
                    Err(e) => format!("Failed to extract text: {}", e),
                }
            }

            // Handled in the loop before execute
            AgentAction::Done { .. } => String::new(),
        }
    }

    /// Append a page snapshot to an action confirmation
    async fn with_snapshot(&self, message: String) -> String {
        // Interactive-only snapshots keep the context small; full snapshots
        // only when the deployment asked for maximum page detail
        match self.session.snapshot(!self.use_vision).await {
            Ok(snapshot) => format!("{}. Page:\n{}", message, snapshot),
            Err(e) => format!("{}. (snapshot unavailable: {})", message, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrandError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that replays a scripted list of replies
    struct ScriptedProvider {
        replies: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            let mut list: Vec<String> = replies.iter().map(|s| s.to_string()).collect();
            list.reverse();
            Self {
                replies: Mutex::new(list),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn chat(&self, _messages: &[Message]) -> Result<crate::llm::ChatResponse> {
            let mut replies = self.replies.lock().unwrap();
            match replies.pop() {
                Some(content) => Ok(crate::llm::ChatResponse {
                    content,
                    model: "scripted".to_string(),
                }),
                None => Err(ErrandError::llm("script exhausted")),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn idle_session() -> BrowserSession {
        // Never started; the scripted runs below only use the done action
        BrowserSession::new(crate::core::config::BrowserConfig::default())
    }

    #[tokio::test]
    async fn test_immediate_done() {
        let provider = ScriptedProvider::new(&[r#"{"action": "done", "result": "all good"}"#]);
        let session = idle_session();
        let config = AgentConfig::default();
        let agent = Agent::new("do nothing", &provider, &session, &config);

        let history = agent.run().await.unwrap();
        use crate::agent::history::RunHistory;
        assert!(history.is_done());
        assert_eq!(history.final_result(), Some("all good"));
        assert_eq!(history.steps(), 1);
    }

    #[tokio::test]
    async fn test_invalid_reply_then_done() {
        let provider = ScriptedProvider::new(&[
            "Let me think about this first.",
            r#"{"action": "done", "result": "eventually"}"#,
        ]);
        let session = idle_session();
        let config = AgentConfig::default();
        let agent = Agent::new("task", &provider, &session, &config);

        let history = agent.run().await.unwrap();
        use crate::agent::history::RunHistory;
        assert!(history.is_done());
        assert_eq!(history.final_result(), Some("eventually"));
        assert_eq!(history.steps(), 2);
    }

    #[tokio::test]
    async fn test_step_budget_exhaustion() {
        let provider = ScriptedProvider::new(&["nonsense"; 3]);
        let session = idle_session();
        let mut config = AgentConfig::default();
        config.max_steps = 3;
        let agent = Agent::new("task", &provider, &session, &config);

        let history = agent.run().await.unwrap();
        use crate::agent::history::RunHistory;
        assert!(!history.is_done());
        assert!(history.final_result().is_none());
        assert_eq!(history.steps(), 3);
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let provider = ScriptedProvider::new(&[]);
        let session = idle_session();
        let config = AgentConfig::default();
        let agent = Agent::new("task", &provider, &session, &config);

        let err = agent.run().await.unwrap_err();
        assert!(err.to_string().contains("script exhausted"));
    }
}
