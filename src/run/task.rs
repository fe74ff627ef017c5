//! Task pipeline - one request in, exactly one result out
//!
//! Intake validation, construction, the timed agent run, extraction, and
//! unconditional cleanup. Every failure shape folds into a `TaskResult`;
//! nothing here propagates an error to the caller.

use std::time::Duration;

use crate::agent::{Agent, AgentHistory};
use crate::browser::BrowserSession;
use crate::core::{Config, ErrandError, Result, TaskRequest, TaskResult};
use crate::llm::{ChatClient, LlmProvider};
use crate::run::outcome::resolve_outcome;

/// Run one task with a client built from the configuration
pub async fn run_task(config: &Config, request: &TaskRequest) -> TaskResult {
    // Intake check comes before any client or session construction
    if request.is_empty() {
        return TaskResult::failed(&request.query, "query must not be empty");
    }

    let client = match ChatClient::from_config(config) {
        Ok(client) => client,
        Err(e) => return TaskResult::failed(&request.query, e.to_string()),
    };

    run_task_with(&client, config, request).await
}

/// Run one task against an injected provider
pub async fn run_task_with(
    llm: &dyn LlmProvider,
    config: &Config,
    request: &TaskRequest,
) -> TaskResult {
    if request.is_empty() {
        return TaskResult::failed(&request.query, "query must not be empty");
    }

    let mut session = BrowserSession::new(config.browser.clone());

    let outcome = execute(llm, config, request, &mut session).await;

    // Cleanup runs on every path and never overrides the outcome
    if let Err(e) = session.close().await {
        eprintln!("Warning: browser cleanup failed: {}", e);
    }

    match outcome {
        Ok(history) => resolve_outcome(&request.query, &history),
        Err(e) => TaskResult::failed(&request.query, e.to_string()),
    }
}

/// Start the session and run the agent under the wall-clock budget
async fn execute(
    llm: &dyn LlmProvider,
    config: &Config,
    request: &TaskRequest,
    session: &mut BrowserSession,
) -> Result<AgentHistory> {
    session.start().await?;

    let agent = Agent::new(&request.query, llm, &*session, &config.agent);
    let budget = Duration::from_secs(config.agent.run_timeout_secs);

    match tokio::time::timeout(budget, agent.run()).await {
        Ok(history) => history,
        // The run is abandoned, not cancelled cleanly; the session close
        // below tears the browser down regardless
        Err(_) => Err(ErrandError::Timeout(config.agent.run_timeout_secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_query_rejected_before_construction() {
        let mut config = Config::default();
        // Would fail loudly if construction were attempted
        config.browser.command = "definitely-not-an-installed-browser-cli".to_string();
        config.llm.base_url = "http://127.0.0.1:1/v1".to_string();

        let result = run_task(&config, &TaskRequest::new("   ")).await;
        assert!(!result.success);
        assert!(result.error.contains("empty"));
    }

    #[tokio::test]
    async fn test_missing_browser_cli_yields_failed_result() {
        let mut config = Config::default();
        config.browser.command = "definitely-not-an-installed-browser-cli".to_string();
        config.llm.base_url = "http://127.0.0.1:1/v1".to_string();
        config.llm.max_retries = 0;
        config.llm.timeout_secs = 2;

        let result = run_task(&config, &TaskRequest::new("summarize the page")).await;
        assert!(!result.success);
        assert_eq!(result.task, "summarize the page");
        assert!(result.error.contains("agent-browser not found"));
    }
}
