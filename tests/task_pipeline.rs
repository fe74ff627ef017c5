//! Task pipeline integration tests
//!
//! Runs the full intake -> session -> agent -> extraction -> cleanup path
//! with a scripted model and `true` standing in for the browser CLI, so the
//! pipeline is exercised without a live endpoint or browser.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use errand::core::{Config, ErrandError, Message, Result, TaskRequest};
use errand::llm::{ChatResponse, LlmProvider};
use errand::run::run_task_with;

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
    async fn chat(&self, _messages: &[Message]) -> Result<ChatResponse> {
        let mut replies = self.replies.lock().unwrap();
        match replies.pop() {
            Some(content) => Ok(ChatResponse {
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

/// Provider that always fails
struct FailingProvider;

#[async_trait]
impl LlmProvider for FailingProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<ChatResponse> {
        Err(ErrandError::Other("boom".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Provider that never answers within any reasonable budget
struct StallingProvider;

#[async_trait]
impl LlmProvider for StallingProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<ChatResponse> {
        tokio::time::sleep(Duration::from_secs(600)).await;
        Err(ErrandError::llm("unreachable"))
    }

    fn name(&self) -> &str {
        "stalling"
    }
}

/// Config with a no-op browser CLI so session commands always succeed
fn stub_config() -> Config {
    let mut config = Config::default();
    config.browser.command = "true".to_string();
    config
}

/// Config whose browser CLI is a shell stub appending each subcommand it
/// receives to a log file, so tests can observe the session lifecycle
fn recording_config(tag: &str) -> (Config, PathBuf) {
    let dir = std::env::temp_dir();
    let log = dir.join(format!("errand_browser_log_{}.txt", tag));
    let script = dir.join(format!("errand_browser_stub_{}.sh", tag));
    let _ = fs::remove_file(&log);

    // Invoked as: <stub> --session <name> <subcommand> ...
    fs::write(
        &script,
        format!("#!/bin/sh\necho \"$3\" >> \"{}\"\n", log.display()),
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    }

    let mut config = Config::default();
    config.browser.command = script.to_string_lossy().into_owned();
    (config, log)
}

fn close_count(log: &Path) -> usize {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .filter(|line| *line == "close")
        .count()
}

#[tokio::test]
async fn test_pipeline_success_with_final_result() {
    let provider = ScriptedProvider::new(&[
        r#"{"action": "navigate", "url": "https://example.com"}"#,
        r#"{"action": "done", "result": "Example Domain is a placeholder site"}"#,
    ]);

    let request = TaskRequest::new("summarize https://example.com");
    let result = run_task_with(&provider, &stub_config(), &request).await;

    assert!(result.success, "unexpected failure: {}", result.error);
    assert_eq!(result.task, "summarize https://example.com");
    assert_eq!(result.result, "Example Domain is a placeholder site");
    assert!(result.error.is_empty());
}

#[tokio::test]
async fn test_pipeline_run_error_reported() {
    let request = TaskRequest::new("summarize the page");
    let result = run_task_with(&FailingProvider, &stub_config(), &request).await;

    assert!(!result.success);
    assert!(result.error.contains("boom"));
    assert!(result.result.is_empty());
}

#[tokio::test]
async fn test_pipeline_closes_session_once_on_success() {
    let (config, log) = recording_config("success");
    let provider = ScriptedProvider::new(&[r#"{"action": "done", "result": "fine"}"#]);

    let result = run_task_with(&provider, &config, &TaskRequest::new("task")).await;

    assert!(result.success, "unexpected failure: {}", result.error);
    assert_eq!(close_count(&log), 1);
    let _ = fs::remove_file(&log);
}

#[tokio::test]
async fn test_pipeline_closes_session_once_on_run_error() {
    // Cleanup must still happen exactly once when the run itself fails
    let (config, log) = recording_config("run_error");

    let result = run_task_with(&FailingProvider, &config, &TaskRequest::new("task")).await;

    assert!(!result.success);
    assert!(result.error.contains("boom"));
    assert_eq!(close_count(&log), 1);
    let _ = fs::remove_file(&log);
}

#[tokio::test]
async fn test_pipeline_empty_query_rejected() {
    let request = TaskRequest::new("");
    let result = run_task_with(&FailingProvider, &stub_config(), &request).await;

    assert!(!result.success);
    assert!(result.error.contains("empty"));
}

#[tokio::test]
async fn test_pipeline_not_completed_when_steps_exhausted() {
    // The model never issues a done action
    let mut config = stub_config();
    config.agent.max_steps = 2;

    let provider = ScriptedProvider::new(&[
        r#"{"action": "navigate", "url": "https://example.com"}"#,
        r#"{"action": "navigate", "url": "https://example.com/about"}"#,
    ]);

    let request = TaskRequest::new("task with no end");
    let result = run_task_with(&provider, &config, &request).await;

    assert!(!result.success);
    assert_eq!(result.error, "task not completed");
}

#[tokio::test]
async fn test_pipeline_run_timeout_abandons_run() {
    let mut config = stub_config();
    config.agent.run_timeout_secs = 1;

    let request = TaskRequest::new("task that stalls");
    let result = run_task_with(&StallingProvider, &config, &request).await;

    assert!(!result.success);
    assert!(result.error.contains("Timed out after 1 seconds"));
}

/// Live end-to-end run. Requires agent-browser on PATH and a reachable
/// chat endpoint in the environment config.
#[tokio::test]
#[ignore]
async fn test_live_browse_and_summarize() {
    let config = Config::load();
    let request = TaskRequest::new("Navigate to https://example.com and summarize the page");

    let result = errand::run_task(&config, &request).await;
    println!("{}", serde_json::to_string_pretty(&result).unwrap());
    assert!(result.success, "live run failed: {}", result.error);
    assert!(!result.result.is_empty());
}
