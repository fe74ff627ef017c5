//! Browser session - wraps the agent-browser CLI
//!
//! One session per task, owned exclusively by that task. The CLI keeps the
//! actual browser process alive between commands; this type tracks the
//! lifecycle so `close` is safe to call on every exit path.

use std::process::Stdio;
use tokio::process::Command;

use crate::core::config::BrowserConfig;
use crate::core::{ErrandError, Result};

/// A controlled browser instance driven through the automation CLI
pub struct BrowserSession {
    config: BrowserConfig,
    started: bool,
    closed: bool,
}

impl BrowserSession {
    /// Create a session from configuration; nothing is launched yet
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            started: false,
            closed: false,
        }
    }

    /// Check if the automation CLI is installed
    pub async fn is_available(command: &str) -> bool {
        Command::new(command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an automation CLI command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.config.command);
        cmd.args(["--session", &self.config.session_name]);
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ErrandError::AgentBrowserNotFound
            } else {
                ErrandError::browser(format!("Failed to run {}: {}", self.config.command, e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ErrandError::browser(format!(
                "browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Launch the browser with the configured viewport, context options,
    /// and launch arguments
    pub async fn start(&mut self) -> Result<()> {
        let viewport = format!(
            "{}x{}",
            self.config.viewport_width, self.config.viewport_height
        );

        let mut args: Vec<String> = vec!["start".to_string()];
        if self.config.headless {
            args.push("--headless".to_string());
        }
        args.push("--viewport".to_string());
        args.push(viewport);
        if self.config.ignore_https_errors {
            args.push("--ignore-https-errors".to_string());
        }
        if self.config.accept_downloads {
            args.push("--accept-downloads".to_string());
        }
        if self.config.bypass_csp {
            args.push("--bypass-csp".to_string());
        }
        if self.config.keep_alive {
            args.push("--keep-alive".to_string());
        }
        for flag in self.config.launch.to_args() {
            args.push(format!("--browser-arg={}", flag));
        }

        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_command(&arg_refs).await?;
        self.started = true;
        Ok(())
    }

    /// Navigate to a URL
    pub async fn open(&self, url: &str) -> Result<String> {
        self.run_command(&["open", url]).await?;
        // Best effort; slow pages still yield whatever already rendered
        let _ = self.run_command(&["wait", "--load", "networkidle"]).await;
        Ok(format!("Navigated to {}", url))
    }

    /// Click an element by ref
    pub async fn click(&self, ref_id: &str) -> Result<String> {
        self.run_command(&["click", ref_id]).await?;
        Ok(format!("Clicked {}", ref_id))
    }

    /// Fill an input field
    pub async fn fill(&self, ref_id: &str, text: &str) -> Result<String> {
        self.run_command(&["fill", ref_id, text]).await?;
        Ok(format!("Filled {} with '{}'", ref_id, text))
    }

    /// Get visible text from an element, or the whole page body
    pub async fn get_text(&self, ref_id: Option<&str>) -> Result<String> {
        let output = match ref_id {
            Some(r) => self.run_command(&["get", "text", r]).await?,
            None => self.run_command(&["get", "text", "body"]).await?,
        };
        Ok(output.trim().to_string())
    }

    /// Get a snapshot of the current page, either interactive elements only
    /// or the full accessibility tree
    pub async fn snapshot(&self, interactive_only: bool) -> Result<String> {
        if interactive_only {
            self.run_command(&["snapshot", "-i"]).await
        } else {
            self.run_command(&["snapshot"]).await
        }
    }

    /// Close the browser. Idempotent; calling before `start` is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if !self.started || self.closed {
            self.closed = true;
            return Ok(());
        }
        self.closed = true;
        self.run_command(&["close"]).await?;
        Ok(())
    }

    /// Whether the session has been closed (or was never started)
    pub fn is_closed(&self) -> bool {
        self.closed || !self.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = BrowserSession::new(BrowserConfig::default());
        assert!(!session.started);
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_close_before_start_is_noop() {
        let mut session = BrowserSession::new(BrowserConfig::default());
        assert!(session.close().await.is_ok());
        // Idempotent
        assert!(session.close().await.is_ok());
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_missing_cli_maps_to_not_found() {
        let mut config = BrowserConfig::default();
        config.command = "definitely-not-an-installed-browser-cli".to_string();
        let mut session = BrowserSession::new(config);
        match session.start().await {
            Err(ErrandError::AgentBrowserNotFound) => {}
            other => panic!("expected AgentBrowserNotFound, got {:?}", other.err()),
        }
    }
}
