//! Configuration management for errand
//!
//! Supports environment variables, config files, and runtime overrides.
//! All process-external knobs (endpoint, credentials, launch flags) live
//! here explicitly; nothing mutates the parent process environment.
//!
//! Config file location: ~/.config/errand/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::browser::LaunchFlags;
use crate::core::error::{ErrandError, Result};

/// Main configuration for errand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat-completion endpoint configuration
    pub llm: LlmConfig,
    /// Browser session configuration
    pub browser: BrowserConfig,
    /// Agent behavior configuration
    pub agent: AgentConfig,
    /// Execution dispatch configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Worker process configuration
    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Chat-completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name as known to the endpoint
    pub model: String,
    /// Base URL of the OpenAI-compatible API (e.g. http://host:port/v1)
    pub base_url: String,
    /// API credential. Internal endpoints don't check it, but the client
    /// libraries downstream insist on one being present.
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Transport-level retry budget
    pub max_retries: u32,
}

/// Browser session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Browser automation CLI to drive (agent-browser compatible)
    pub command: String,
    /// Session name for isolation
    pub session_name: String,
    /// Whether to run without a visible window
    pub headless: bool,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Permit navigation to hosts with invalid certificates
    pub ignore_https_errors: bool,
    /// Allow the page to trigger downloads
    pub accept_downloads: bool,
    /// Bypass Content-Security-Policy on visited pages
    pub bypass_csp: bool,
    /// Keep the browser process alive between commands
    pub keep_alive: bool,
    /// Launch-argument toggles, passed through verbatim
    #[serde(default)]
    pub launch: LaunchFlags,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum action steps before the run is stopped
    pub max_steps: usize,
    /// Whether to send page screenshots to the model
    pub use_vision: bool,
    /// Wall-clock budget for a single run in seconds
    pub run_timeout_secs: u64,
    /// Whether to show debug output
    pub debug: bool,
    /// Extra behavior rules appended to the system message
    pub extend_system_message: Option<String>,
    /// Extra rules appended to the planner message
    pub extend_planner_system_message: Option<String>,
}

/// How a task run is invoked relative to the caller's runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Fresh runtime in the calling thread; errors if one is already active
    Direct,
    /// Direct when possible, dedicated thread when a runtime is active
    LoopFallback,
    /// Always a dedicated thread, joined with a timeout
    ThreadPool,
    /// Separate worker process with file-based IPC
    Subprocess,
}

impl FromStr for DispatchMode {
    type Err = ErrandError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "direct" => Ok(Self::Direct),
            "loop_fallback" | "fallback" => Ok(Self::LoopFallback),
            "thread_pool" | "thread" => Ok(Self::ThreadPool),
            "subprocess" | "worker" => Ok(Self::Subprocess),
            other => Err(ErrandError::config(format!(
                "Unknown dispatch mode '{}' (expected direct, fallback, thread, subprocess)",
                other
            ))),
        }
    }
}

/// Execution dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Strategy used when a task is invoked
    pub mode: DispatchMode,
    /// Join timeout for the thread-pool strategy in seconds
    pub thread_timeout_secs: u64,
}

/// Worker process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Command used to spawn the worker; input/output paths are appended
    pub command: Vec<String>,
    /// Wall-clock budget for the worker process in seconds
    pub timeout_secs: u64,
    /// Disable usage telemetry in the libraries the worker loads
    pub telemetry_opt_out: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: env::var("ERRAND_MODEL").unwrap_or_else(|_| "DeepSeek-R1-32B-FP8".to_string()),
            base_url: env::var("OPENAI_BASE_URL")
                .or_else(|_| env::var("ERRAND_BASE_URL"))
                .unwrap_or_else(|_| "http://localhost:25010/v1".to_string()),
            api_key: env::var("OPENAI_API_KEY").unwrap_or_else(|_| "fake_key".to_string()),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            command: env::var("ERRAND_BROWSER_COMMAND")
                .unwrap_or_else(|_| "agent-browser".to_string()),
            session_name: env::var("ERRAND_BROWSER_SESSION")
                .unwrap_or_else(|_| "errand".to_string()),
            headless: env::var("ERRAND_HEADLESS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            viewport_width: 1280,
            viewport_height: 720,
            ignore_https_errors: true,
            accept_downloads: true,
            bypass_csp: true,
            keep_alive: true,
            launch: LaunchFlags::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            use_vision: false,
            run_timeout_secs: 240,
            debug: env::var("ERRAND_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            extend_system_message: None,
            extend_planner_system_message: None,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: env::var("ERRAND_DISPATCH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DispatchMode::LoopFallback),
            thread_timeout_secs: 300,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            command: vec![env::var("ERRAND_WORKER_COMMAND")
                .unwrap_or_else(|_| "errand-worker".to_string())],
            timeout_secs: 180,
            telemetry_opt_out: true,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("errand")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ErrandError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ErrandError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ErrandError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ErrandError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ErrandError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| ErrandError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Environment handed to spawned worker processes
    ///
    /// These were process-global mutations in older deployments; the parent
    /// environment stays untouched now.
    pub fn worker_env(&self) -> Vec<(String, String)> {
        let mut env = Vec::new();
        if self.worker.telemetry_opt_out {
            env.push(("ANONYMIZED_TELEMETRY".to_string(), "false".to_string()));
        }
        env.push(("OPENAI_API_KEY".to_string(), self.llm.api_key.clone()));
        env.push(("OPENAI_BASE_URL".to_string(), self.llm.base_url.clone()));
        env
    }
}
