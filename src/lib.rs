//! Errand - Natural-Language Browsing Task Runner
//!
//! A Rust-based runner that drives a controlled browser session through an
//! LLM-planned agent loop to execute free-text browsing tasks and report a
//! single structured result.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Chat-completion client for OpenAI-compatible endpoints
//! - **Browser**: Session lifecycle and launch-argument assembly
//! - **Agent**: The bounded action loop and its run history
//! - **Run**: Task pipeline, result extraction, and dispatch strategies
//! - **Plugin**: Invocation surface for embedding hosts
//!
//! # Usage
//!
//! ```rust,no_run
//! use errand::core::{Config, TaskRequest};
//! use errand::run::run_task;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let request = TaskRequest::new("Navigate to https://example.com and summarize the page");
//!
//!     let result = run_task(&config, &request).await;
//!     println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! }
//! ```

pub mod agent;
pub mod browser;
pub mod core;
pub mod llm;
pub mod plugin;
pub mod run;

// Re-export commonly used items
pub use crate::core::{Config, ErrandError, Result, TaskRequest, TaskResult};
pub use crate::run::{dispatch, run_task};
