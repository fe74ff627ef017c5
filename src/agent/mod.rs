//! Agent module - the browser-driving action loop and its run history

pub mod action;
pub mod engine;
pub mod history;
pub mod prompts;

pub use action::AgentAction;
pub use engine::Agent;
pub use history::{AgentHistory, RunHistory};
