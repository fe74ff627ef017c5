//! Core module - shared infrastructure for errand
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, DispatchMode};
pub use error::{ErrandError, Result};
pub use types::*;
