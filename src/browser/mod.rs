//! Browser module - session lifecycle and launch-argument assembly

pub mod launch;
pub mod session;

pub use launch::{in_container, LaunchFlags};
pub use session::BrowserSession;
