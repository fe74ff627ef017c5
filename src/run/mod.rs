//! Run module - task pipeline, extraction policy, and dispatch strategies

pub mod dispatch;
pub mod outcome;
pub mod task;
pub mod worker;

pub use dispatch::{dispatch, run_via_worker};
pub use outcome::resolve_outcome;
pub use task::{run_task, run_task_with};
