//! Worker file IO
//!
//! The worker process talks to its parent exclusively through JSON files,
//! sidestepping stdout encoding trouble on hosts that mangle pipes. These
//! helpers are shared between the worker binary and its tests.

use std::fs;
use std::path::Path;

use crate::core::{ErrandError, Result, TaskRequest, TaskResult};

/// Read and validate a task request from the input file
pub fn read_request(path: &Path) -> Result<TaskRequest> {
    if !path.exists() {
        return Err(ErrandError::worker(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    let request: TaskRequest = serde_json::from_str(&content)
        .map_err(|e| ErrandError::worker(format!("malformed input file: {}", e)))?;

    if request.is_empty() {
        return Err(ErrandError::InvalidTask("query must not be empty".to_string()));
    }

    Ok(request)
}

/// Write the task result to the output file
pub fn write_result(path: &Path, result: &TaskResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(())
}

/// Best-effort error report before a failing exit; the parent synthesizes
/// its own error if even this write fails
pub fn write_error_result(path: &Path, error: impl Into<String>) {
    let result = TaskResult::failed("", error);
    if let Err(e) = write_result(path, &result) {
        eprintln!("Warning: failed to write error result: {}", e);
    }
}
