//! Execution dispatch strategies
//!
//! Host environments disagree about who owns the async runtime: a plain CLI
//! has none, an embedding host usually has one already, and some sandboxes
//! only tolerate a separate process. Each strategy answers the same
//! question - "run this task to completion from here" - for one of those
//! environments. The choice is a deployment decision, not a runtime one.

use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tokio::process::Command;
use tokio::runtime::{Handle, Runtime};

use crate::core::{Config, DispatchMode, TaskRequest, TaskResult};
use crate::run::task::run_task;

/// Run one task under the configured strategy
pub fn dispatch(config: &Config, request: &TaskRequest) -> TaskResult {
    match config.dispatch.mode {
        DispatchMode::Direct => run_direct(config, request),
        DispatchMode::LoopFallback => run_with_fallback(config, request),
        DispatchMode::ThreadPool => run_thread_pool(config, request),
        DispatchMode::Subprocess => run_subprocess(config, request),
    }
}

/// Whether an async runtime is already active in this thread
fn runtime_active() -> bool {
    Handle::try_current().is_ok()
}

/// Direct strategy: fresh runtime in the calling thread
///
/// Errors when a runtime is already active, because a nested `block_on`
/// would panic. Callers in that situation want one of the other strategies.
pub fn run_direct(config: &Config, request: &TaskRequest) -> TaskResult {
    if runtime_active() {
        return TaskResult::failed(
            &request.query,
            "an async runtime is already active in this thread; \
             use fallback, thread, or subprocess dispatch",
        );
    }
    block_on_fresh_runtime(config.clone(), request.clone(), false)
}

/// Loop-fallback strategy: direct when possible, dedicated thread otherwise
pub fn run_with_fallback(config: &Config, request: &TaskRequest) -> TaskResult {
    if !runtime_active() {
        return run_direct(config, request);
    }

    let rx = spawn_task_thread(config.clone(), request.clone(), false);
    match rx.recv() {
        Ok(result) => result,
        Err(_) => TaskResult::failed(&request.query, "task thread exited without a result"),
    }
}

/// Thread-pool strategy: dedicated thread joined with a wall-clock timeout
///
/// On expiry the thread is abandoned; there is no cross-thread cancellation.
pub fn run_thread_pool(config: &Config, request: &TaskRequest) -> TaskResult {
    let timeout_secs = config.dispatch.thread_timeout_secs;
    let rx = spawn_task_thread(config.clone(), request.clone(), false);

    match rx.recv_timeout(Duration::from_secs(timeout_secs)) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => TaskResult::failed(
            &request.query,
            format!(
                "task exceeded the {} second thread budget and was abandoned",
                timeout_secs
            ),
        ),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            TaskResult::failed(&request.query, "task thread exited without a result")
        }
    }
}

/// Subprocess strategy, callable without an active runtime
pub fn run_subprocess(config: &Config, request: &TaskRequest) -> TaskResult {
    if !runtime_active() {
        return block_on_fresh_runtime(config.clone(), request.clone(), true);
    }

    let rx = spawn_task_thread(config.clone(), request.clone(), true);
    match rx.recv() {
        Ok(result) => result,
        Err(_) => TaskResult::failed(&request.query, "worker thread exited without a result"),
    }
}

/// Run the task on a dedicated thread that owns its own runtime
fn spawn_task_thread(
    config: Config,
    request: TaskRequest,
    via_worker: bool,
) -> mpsc::Receiver<TaskResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = block_on_fresh_runtime(config, request, via_worker);
        // The receiver may be gone if the join timed out; nothing to do then
        let _ = tx.send(result);
    });
    rx
}

fn block_on_fresh_runtime(config: Config, request: TaskRequest, via_worker: bool) -> TaskResult {
    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            return TaskResult::failed(
                &request.query,
                format!("Failed to create runtime: {}", e),
            )
        }
    };

    runtime.block_on(async {
        if via_worker {
            run_via_worker(&config, &request).await
        } else {
            run_task(&config, &request).await
        }
    })
}

/// Run one task in a separate worker process with file-based IPC
///
/// The request goes to a temp input file, the worker writes the result to a
/// temp output file, and the parent owns the timeout. A worker that outlives
/// its budget is killed, never left running.
pub async fn run_via_worker(config: &Config, request: &TaskRequest) -> TaskResult {
    let temp_dir = std::env::temp_dir();
    let input_file = temp_dir.join(format!("browser_task_input_{}.json", request.task_id));
    let output_file = temp_dir.join(format!("browser_task_output_{}.json", request.task_id));

    let result = worker_round_trip(config, request, &input_file, &output_file).await;

    remove_quietly(&input_file);
    remove_quietly(&output_file);

    result
}

async fn worker_round_trip(
    config: &Config,
    request: &TaskRequest,
    input_file: &PathBuf,
    output_file: &PathBuf,
) -> TaskResult {
    let (program, args) = match config.worker.command.split_first() {
        Some(split) => split,
        None => return TaskResult::failed(&request.query, "worker command is not configured"),
    };

    let input_json = match serde_json::to_string_pretty(request) {
        Ok(json) => json,
        Err(e) => {
            return TaskResult::failed(
                &request.query,
                format!("Failed to serialize task: {}", e),
            )
        }
    };
    if let Err(e) = fs::write(input_file, input_json) {
        return TaskResult::failed(
            &request.query,
            format!("Failed to write task file: {}", e),
        );
    }

    let mut command = Command::new(program);
    command.args(args);
    command.arg(input_file).arg(output_file);
    command.envs(config.worker_env());
    command.kill_on_drop(true);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            return TaskResult::failed(
                &request.query,
                format!("Failed to spawn worker '{}': {}", program, e),
            )
        }
    };

    let timeout_secs = config.worker.timeout_secs;
    let status = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        child.wait(),
    )
    .await
    {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return TaskResult::failed(
                &request.query,
                format!("Failed to wait for worker: {}", e),
            )
        }
        Err(_) => {
            let _ = child.kill().await;
            return TaskResult::failed(
                &request.query,
                format!(
                    "worker exceeded the {} second budget and was terminated",
                    timeout_secs
                ),
            );
        }
    };

    let content = match fs::read_to_string(output_file) {
        Ok(content) => content,
        Err(_) => {
            return TaskResult::failed(
                &request.query,
                format!("worker produced no output file (exit status: {})", status),
            )
        }
    };

    match serde_json::from_str::<TaskResult>(&content) {
        Ok(result) => result,
        Err(e) => TaskResult::failed(
            &request.query,
            format!("Failed to parse worker output: {}", e),
        ),
    }
}

fn remove_quietly(path: &PathBuf) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Warning: failed to remove temp file {:?}: {}", path, e);
        }
    }
}
