//! Errand worker - runs one browsing task in an isolated process
//!
//! `errand-worker <input_file> <output_file>`
//!
//! Reads a `{query, task_id}` JSON request, runs the task under its own
//! runtime, and writes the `{success, task, result, error}` JSON result to
//! the output file. On bad input a best-effort error result is written
//! before the non-zero exit, so the parent never has to guess.

use std::path::PathBuf;

use errand::core::Config;
use errand::run::worker::{read_request, write_error_result, write_result};
use errand::run::run_task;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: errand-worker <input_file> <output_file>");
        std::process::exit(2);
    }

    let input_file = PathBuf::from(&args[1]);
    let output_file = PathBuf::from(&args[2]);

    let config = Config::load();

    let request = match read_request(&input_file) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("errand-worker: {}", e);
            write_error_result(&output_file, e.to_string());
            std::process::exit(1);
        }
    };

    println!("Worker starting task {}", request.task_id);

    let result = run_task(&config, &request).await;

    if let Err(e) = write_result(&output_file, &result) {
        eprintln!("errand-worker: failed to write result: {}", e);
        std::process::exit(1);
    }

    println!("Result written to {}", output_file.display());
}
