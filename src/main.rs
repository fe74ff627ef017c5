//! Errand - Natural-Language Browsing Task Runner
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use errand::core::{Config, TaskRequest};
use errand::run::worker::read_request;

/// Errand - Natural-Language Browsing Task Runner
#[derive(Parser, Debug)]
#[command(name = "errand")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Task instruction to execute
    #[arg(long, short = 't')]
    task: Option<String>,

    /// Read the task request from a JSON file instead
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Write the result JSON to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Dispatch mode (direct, fallback, thread, subprocess)
    #[arg(long, short = 'm')]
    mode: Option<String>,

    /// Model name override
    #[arg(long)]
    model: Option<String>,

    /// Chat endpoint base URL override
    #[arg(long)]
    base_url: Option<String>,

    /// Run with a visible browser window
    #[arg(long)]
    headed: bool,

    /// Wall-clock budget for the run in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref mode) = args.mode {
        config.dispatch.mode = mode.parse()?;
    }

    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }

    if let Some(ref base_url) = args.base_url {
        config.llm.base_url = base_url.clone();
    }

    if args.headed {
        config.browser.headless = false;
    }

    if let Some(timeout) = args.timeout {
        config.agent.run_timeout_secs = timeout;
    }

    if args.debug {
        config.agent.debug = true;
    }

    // Task intake: inline instruction or request file
    let request = match (&args.task, &args.input) {
        (Some(task), None) => TaskRequest::new(task),
        (None, Some(input)) => {
            read_request(input).with_context(|| format!("reading {}", input.display()))?
        }
        (Some(_), Some(_)) => bail!("--task and --input are mutually exclusive"),
        (None, None) => bail!("provide a task with --task or --input"),
    };

    // The dispatcher owns the runtime decision, so main stays synchronous
    let result = errand::dispatch(&config, &request);

    let json = serde_json::to_string_pretty(&result)?;
    match args.output {
        Some(ref path) => {
            std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", json),
    }

    Ok(())
}
