//! BST Workbench
//!
//! ```text
//! ┌───────────┐   sequence.txt   ┌──────────────┐   results_*.csv   ┌──────────┐
//! │ generate  │─────────────────▶│ tree drivers │──────────────────▶│  report  │
//! │ (pattern) │                  │  (external)  │                   │ (ranking)│
//! └───────────┘                  └──────────────┘                   └──────────┘
//! ```
//!
//! The two modes never share a process; the files are the only boundary.

use std::process::ExitCode;

use bst_workbench::cli::{Command, get_env, parse_command, run_generate, run_report};
use bst_workbench::config::AppConfig;
use bst_workbench::error::failure_code;
use bst_workbench::logging::init_logging;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let env = get_env(&args);
    let app_config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            // No subscriber yet
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = init_logging(&app_config);

    tracing::info!(
        env = %env,
        revision = bst_workbench::report::render::BUILD_REVISION,
        "bst_workbench starting"
    );

    match run(&args, &app_config) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = failure_code(&e), "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String], app_config: &AppConfig) -> anyhow::Result<String> {
    match parse_command(args, app_config)? {
        Command::Generate(generate) => run_generate(&generate),
        Command::Report(report) => run_report(&report),
    }
}
