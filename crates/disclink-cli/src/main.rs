//! disclink CLI - link documentation pages to their GitHub discussions
//!
//! Thin entry point; everything lives in the library so integration tests
//! can drive the same code.

use std::process::ExitCode;

use colored::Colorize;

#[tokio::main]
async fn main() -> ExitCode {
    match disclink_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(disclink_cli::error::exit_code_from_error(&err))
        },
    }
}
