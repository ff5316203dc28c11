//! Shared helpers for the CLI commands.

pub mod cli_args;
pub mod logging;
pub mod store;

pub use logging::initialize_logging;
