//! # Output Formatting
//!
//! Every command builds its result once and hands it to one of the
//! formatters here, so text and JSON always describe the same data.
//!
//! - [`text`]: Human-readable output with color coding
//! - [`json`]: Pretty-printed JSON for scripts
//!
//! The `html` format is only meaningful for `resolve`, where it prints the
//! rendered link markup exactly as a page would embed it.
//!
//! ```bash
//! disclink cache list -f json | jq '.[] | select(.url == null) | .identifier'
//! ```

pub mod json;
pub mod text;

use clap::ValueEnum;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
    /// Rendered link markup
    Html,
}
