//! CLI error handling with semantic exit codes.
//!
//! Failures map onto exit codes so scripts and CI jobs can react to the
//! kind of problem without parsing messages.
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Command completed (including rate-limited resolutions) |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments or configuration |
//! | 3 | `NotFound` | Requested file or directory not found |
//! | 5 | `Network` | Network or API failure |
//! | 6 | `Timeout` | Request timed out |
//! | 7 | `Integrity` | Cache file unreadable or corrupt |
//!
//! ```bash
//! disclink sync --docs-dir docs
//! case $? in
//!     0) echo "links synced" ;;
//!     5) echo "GitHub unavailable, try later" ;;
//!     *) echo "failed" ;;
//! esac
//! ```

use std::fmt;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    Usage = 2,

    /// Requested resource not found (exit code 3).
    NotFound = 3,

    /// Network, HTTP or rate-limit failure (exit code 5).
    Network = 5,

    /// Request timed out (exit code 6).
    Timeout = 6,

    /// Local data is corrupted or unreadable (exit code 7).
    Integrity = 7,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::NotFound => "not found",
            Self::Network => "network error",
            Self::Timeout => "timeout",
            Self::Integrity => "integrity error",
        }
    }

    /// Category for a core library error.
    #[must_use]
    pub const fn from_core(err: &disclink_core::Error) -> Self {
        use disclink_core::Error;
        match err {
            Error::Config(_) | Error::InvalidUrl(_) => Self::Usage,
            Error::NotFound(_) => Self::NotFound,
            Error::Network(_)
            | Error::RateLimited(_)
            | Error::UnexpectedStatus { .. }
            | Error::Parse(_) => Self::Network,
            Error::Timeout(_) => Self::Timeout,
            Error::Storage(_) | Error::Serialization(_) => Self::Integrity,
            Error::Io(_) | Error::Other(_) => Self::Internal,
        }
    }

    /// Infer the error category from an error message.
    ///
    /// Fallback for errors that were never categorized explicitly.
    #[must_use]
    pub fn infer_from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Timeout before Network so "connection timed out" lands here
        if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            return Self::Timeout;
        }

        if msg_lower.contains("network")
            || msg_lower.contains("connection")
            || msg_lower.contains("http")
            || msg_lower.contains("rate limit")
        {
            return Self::Network;
        }

        if msg_lower.contains("not found")
            || msg_lower.contains("no such")
            || msg_lower.contains("does not exist")
        {
            return Self::NotFound;
        }

        if msg_lower.contains("corrupt") || msg_lower.contains("cache file") {
            return Self::Integrity;
        }

        if msg_lower.contains("invalid argument")
            || msg_lower.contains("invalid value")
            || msg_lower.contains("config")
        {
            return Self::Usage;
        }

        Self::Internal
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so the full context chain survives.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }
}

impl From<disclink_core::Error> for CliError {
    fn from(err: disclink_core::Error) -> Self {
        Self::new(ErrorCategory::from_core(&err), err)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

// Display already shows the wrapped error, so the chain continues below it.
impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.source()
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// A wrapped [`CliError`] or core error keeps its category; anything else is
/// inferred from the message.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    if let Some(core_err) = err.downcast_ref::<disclink_core::Error>() {
        return ErrorCategory::from_core(core_err).exit_code();
    }
    ErrorCategory::infer_from_message(&err.to_string()).exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorCategory::Internal.exit_code(), 1);
        assert_eq!(ErrorCategory::Usage.exit_code(), 2);
        assert_eq!(ErrorCategory::NotFound.exit_code(), 3);
        assert_eq!(ErrorCategory::Network.exit_code(), 5);
        assert_eq!(ErrorCategory::Timeout.exit_code(), 6);
        assert_eq!(ErrorCategory::Integrity.exit_code(), 7);
    }

    #[test]
    fn test_core_errors_keep_their_category() {
        let err: anyhow::Error = disclink_core::Error::RateLimited("graphql".into()).into();
        assert_eq!(exit_code_from_error(&err), 5);

        let err: anyhow::Error = CliError::from(disclink_core::Error::Config("bad".into())).into();
        assert_eq!(exit_code_from_error(&err), 2);

        let err: anyhow::Error = disclink_core::Error::NotFound("docs directory".into()).into();
        assert_eq!(exit_code_from_error(&err), 3);
    }

    #[test]
    fn test_inferred_categories() {
        assert_eq!(
            ErrorCategory::infer_from_message("connection timed out"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorCategory::infer_from_message("HTTP 502 from api"),
            ErrorCategory::Network
        );
        assert_eq!(
            exit_code_from_error(&anyhow!("something odd")),
            ErrorCategory::Internal.exit_code()
        );
    }

    #[test]
    fn test_display_uses_source() {
        let err = CliError::usage(anyhow!("--quiet and --verbose conflict"));
        assert_eq!(err.to_string(), "--quiet and --verbose conflict");
        assert_eq!(err.category.to_string(), "usage error");

        let wrapped = CliError::from(disclink_core::Error::Config("bad".into()));
        assert_eq!(format!("{:#}", anyhow::Error::from(wrapped)), "Configuration error: bad");
    }
}
