//! Error types and handling for disclink-core operations.
//!
//! This module provides the error type shared by every stage of discussion
//! resolution. Errors are categorized so callers can decide whether to fall
//! back to the next lookup strategy or stop.
//!
//! ## Error Categories
//!
//! - **Transport**: HTTP failures, unexpected statuses, malformed bodies
//! - **Rate limiting**: the host refused the request (`403`)
//! - **Not found**: a single probed item does not exist
//! - **Storage**: the persistent cache could not be read or written
//! - **Configuration**: invalid settings or config files
//!
//! ## Recovery Hints
//!
//! ```rust
//! use disclink_core::Error;
//!
//! fn describe(err: &Error) -> &'static str {
//!     if err.is_rate_limited() {
//!         "stop and tell the user"
//!     } else if err.is_recoverable() {
//!         "try the next strategy"
//!     } else {
//!         "give up"
//!     }
//! }
//!
//! assert_eq!(describe(&Error::RateLimited("search".into())), "stop and tell the user");
//! assert_eq!(describe(&Error::Parse("bad json".into())), "try the next strategy");
//! ```

use thiserror::Error;

/// The main error type for disclink-core operations.
///
/// All fallible public functions return `Result<T, Error>`. The resolution
/// entry point itself never fails; these errors are consumed by the lookup
/// chain and turned into one of the render outcomes.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading and writing the cache file, config files and markdown
    /// pages during link synchronisation.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Connection refused, DNS failure, TLS problems or a transport timeout.
    /// The lookup chain treats this as a strategy failure and moves on.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body did not have the expected shape.
    ///
    /// Remote JSON is validated against explicit types before use; a
    /// mismatch lands here instead of being mistaken for an empty result.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The host answered with a forbidden status.
    ///
    /// Anonymous API access shares a small rate budget. A `403` means that
    /// budget is spent, not that the resource is missing, so this error is
    /// terminal for the current resolution and is never cached.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The host answered with a status the caller cannot use.
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code returned by the host.
        status: u16,
        /// URL that produced the status.
        url: String,
    },

    /// Persistent cache operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    ///
    /// For a probed thread number this is an ordinary negative answer.
    #[error("Not found: {0}")]
    NotFound(String),

    /// URL is malformed or invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Serialization or deserialization failed.
    ///
    /// Raised for corrupt cache values and config round-trips.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check whether falling back to another strategy might succeed.
    ///
    /// Transport failures, unexpected statuses and malformed bodies are
    /// strategy-local: a different endpoint may still answer. Rate limiting
    /// is shared across every endpoint of the host and is never recoverable
    /// within a single resolution.
    ///
    /// ```rust
    /// use disclink_core::Error;
    ///
    /// assert!(Error::Timeout("listing".into()).is_recoverable());
    /// assert!(Error::UnexpectedStatus { status: 502, url: "x".into() }.is_recoverable());
    /// assert!(!Error::RateLimited("probe".into()).is_recoverable());
    /// assert!(!Error::Config("missing owner".into()).is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Parse(_)
                | Self::UnexpectedStatus { .. }
                | Self::Timeout(_)
                | Self::NotFound(_)
        )
    }

    /// Returns true when the host refused the request because of rate limiting.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for structured log fields:
    ///
    /// ```rust
    /// use disclink_core::Error;
    ///
    /// let err = Error::NotFound("issue #12".into());
    /// assert_eq!(err.category(), "not_found");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::RateLimited(_) => "rate_limited",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Timeout(_) => "timeout",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_is_terminal() {
        let err = Error::RateLimited("listing returned 403".into());
        assert!(err.is_rate_limited());
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), "rate_limited");
    }

    #[test]
    fn test_transport_errors_are_recoverable() {
        let errors = [
            Error::Parse("missing data".into()),
            Error::Timeout("probe #87".into()),
            Error::UnexpectedStatus {
                status: 500,
                url: "https://api.github.com/graphql".into(),
            },
        ];
        for err in errors {
            assert!(err.is_recoverable(), "{err} should be recoverable");
            assert!(!err.is_rate_limited());
        }
    }

    #[test]
    fn test_storage_errors_are_not_recoverable() {
        assert!(!Error::Storage("disk full".into()).is_recoverable());
        assert!(!Error::Serialization("bad value".into()).is_recoverable());
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.category(), "serialization");
    }

    #[test]
    fn test_toml_error_converts_to_config() {
        let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: Error = toml_err.into();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = Error::UnexpectedStatus {
            status: 502,
            url: "https://api.github.com/search/issues".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 502 from https://api.github.com/search/issues"
        );
    }
}
