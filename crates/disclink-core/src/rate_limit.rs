//! Response classification for the collaboration host.
//!
//! Anonymous callers share a small request budget. When it runs out the host
//! answers `403 Forbidden`, which must never be read as "this discussion does
//! not exist": caching that answer would hide real discussions until the TTL
//! expires. The guard keeps the three cases apart:
//!
//! | Status | Class | Effect |
//! |--------|-------|--------|
//! | 2xx | [`ResponseClass::Usable`] | body is parsed |
//! | 403, 429 | [`ResponseClass::RateLimited`] | resolution stops, nothing cached |
//! | 404 | [`ResponseClass::NotFound`] | probe moves to the next number |
//! | anything else | [`ResponseClass::Failure`] | chain moves to the next strategy |

use crate::{Error, Result};
use reqwest::StatusCode;

/// How a response status should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// Success status; the body may be used.
    Usable,
    /// The host refused the request for budget reasons.
    RateLimited,
    /// The requested item does not exist.
    NotFound,
    /// Any other failure; the current strategy cannot continue.
    Failure,
}

/// Classifies host responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitGuard;

impl RateLimitGuard {
    /// Classify a status code.
    #[must_use]
    pub fn classify(status: StatusCode) -> ResponseClass {
        if status.is_success() {
            ResponseClass::Usable
        } else if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            ResponseClass::RateLimited
        } else if status == StatusCode::NOT_FOUND {
            ResponseClass::NotFound
        } else {
            ResponseClass::Failure
        }
    }

    /// Turn a status into `Ok(())` or the matching error.
    ///
    /// # Errors
    ///
    /// - [`Error::RateLimited`] for `403`/`429`
    /// - [`Error::NotFound`] for `404`
    /// - [`Error::UnexpectedStatus`] for every other non-success status
    pub fn check(status: StatusCode, url: &str) -> Result<()> {
        match Self::classify(status) {
            ResponseClass::Usable => Ok(()),
            ResponseClass::RateLimited => Err(Error::RateLimited(format!(
                "{url} answered {}",
                status.as_u16()
            ))),
            ResponseClass::NotFound => Err(Error::NotFound(url.to_string())),
            ResponseClass::Failure => Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}
