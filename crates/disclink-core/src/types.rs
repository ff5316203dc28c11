//! Data types shared by the lookup strategies, the resolver and the renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title prefix every page discussion carries.
pub const DISCUSSION_TITLE_PREFIX: &str = "Discussion: ";

/// Build the canonical discussion title for an identifier.
#[must_use]
pub fn discussion_title(identifier: &str) -> String {
    format!("{DISCUSSION_TITLE_PREFIX}{identifier}")
}

/// Identity of one documentation page, derived once per resolution.
///
/// Built by [`crate::page::PageIdentifierResolver`]; the identifier is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    /// Normalized page path (base prefix, trailing slash and `.html` removed).
    pub path: String,
    /// Primary identifier matched against discussion titles.
    pub identifier: String,
    /// Lower-priority identifiers, in the order they are tried.
    pub alternate_identifiers: Vec<String>,
    /// Rendered page title with the site-name suffix removed.
    pub title: String,
}

impl PageContext {
    /// Primary identifier followed by every alternate, in priority order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.identifier.as_str())
            .chain(self.alternate_identifiers.iter().map(String::as_str))
    }
}

/// Lookup strategy, also recorded as the source of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One request listing the most recently updated discussions.
    #[serde(alias = "bulk-listing")]
    Listing,
    /// Fetch a fixed set of thread numbers one at a time.
    #[serde(alias = "numbered-probe")]
    Probe,
    /// Issue progressively looser text-search queries.
    Search,
}

impl Strategy {
    /// Stable name used in logs and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listing => "bulk-listing",
            Self::Probe => "numbered-probe",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which criterion selected a discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedVia {
    /// Title equals `Discussion: <primary identifier>`.
    Exact,
    /// Title equals `Discussion: <alternate identifier>`.
    Alternate,
    /// Title contains an identifier.
    Substring,
    /// Title equals the page title.
    PageTitle,
}

/// A discussion chosen for a page. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionMatch {
    /// Web URL of the discussion thread.
    pub url: String,
    /// Discussion title as reported by the host.
    pub title: String,
    /// Criterion that selected it.
    pub matched_via: MatchedVia,
    /// Strategy that found it.
    pub source: Strategy,
}

/// A discussion as seen by a lookup strategy, before matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionSummary {
    /// Discussion title.
    pub title: String,
    /// Web URL of the thread.
    pub url: String,
    /// Thread number, when the endpoint reports it.
    pub number: Option<u64>,
    /// Last update (listing) or creation time (search), used for tie-breaks.
    pub updated_at: Option<DateTime<Utc>>,
    /// Category name, when the endpoint reports it.
    pub category: Option<String>,
}
