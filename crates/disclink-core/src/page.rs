//! Page identifier derivation.
//!
//! Turns a page path (and optionally its rendered title) into a
//! [`PageContext`]. Derivation is pure: no network or storage access.
//!
//! ## Rules
//!
//! 1. Strip the site base prefix, any leading slash, a trailing slash and an
//!    `.html` suffix. An empty remainder becomes the root identifier.
//! 2. Pages under an `experiments/` segment are identified by their leaf
//!    segment alone.
//! 3. Other nested pages use the full remaining path as the primary
//!    identifier, with the leaf segment kept as an alternate, so
//!    `meetings/2025-05-13` and `hardware/2025-05-13` stay distinct.
//! 4. The title, with the site-name suffix removed, is always kept.
//!
//! ```rust
//! use disclink_core::config::SiteConfig;
//! use disclink_core::page::PageIdentifierResolver;
//!
//! let resolver = PageIdentifierResolver::new(SiteConfig::default());
//! let page = resolver.resolve("/meetings/2025-05-13", None);
//! assert_eq!(page.identifier, "meetings/2025-05-13");
//! assert_eq!(page.alternate_identifiers, vec!["2025-05-13".to_string()]);
//! ```

use crate::config::SiteConfig;
use crate::types::PageContext;
use std::borrow::Cow;
use url::Url;

const EXPERIMENTS_SEGMENT: &str = "experiments";
const HTML_SUFFIX: &str = ".html";

/// Derives page identifiers from paths and titles.
#[derive(Debug, Clone)]
pub struct PageIdentifierResolver {
    site: SiteConfig,
}

impl PageIdentifierResolver {
    /// Create a resolver for the given site settings.
    #[must_use]
    pub const fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Build the [`PageContext`] for a page.
    ///
    /// `location` may be a bare path (`/meetings/2025-05-13/`) or a full URL;
    /// query strings and fragments are ignored. When `title` is absent the
    /// primary identifier doubles as the title.
    #[must_use]
    pub fn resolve(&self, location: &str, title: Option<&str>) -> PageContext {
        let path = self.normalize_path(location);
        let segments: Vec<&str> = path.split('/').collect();
        let leaf = segments.last().copied().unwrap_or_default().to_string();

        let nested = segments.len() > 1;
        let under_experiments = segments[..segments.len().saturating_sub(1)]
            .iter()
            .any(|segment| *segment == EXPERIMENTS_SEGMENT);

        let (identifier, alternate_identifiers) = if under_experiments || !nested {
            (leaf, Vec::new())
        } else {
            (path.clone(), vec![leaf])
        };

        let title = title
            .map(|raw| self.strip_title_suffix(raw))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| identifier.clone());

        PageContext {
            path,
            identifier,
            alternate_identifiers,
            title,
        }
    }

    /// Normalize a location into the slash-separated page path.
    ///
    /// Never returns an empty string.
    #[must_use]
    pub fn normalize_path(&self, location: &str) -> String {
        let component = path_component(location.trim());
        let raw = component.as_ref();

        let base = self.site.base_path.trim_end_matches('/');
        let without_base = if base.is_empty() || base == "/" {
            raw
        } else {
            raw.strip_prefix(base)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .unwrap_or(raw)
        };

        let mut path = without_base
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        if let Some(stripped) = path.strip_suffix(HTML_SUFFIX) {
            path = stripped.trim_end_matches('/').to_string();
        }

        if path.is_empty() {
            self.root_identifier().to_string()
        } else {
            path
        }
    }

    /// Remove the site-name suffix from a rendered title.
    #[must_use]
    pub fn strip_title_suffix(&self, title: &str) -> String {
        let trimmed = title.trim();
        let suffix = self.site.title_suffix.trim();
        if suffix.is_empty() {
            return trimmed.to_string();
        }
        trimmed.strip_suffix(suffix).map_or_else(
            || trimmed.to_string(),
            |rest| rest.trim().trim_end_matches(" -").trim().to_string(),
        )
    }

    fn root_identifier(&self) -> &str {
        let root = self.site.root_identifier.trim();
        if root.is_empty() { "index" } else { root }
    }
}

impl Default for PageIdentifierResolver {
    fn default() -> Self {
        Self::new(SiteConfig::default())
    }
}

/// Path portion of a location, without scheme, host, query or fragment.
fn path_component(location: &str) -> Cow<'_, str> {
    if let Some(url) = Url::parse(location).ok().filter(|u| !u.cannot_be_a_base()) {
        return Cow::Owned(url.path().to_string());
    }
    Cow::Borrowed(location.split(['?', '#']).next().unwrap_or_default())
}
