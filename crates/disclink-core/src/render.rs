//! Discussion link rendering.
//!
//! Every resolution ends in exactly one [`RenderedLink`]:
//!
//! - a link to the existing discussion
//! - a pre-filled "start a discussion" link titled `Discussion: <identifier>`
//! - a browse-all link when the host's rate limit was hit
//!
//! The HTML matches the markup the documentation site styles:
//!
//! ```html
//! <div class="github-discussion-link">
//!   <hr>
//!   <p>
//!     <a href="..." target="_blank">💬 Join the discussion for this page on GitHub</a>
//!   </p>
//! </div>
//! ```

use crate::config::RepositoryConfig;
use crate::types::discussion_title;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

/// CSS class of the container appended to a page.
pub const CONTAINER_CLASS: &str = "github-discussion-link";
/// Marker opening a synchronised block in a markdown source file.
pub const BLOCK_START: &str = "<!-- DISCUSSION_LINK_START -->";
/// Marker closing a synchronised block in a markdown source file.
pub const BLOCK_END: &str = "<!-- DISCUSSION_LINK_END -->";

const JOIN_LABEL: &str = "💬 Join the discussion for this page on GitHub";
const START_LABEL: &str = "💬 Start a discussion for this page on GitHub";
const BROWSE_LABEL: &str = "💬 View GitHub discussions";
const LOGIN_NOTE: &str = "(A GitHub account is required to create or participate in discussions)";
const RATE_LIMIT_NOTE: &str =
    "GitHub API rate limit exceeded. Please try again later or browse all discussions.";

/// Which of the three outcomes a link represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Links to the page's existing discussion.
    Existing,
    /// Opens the new-discussion form with the title filled in.
    CreateNew,
    /// Lists every discussion; shown when the lookup was rate limited.
    RateLimited,
}

impl LinkKind {
    const fn note_class(self) -> Option<&'static str> {
        match self {
            Self::Existing => None,
            Self::CreateNew => Some("login-note"),
            Self::RateLimited => Some("api-limit-note"),
        }
    }
}

/// A link ready to be shown on a page or printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLink {
    /// Outcome this link represents.
    pub kind: LinkKind,
    /// Link target.
    pub href: String,
    /// Anchor text.
    pub label: String,
    /// Explanatory note shown next to the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Pre-filled title for a new discussion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_title: Option<String>,
}

impl RenderedLink {
    /// The `<hr>` plus paragraph placed inside a container.
    #[must_use]
    pub fn inner_html(&self) -> String {
        let mut html = format!(
            "<hr>\n<p>\n  <a href=\"{}\" target=\"_blank\">{}</a>",
            encode_double_quoted_attribute(&self.href),
            encode_text(&self.label)
        );
        if let (Some(note), Some(class)) = (&self.note, self.kind.note_class()) {
            html.push_str(&format!(
                "\n  <span class=\"{class}\">{}</span>",
                encode_text(note)
            ));
        }
        html.push_str("\n</p>");
        html
    }

    /// Full container element as appended to a rendered page.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"{CONTAINER_CLASS}\">\n{}\n</div>",
            self.inner_html()
        )
    }

    /// Marker-delimited block written into markdown sources.
    #[must_use]
    pub fn to_marked_block(&self) -> String {
        format!(
            "{BLOCK_START}\n<div class=\"discussion-link\">\n{}\n</div>\n{BLOCK_END}",
            self.inner_html()
        )
    }
}

/// Builds [`RenderedLink`]s for one repository.
#[derive(Debug, Clone)]
pub struct LinkRenderer {
    repository: RepositoryConfig,
}

impl LinkRenderer {
    /// Create a renderer for the configured repository.
    #[must_use]
    pub const fn new(repository: RepositoryConfig) -> Self {
        Self { repository }
    }

    /// Link to an existing discussion.
    #[must_use]
    pub fn existing(&self, url: &str) -> RenderedLink {
        RenderedLink {
            kind: LinkKind::Existing,
            href: url.to_string(),
            label: JOIN_LABEL.to_string(),
            note: None,
            discussion_title: None,
        }
    }

    /// Link opening the new-discussion form for `identifier`.
    ///
    /// ```rust
    /// use disclink_core::config::RepositoryConfig;
    /// use disclink_core::render::LinkRenderer;
    ///
    /// let link = LinkRenderer::new(RepositoryConfig::default()).create_new("meetings/2025-05-13");
    /// assert!(link.href.ends_with("title=Discussion%3A%20meetings%2F2025-05-13"));
    /// ```
    #[must_use]
    pub fn create_new(&self, identifier: &str) -> RenderedLink {
        let title = discussion_title(identifier);
        let href = format!(
            "{}/new?category={}&title={}",
            self.repository.discussions_url(),
            urlencoding::encode(&self.repository.new_discussion_category),
            urlencoding::encode(&title)
        );
        RenderedLink {
            kind: LinkKind::CreateNew,
            href,
            label: START_LABEL.to_string(),
            note: Some(LOGIN_NOTE.to_string()),
            discussion_title: Some(title),
        }
    }

    /// Link listing every discussion, used when the lookup was rate limited.
    #[must_use]
    pub fn rate_limited(&self) -> RenderedLink {
        RenderedLink {
            kind: LinkKind::RateLimited,
            href: self.repository.discussions_url(),
            label: BROWSE_LABEL.to_string(),
            note: Some(RATE_LIMIT_NOTE.to_string()),
            discussion_title: None,
        }
    }
}

/// A page's main content area.
///
/// The discussion link is appended at most once, however many times
/// [`ContentArea::append_link`] is called.
#[derive(Debug, Clone, Default)]
pub struct ContentArea {
    html: String,
    link_appended: bool,
}

impl ContentArea {
    /// Wrap existing content. Content that already carries a link container
    /// counts as linked.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        let html = html.into();
        let link_appended = html.contains(&format!("class=\"{CONTAINER_CLASS}\""));
        Self {
            html,
            link_appended,
        }
    }

    /// Append the link container. Returns false if a link was already present.
    pub fn append_link(&mut self, link: &RenderedLink) -> bool {
        if self.link_appended {
            return false;
        }
        if !self.html.is_empty() && !self.html.ends_with('\n') {
            self.html.push('\n');
        }
        self.html.push_str(&link.to_html());
        self.html.push('\n');
        self.link_appended = true;
        true
    }

    /// Returns true once a link has been appended.
    #[must_use]
    pub const fn has_link(&self) -> bool {
        self.link_appended
    }

    /// Current content.
    #[must_use]
    pub fn as_html(&self) -> &str {
        &self.html
    }

    /// Consume the area and return its content.
    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> LinkRenderer {
        LinkRenderer::new(RepositoryConfig {
            owner: "allenneuraldynamics".into(),
            name: "openscope-community-predictive-processing".into(),
            ..RepositoryConfig::default()
        })
    }

    #[test]
    fn test_create_new_link_escapes_title() {
        let link = renderer().create_new("meetings/2025-05-13");
        assert_eq!(
            link.href,
            "https://github.com/allenneuraldynamics/openscope-community-predictive-processing/discussions/new?category=q-a&title=Discussion%3A%20meetings%2F2025-05-13"
        );
        assert_eq!(
            link.discussion_title.as_deref(),
            Some("Discussion: meetings/2025-05-13")
        );
        assert_eq!(link.kind, LinkKind::CreateNew);
    }

    #[test]
    fn test_rate_limited_link_browses_all() {
        let link = renderer().rate_limited();
        assert_eq!(
            link.href,
            "https://github.com/allenneuraldynamics/openscope-community-predictive-processing/discussions"
        );
        let html = link.to_html();
        assert!(html.contains("💬 View GitHub discussions"));
        assert!(html.contains("<span class=\"api-limit-note\">GitHub API rate limit exceeded."));
    }

    #[test]
    fn test_existing_link_html() {
        let html = renderer()
            .existing("https://github.com/o/r/discussions/87")
            .to_html();
        assert!(html.starts_with("<div class=\"github-discussion-link\">\n<hr>\n<p>"));
        assert!(html.contains(
            "<a href=\"https://github.com/o/r/discussions/87\" target=\"_blank\">💬 Join the discussion for this page on GitHub</a>"
        ));
        assert!(!html.contains("<span"));
        assert!(html.ends_with("</p>\n</div>"));
    }

    #[test]
    fn test_create_new_html_has_login_note_and_escaped_ampersand() {
        let html = renderer().create_new("index").to_html();
        assert!(html.contains("category=q-a&amp;title=Discussion%3A%20index"));
        assert!(html.contains("<span class=\"login-note\">(A GitHub account is required"));
    }

    #[test]
    fn test_hostile_url_is_escaped() {
        let html = renderer().existing("https://x/\"><script>").to_html();
        assert!(!html.contains("\"><script>"));
    }

    #[test]
    fn test_marked_block_is_delimited() {
        let block = renderer().create_new("index").to_marked_block();
        assert!(block.starts_with(BLOCK_START));
        assert!(block.ends_with(BLOCK_END));
        assert!(block.contains("<div class=\"discussion-link\">"));
    }

    #[test]
    fn test_content_area_appends_once() {
        let mut area = ContentArea::new("<h1>Hardware</h1>");
        let link = renderer().existing("https://github.com/o/r/discussions/1");
        assert!(area.append_link(&link));
        assert!(!area.append_link(&renderer().rate_limited()));
        assert!(area.has_link());
        assert_eq!(area.as_html().matches(CONTAINER_CLASS).count(), 1);
        assert!(area.as_html().starts_with("<h1>Hardware</h1>\n<div"));
    }

    #[test]
    fn test_content_area_detects_existing_container() {
        let existing = renderer().existing("u").to_html();
        let mut area = ContentArea::new(existing.clone());
        assert!(!area.append_link(&renderer().existing("v")));
        assert_eq!(area.into_html(), existing);
    }

    #[test]
    fn test_link_serializes_kind() {
        let json = serde_json::to_value(renderer().create_new("index")).unwrap_or_default();
        assert_eq!(json["kind"], "create_new");
        assert_eq!(json["discussionTitle"], "Discussion: index");
        assert!(json.get("note").is_some());
    }
}
