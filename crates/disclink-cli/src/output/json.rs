//! JSON output.

use anyhow::Result;
use disclink_core::{PageContext, RenderedLink, Resolution, discussion_title};
use serde::Serialize;

/// `resolve` output: the resolution plus the link it renders to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutput<'a> {
    #[serde(flatten)]
    pub resolution: &'a Resolution,
    pub link: &'a RenderedLink,
    /// Whether `--content` gained a link block; absent without `--content`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_updated: Option<bool>,
}

/// `identify` output: the page context plus the title a new discussion gets.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyOutput<'a> {
    #[serde(flatten)]
    pub page: &'a PageContext,
    pub discussion_title: String,
}

impl<'a> IdentifyOutput<'a> {
    pub fn new(page: &'a PageContext) -> Self {
        Self {
            page,
            discussion_title: discussion_title(&page.identifier),
        }
    }
}

/// Serialize `value` as pretty JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use disclink_core::{PageIdentifierResolver, SiteConfig};
    use serde_json::Value;

    #[test]
    fn test_identify_output_is_flat() {
        let page = PageIdentifierResolver::new(SiteConfig::default())
            .resolve("/meetings/2025-05-13/", Some("May 13 Meeting"));
        let value: Value = serde_json::from_str(&to_json(&IdentifyOutput::new(&page)).unwrap())
            .unwrap();

        assert_eq!(value["identifier"], "meetings/2025-05-13");
        assert_eq!(value["alternateIdentifiers"][0], "2025-05-13");
        assert_eq!(value["discussionTitle"], "Discussion: meetings/2025-05-13");
    }
}
