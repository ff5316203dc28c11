//! Title matching shared by every lookup strategy.
//!
//! Strict matching accepts only titles equal (ignoring case) to
//! `Discussion: <identifier>`, trying the primary identifier before each
//! alternate. Ranked matching keeps those exact checks on top and adds weaker
//! criteria below them:
//!
//! 1. exact title for an identifier (earlier identifiers first)
//! 2. title contains `discussion: <identifier>`
//! 3. title equals the page title
//! 4. title contains the bare identifier
//!
//! Within one criterion, the most recently updated discussion wins.

use crate::types::{DiscussionSummary, MatchedVia, PageContext, discussion_title};
use std::cmp::Reverse;

/// First discussion whose title exactly names one of the page identifiers.
///
/// Identifiers are tried in priority order; within one identifier the first
/// candidate wins.
#[must_use]
pub fn find_exact<'a>(
    page: &PageContext,
    candidates: &'a [DiscussionSummary],
) -> Option<(&'a DiscussionSummary, MatchedVia)> {
    page.identifiers().enumerate().find_map(|(index, identifier)| {
        let wanted = discussion_title(identifier).to_lowercase();
        candidates
            .iter()
            .find(|candidate| candidate.title.trim().to_lowercase() == wanted)
            .map(|candidate| (candidate, exact_kind(index)))
    })
}

/// Strict match of a single title against the page identifiers.
#[must_use]
pub fn exact_title_match(page: &PageContext, title: &str) -> Option<MatchedVia> {
    let title = title.trim().to_lowercase();
    page.identifiers()
        .position(|identifier| discussion_title(identifier).to_lowercase() == title)
        .map(exact_kind)
}

/// Best candidate under the ranked criteria, if any candidate qualifies.
#[must_use]
pub fn find_ranked<'a>(
    page: &PageContext,
    candidates: &'a [DiscussionSummary],
) -> Option<(&'a DiscussionSummary, MatchedVia)> {
    let identifiers: Vec<String> = page.identifiers().map(str::to_lowercase).collect();
    let page_title = page.title.trim().to_lowercase();

    candidates
        .iter()
        .enumerate()
        .filter_map(|(position, candidate)| {
            let rank = rank_title(&candidate.title, &identifiers, &page_title)?;
            Some((rank, candidate, position))
        })
        .min_by_key(|(rank, candidate, position)| {
            (
                rank.tier,
                rank.identifier_index,
                Reverse(candidate.updated_at),
                *position,
            )
        })
        .map(|(rank, candidate, _)| (candidate, rank.via))
}

#[derive(Debug, Clone, Copy)]
struct Rank {
    tier: u8,
    identifier_index: usize,
    via: MatchedVia,
}

fn rank_title(title: &str, identifiers: &[String], page_title: &str) -> Option<Rank> {
    let title = title.trim().to_lowercase();

    let exact = identifiers
        .iter()
        .position(|id| title == discussion_title(id).to_lowercase());
    if let Some(index) = exact {
        return Some(Rank {
            tier: 0,
            identifier_index: index,
            via: exact_kind(index),
        });
    }

    let prefixed = identifiers
        .iter()
        .position(|id| title.contains(&discussion_title(id).to_lowercase()));
    if let Some(index) = prefixed {
        return Some(Rank {
            tier: 1,
            identifier_index: index,
            via: MatchedVia::Substring,
        });
    }

    if !page_title.is_empty() && title == page_title {
        return Some(Rank {
            tier: 2,
            identifier_index: 0,
            via: MatchedVia::PageTitle,
        });
    }

    identifiers
        .iter()
        .position(|id| title.contains(id.as_str()))
        .map(|index| Rank {
            tier: 3,
            identifier_index: index,
            via: MatchedVia::Substring,
        })
}

const fn exact_kind(identifier_index: usize) -> MatchedVia {
    if identifier_index == 0 {
        MatchedVia::Exact
    } else {
        MatchedVia::Alternate
    }
}
