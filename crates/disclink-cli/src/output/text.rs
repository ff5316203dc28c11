//! Human-readable text output.

use chrono::{DateTime, Utc};
use colored::Colorize;
use disclink_core::{
    CacheEntry, FileAction, Origin, Outcome, PageContext, RenderedLink, Resolution, SyncReport,
    discussion_title,
};
use std::fmt::Write as _;
use std::path::Path;

use crate::commands::CacheStatus;

/// Text for one resolution.
pub fn format_resolution(resolution: &Resolution, link: &RenderedLink) -> String {
    let mut out = String::new();
    let status = match &resolution.outcome {
        Outcome::Existing { .. } => "discussion".green().bold(),
        Outcome::NoDiscussion => "no discussion yet".yellow().bold(),
        Outcome::RateLimited => "rate limited".red().bold(),
    };
    let _ = writeln!(out, "{}  {}", resolution.page.identifier.bold(), status);
    let _ = writeln!(out, "  {}", link.href);

    if let Some(title) = &link.discussion_title {
        let _ = writeln!(out, "  {} {}", "title:".dimmed(), title);
    }
    if let Some(found) = &resolution.matched {
        let _ = writeln!(
            out,
            "  {} {} via {:?} ({})",
            "matched:".dimmed(),
            found.title,
            found.matched_via,
            found.source
        );
    }
    if resolution.origin == Origin::Cache {
        let _ = writeln!(out, "  {}", "(from cache)".dimmed());
    }
    if let Some(note) = &link.note {
        let _ = writeln!(out, "  {}", note.dimmed());
    }
    out
}

/// Text for the `--content` result of a resolution.
pub fn format_content_update(path: &Path, updated: bool) -> String {
    let state = if updated {
        "link appended".green()
    } else {
        "already linked".dimmed()
    };
    format!("  {} {} ({})\n", "content:".dimmed(), path.display(), state)
}

/// Text for an identified page.
pub fn format_page(page: &PageContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "identifier:".bold(), page.identifier);
    if !page.alternate_identifiers.is_empty() {
        let _ = writeln!(
            out,
            "{} {}",
            "alternates:".bold(),
            page.alternate_identifiers.join(", ")
        );
    }
    let _ = writeln!(out, "{} {}", "title:".bold(), page.title);
    let _ = writeln!(out, "{} {}", "path:".bold(), page.path);
    let _ = writeln!(
        out,
        "{} {}",
        "new discussion:".bold(),
        discussion_title(&page.identifier)
    );
    out
}

/// Text for the cache listing.
pub fn format_entries(entries: &[CacheEntry]) -> String {
    if entries.is_empty() {
        return "No cached discussions\n".to_string();
    }

    let width = entries
        .iter()
        .map(|e| e.identifier.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in entries {
        let target = entry
            .url
            .as_deref()
            .map_or_else(|| "no discussion".yellow().to_string(), ToString::to_string);
        let _ = writeln!(
            out,
            "{:<width$}  {}  {}",
            entry.identifier,
            target,
            format_time(entry.written_at).dimmed()
        );
    }
    out
}

/// Text for the cache status.
pub fn format_status(status: &CacheStatus) -> String {
    let state = if status.expired {
        "expired".yellow()
    } else {
        "fresh".green()
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "cache:".bold(), status.path.display());
    let _ = writeln!(out, "{} {}", "entries:".bold(), status.entries);
    let _ = writeln!(
        out,
        "{} {} ({})",
        "generation:".bold(),
        format_time(status.generation),
        state
    );
    let _ = writeln!(out, "{} {}h", "ttl:".bold(), status.ttl_hours);
    out
}

/// Text for a sync run.
pub fn format_sync_report(report: &SyncReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        let action = match file.action {
            FileAction::Added => "added".green(),
            FileAction::Updated => "updated".cyan(),
            FileAction::Unchanged => "unchanged".dimmed(),
            FileAction::Failed => "failed".red(),
        };
        let _ = write!(out, "{action:>9}  {}", file.path.display());
        if let Some(url) = &file.discussion_url {
            let _ = write!(out, "  {}", url.dimmed());
        }
        if let Some(error) = &file.error {
            let _ = write!(out, "  {}", error.red());
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "\nProcessed {} files against {} discussions: {} updated, {} unchanged",
        report.total(),
        report.discussions_fetched,
        report.updated(),
        report.unchanged(),
    );
    if report.failed() > 0 {
        let _ = write!(out, ", {}", format!("{} failed", report.failed()).red());
    }
    if report.dry_run {
        out.push_str(" (dry run)");
    }
    out.push('\n');
    out
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}
