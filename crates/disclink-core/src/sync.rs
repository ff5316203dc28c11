//! Offline link synchronisation for markdown sources.
//!
//! Writes each page's discussion link into its markdown source, so the
//! published site carries the link even without the browser lookup. The
//! link lives between [`BLOCK_START`] and [`BLOCK_END`]; an existing block is
//! replaced in place, otherwise one is appended at the bottom of the file.
//!
//! The full discussion listing is fetched once, up front. If that fails the
//! sync stops before any file is read.

use crate::host::DiscussionHost;
use crate::lookup::listing::fetch_all;
use crate::lookup::matching::find_ranked;
use crate::page::PageIdentifierResolver;
use crate::render::{BLOCK_END, BLOCK_START, LinkRenderer};
use crate::types::DiscussionSummary;
use crate::{Error, Result};
use regex::{NoExpand, Regex};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Marker-delimited block, matched across lines.
///
/// SAFETY: Both markers are escaped constants, so the pattern is always valid.
#[allow(clippy::unwrap_used)]
static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?s){}.*?{}",
        regex::escape(BLOCK_START),
        regex::escape(BLOCK_END)
    ))
    .unwrap()
});

/// What happened to one markdown file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// A link block was appended.
    Added,
    /// An existing link block was replaced with different content.
    Updated,
    /// The file already had the right block.
    Unchanged,
    /// The file could not be read or written.
    Failed,
}

/// Per-file sync result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path of the markdown file.
    pub path: PathBuf,
    /// Identifier derived for the page.
    pub identifier: String,
    /// Outcome for the file.
    pub action: FileAction,
    /// Matched discussion URL, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_url: Option<String>,
    /// Matched discussion number, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_number: Option<u64>,
    /// Error message for failed files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a sync run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Whether files were left untouched.
    pub dry_run: bool,
    /// Number of discussions fetched from the host.
    pub discussions_fetched: usize,
    /// Every processed file, in path order.
    pub files: Vec<FileReport>,
}

impl SyncReport {
    /// Number of files processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Number of files whose content changed (or would change on a dry run).
    #[must_use]
    pub fn updated(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.action, FileAction::Added | FileAction::Updated))
            .count()
    }

    /// Number of files that already carried the right block.
    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(FileAction::Unchanged)
    }

    /// Number of files that could not be read or written.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(FileAction::Failed)
    }

    fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }
}

/// Synchronises discussion links into a directory of markdown files.
#[derive(Debug)]
pub struct LinkSyncer<'a, H: ?Sized> {
    host: &'a H,
    pages: PageIdentifierResolver,
    renderer: LinkRenderer,
    page_size: u32,
}

impl<'a, H: DiscussionHost + ?Sized> LinkSyncer<'a, H> {
    /// Create a syncer.
    pub const fn new(
        host: &'a H,
        pages: PageIdentifierResolver,
        renderer: LinkRenderer,
        page_size: u32,
    ) -> Self {
        Self {
            host,
            pages,
            renderer,
            page_size,
        }
    }

    /// Sync every markdown file under `docs_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `docs_dir` is not a directory, the host
    /// error if the listing cannot be fetched, and [`Error::Io`] if the
    /// directory cannot be walked. Per-file failures are reported in the
    /// result instead.
    #[instrument(skip(self))]
    pub async fn sync(&self, docs_dir: &Path, dry_run: bool) -> Result<SyncReport> {
        if !docs_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "docs directory {}",
                docs_dir.display()
            )));
        }

        let discussions = fetch_all(self.host, self.page_size).await?;
        info!("Fetched {} discussions", discussions.len());

        let files = find_markdown_files(docs_dir)?;
        debug!("Found {} markdown files", files.len());

        let reports = files
            .iter()
            .map(|path| self.sync_file(docs_dir, path, &discussions, dry_run))
            .collect();

        Ok(SyncReport {
            dry_run,
            discussions_fetched: discussions.len(),
            files: reports,
        })
    }

    fn sync_file(
        &self,
        docs_dir: &Path,
        path: &Path,
        discussions: &[DiscussionSummary],
        dry_run: bool,
    ) -> FileReport {
        let identifier_path = page_path(docs_dir, path);
        let mut report = FileReport {
            path: path.to_path_buf(),
            identifier: String::new(),
            action: FileAction::Failed,
            discussion_url: None,
            discussion_number: None,
            error: None,
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                report.error = Some(e.to_string());
                return report;
            },
        };

        let page = self.pages.resolve(&identifier_path, first_heading(&content));
        report.identifier.clone_from(&page.identifier);

        let link = match find_ranked(&page, discussions) {
            Some((found, via)) => {
                debug!("{} matched '{}' via {:?}", path.display(), found.title, via);
                report.discussion_url = Some(found.url.clone());
                report.discussion_number = found.number;
                self.renderer.existing(&found.url)
            },
            None => self.renderer.create_new(&page.identifier),
        };

        let (updated, action) = upsert_block(&content, &link.to_marked_block());
        if updated == content {
            report.action = FileAction::Unchanged;
            return report;
        }

        if !dry_run {
            if let Err(e) = fs::write(path, &updated) {
                warn!("Failed to write {}: {}", path.display(), e);
                report.error = Some(e.to_string());
                return report;
            }
        }
        info!("{:?} discussion link in {}", action, path.display());
        report.action = action;
        report
    }
}

/// Markdown files under `docs_dir`, sorted, skipping template files.
///
/// # Errors
///
/// Returns [`Error::Io`] if a directory cannot be read.
pub fn find_markdown_files(docs_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(docs_dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        let relative = path.strip_prefix(docs_dir).unwrap_or(path);
        if relative.to_string_lossy().to_lowercase().contains("template") {
            debug!("Skipping template {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Insert or replace the marker block.
///
/// Returns the new content and whether the block was added or replaced.
/// Appending trims trailing whitespace and leaves one blank line before the
/// block and a single newline after it.
#[must_use]
pub fn upsert_block(content: &str, block: &str) -> (String, FileAction) {
    if BLOCK_PATTERN.is_match(content) {
        (
            BLOCK_PATTERN.replace_all(content, NoExpand(block)).into_owned(),
            FileAction::Updated,
        )
    } else {
        (
            format!("{}\n\n{block}\n", content.trim_end()),
            FileAction::Added,
        )
    }
}

/// Page path for a markdown file: relative, `/`-separated, without `.md`.
fn page_path(docs_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(docs_dir).unwrap_or(path).with_extension("");
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Text of the first level-one heading, if any.
fn first_heading(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|title| !title.is_empty())
}
