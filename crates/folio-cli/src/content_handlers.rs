//! Handler functions for the content commands: `check`, `list`, and `show`.

use std::io::Write;
use std::path::Path;

use folio_content::{LoadedDocument, Loader, LoaderOptions};
use folio_core::{Error, Result};
use serde::Serialize;

use crate::app::Outcome;

// ============================================================================
// check
// ============================================================================

/// Load `dir` and report every failure and diagnostic.
///
/// Fails the run when any file was excluded from the batch.
pub async fn handle_check(
    options: LoaderOptions,
    dir: &Path,
    out: &mut impl Write,
) -> Result<Outcome> {
    let report = Loader::new(options).load_dir(dir).await?;

    for failure in &report.failures {
        writeln!(out, "FAIL {}: {}", failure.id, failure.error)?;
    }
    for doc in &report.documents {
        for diagnostic in &doc.report.diagnostics {
            writeln!(out, "{}: {diagnostic}", doc.id)?;
        }
    }

    writeln!(
        out,
        "checked {} file(s): {} loaded, {} failed, {} error(s), {} warning(s)",
        report.total(),
        report.documents.len(),
        report.failures.len(),
        report.error_count(),
        report.warning_count()
    )?;

    if report.is_success() {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::Failed)
    }
}

// ============================================================================
// list
// ============================================================================

/// Filters for [`handle_list`]. Both must match when both are set.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Keep documents carrying this tag.
    pub tag: Option<String>,
    /// Keep documents filed under this category.
    pub category: Option<String>,
}

impl ListFilter {
    fn matches(&self, doc: &LoadedDocument) -> bool {
        let tag_ok = self
            .tag
            .as_deref()
            .is_none_or(|tag| doc.document.has_tag(tag));
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| doc.document.in_category(category));
        tag_ok && category_ok
    }
}

/// Print loaded documents newest first: date, identifier, title.
///
/// Files that fail to load are logged and left out of the listing.
pub async fn handle_list(
    options: LoaderOptions,
    dir: &Path,
    filter: &ListFilter,
    out: &mut impl Write,
) -> Result<Outcome> {
    let report = Loader::new(options).load_dir(dir).await?;

    for failure in &report.failures {
        tracing::warn!("Skipping {}: {}", failure.id, failure.error);
    }

    for doc in report.documents.iter().filter(|d| filter.matches(d)) {
        writeln!(
            out,
            "{}  {}  {}",
            doc.document.date.format("%Y-%m-%d"),
            doc.id,
            doc.document.title
        )?;
    }
    Ok(Outcome::Success)
}

// ============================================================================
// show
// ============================================================================

#[derive(Serialize)]
struct DocumentView<'a> {
    #[serde(flatten)]
    loaded: &'a LoadedDocument,
    slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    word_count: usize,
}

impl<'a> DocumentView<'a> {
    fn new(loaded: &'a LoadedDocument) -> Self {
        Self {
            loaded,
            slug: loaded.slug(),
            description: loaded.document.description(),
            word_count: loaded.document.word_count(),
        }
    }
}

/// Print one document, with its diagnostics, as pretty JSON.
pub async fn handle_show(
    options: LoaderOptions,
    file: &Path,
    out: &mut impl Write,
) -> Result<Outcome> {
    let root = file.parent().unwrap_or_else(|| Path::new("."));
    let loaded = Loader::new(options).load_file(root, file).await?;

    serde_json::to_writer_pretty(&mut *out, &DocumentView::new(&loaded))
        .map_err(|e| Error::serialization(e.to_string()))?;
    writeln!(out)?;
    Ok(Outcome::Success)
}

// ============================================================================
// Tests
// ============================================================================
