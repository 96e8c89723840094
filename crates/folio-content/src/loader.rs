//! Concurrent batch loading of a content directory.
//!
//! [`Loader::load_dir`] discovers content files, then reads, parses, and
//! validates each one on its own tokio task. Documents are independent, so a
//! bad file never aborts the batch: it is excluded from the result and
//! reported as a [`Failure`] next to the documents that did load.
//!
//! ```no_run
//! # async fn example() -> folio_core::Result<()> {
//! use folio_content::{Loader, LoaderOptions};
//!
//! let loader = Loader::new(LoaderOptions::default().with_strict(true));
//! let report = loader.load_dir("_posts").await?;
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.id, failure.error);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use folio_core::util::files::{find_all_files, read_file, FileInfo, FindOptions};
use folio_core::{normalize_id, Error, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::document::{parse_document, Document};
use crate::filename::PostFilename;
use crate::order::{sort_by_date, Dated};
use crate::validate::{
    validate_body_with, Diagnostic, DiagnosticKind, ValidationOptions, ValidationReport,
};

/// Settings for a [`Loader`].
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// File extensions treated as content (without the dot).
    pub extensions: Vec<String>,
    /// Maximum number of files processed at once.
    pub concurrency: usize,
    /// Reject documents whose body report contains errors.
    pub strict: bool,
    /// Which body checks to run.
    pub validation: ValidationOptions,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            extensions: FindOptions::markdown().extensions,
            concurrency: default_concurrency(),
            strict: false,
            validation: ValidationOptions::default(),
        }
    }
}

impl LoaderOptions {
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = FindOptions::markdown().with_extensions(extensions).extensions;
        self
    }

    /// Set the concurrency limit. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }
}

/// Number of available CPUs, at least one.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A document that loaded, with where it came from and its body report.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedDocument {
    /// Path relative to the content root, `/`-separated.
    pub id: String,
    pub path: PathBuf,
    /// Date and slug from the filename, when it follows the convention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<PostFilename>,
    pub document: Document,
    /// Body diagnostics. Line numbers are relative to the whole file.
    pub report: ValidationReport,
}

impl LoadedDocument {
    /// Slug from the filename if present, otherwise from the title.
    pub fn slug(&self) -> String {
        match &self.filename {
            Some(name) => name.slug.clone(),
            None => self.document.slug(),
        }
    }
}

impl Dated for LoadedDocument {
    fn date(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.document.date
    }

    fn sort_key(&self) -> &str {
        &self.id
    }
}

/// A file that could not be turned into a document.
#[derive(Debug)]
pub struct Failure {
    /// Identifier of the file relative to the content root.
    pub id: String,
    /// Path the file was read from.
    pub path: PathBuf,
    /// Why the file was excluded.
    pub error: Error,
}

/// Outcome of loading a directory.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Loaded documents, newest first.
    pub documents: Vec<LoadedDocument>,
    /// Excluded files, ordered by identifier.
    pub failures: Vec<Failure>,
}

impl BatchReport {
    /// Whether every discovered file loaded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of files examined.
    pub fn total(&self) -> usize {
        self.documents.len() + self.failures.len()
    }

    pub fn warning_count(&self) -> usize {
        self.documents.iter().map(|d| d.report.warnings().count()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.documents.iter().map(|d| d.report.error_count()).sum()
    }

    pub fn get(&self, id: &str) -> Option<&LoadedDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Documents carrying `tag`, in display order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a LoadedDocument> + 'a {
        self.documents.iter().filter(move |d| d.document.has_tag(tag))
    }

    /// Documents in `category`, in display order.
    pub fn in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a LoadedDocument> + 'a {
        self.documents
            .iter()
            .filter(move |d| d.document.in_category(category))
    }

    /// Every tag with the number of documents carrying it, by normalized id.
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for doc in &self.documents {
            for tag in &doc.document.tags {
                let id = normalize_id(tag);
                match counts.iter_mut().find(|(t, _)| *t == id) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((id, 1)),
                }
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

/// Loads content files into documents.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: Arc<LoaderOptions>,
}

impl Loader {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load every content file under `root`.
    ///
    /// # Errors
    ///
    /// Only fails when `root` itself cannot be walked. Problems with
    /// individual files are reported in [`BatchReport::failures`].
    pub async fn load_dir(&self, root: impl AsRef<Path>) -> Result<BatchReport> {
        let root = root.as_ref();
        let find = FindOptions::markdown().with_extensions(&self.options.extensions);
        let files = find_all_files(root, find).await?;

        log::info!(
            "Loading {} content file(s) from {} (concurrency {})",
            files.len(),
            root.display(),
            self.options.concurrency
        );

        let results: Vec<(FileInfo, Result<LoadedDocument>)> = stream::iter(files)
            .map(|info| {
                let options = Arc::clone(&self.options);
                async move {
                    let task_info = info.clone();
                    let joined =
                        tokio::spawn(async move { load_one(&task_info, &options).await }).await;
                    let result = joined.unwrap_or_else(|e| {
                        Err(Error::task(format!("loading {}: {e}", info.id())))
                    });
                    (info, result)
                }
            })
            .buffer_unordered(self.options.concurrency.max(1))
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (info, result) in results {
            match result {
                Ok(doc) => report.documents.push(doc),
                Err(error) => {
                    log::warn!("Excluding {}: {error}", info.id());
                    report.failures.push(Failure {
                        id: info.id(),
                        path: info.path,
                        error,
                    });
                }
            }
        }

        sort_by_date(&mut report.documents);
        report.failures.sort_by(|a, b| a.id.cmp(&b.id));

        log::info!(
            "Loaded {} document(s), excluded {}",
            report.documents.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Load a single file. Its identifier is relative to `root`.
    pub async fn load_file(
        &self,
        root: impl AsRef<Path>,
        path: impl AsRef<Path>,
    ) -> Result<LoadedDocument> {
        let info = FileInfo::new(root.as_ref(), path.as_ref());
        load_one(&info, &self.options).await
    }

    /// Parse and validate already-read text, applying the same rules as for
    /// files on disk.
    pub fn load_str(&self, id: &str, raw: &str) -> Result<LoadedDocument> {
        process(id, PathBuf::from(id), raw, &self.options)
    }
}

async fn load_one(info: &FileInfo, options: &LoaderOptions) -> Result<LoadedDocument> {
    let raw = read_file(&info.path).await?;
    process(&info.id(), info.path.clone(), &raw, options)
}

fn process(id: &str, path: PathBuf, raw: &str, options: &LoaderOptions) -> Result<LoadedDocument> {
    let document = parse_document(raw)?;

    let mut report = validate_body_with(&document.body, &options.validation);
    report.offset_lines(header_lines(raw, &document.body));

    let filename = PostFilename::parse(&path);
    if let Some(name) = &filename {
        let published = document.date.date_naive();
        if name.date != published {
            report.push(Diagnostic::new(
                DiagnosticKind::FilenameDateMismatch,
                1,
                format!(
                    "filename date {} differs from metadata date {published}",
                    name.date
                ),
            ));
        }
    }

    if options.strict && report.has_errors() {
        return Err(Error::BodyValidation {
            count: report.error_count(),
        });
    }

    log::debug!(
        "Loaded {id}: {:?} ({} diagnostic(s))",
        document.title,
        report.diagnostics.len()
    );

    Ok(LoadedDocument {
        id: id.to_string(),
        path,
        filename,
        document,
        report,
    })
}

/// Number of lines before the body starts.
fn header_lines(raw: &str, body: &str) -> usize {
    let header = &raw[..raw.len().saturating_sub(body.len())];
    header.matches('\n').count()
}
