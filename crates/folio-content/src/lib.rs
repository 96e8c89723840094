//! Content loading and validation for Folio.
//!
//! A content file is a YAML metadata block followed by a markdown body:
//!
//! ```markdown
//! ---
//! title: Windowing in Azure Stream Analytics
//! date: 2020-02-12 16:45:04 -0500
//! categories: [Azure, Stream Analytics]
//! tags: [azure, streaming]
//! ---
//!
//! Stream processing needs a notion of time.
//! ```
//!
//! This crate turns such files into [`Document`] records and checks them.
//!
//! # Modules
//!
//! - [`markdown`]: Frontmatter splitting and plain-text extraction
//! - [`document`]: The `Document` model, [`parse_document`], re-serialization
//! - [`timestamp`]: Metadata timestamp parsing and formatting
//! - [`validate`]: Body checks (code fences, footnotes)
//! - [`filename`]: The `YYYY-MM-DD-slug.md` convention
//! - [`order`]: Display ordering
//! - [`loader`]: Concurrent directory loading with per-file isolation
//!
//! # Example
//!
//! ```rust
//! use folio_content::{parse_document, validate_body};
//!
//! let raw = "---\ntitle: \"X\"\ndate: 2020-02-12 16:45:04 -0500\n---\nA claim.[^1]\n";
//! let doc = parse_document(raw).unwrap();
//! assert!(doc.categories.is_empty());
//!
//! let report = validate_body(&doc.body);
//! assert!(report.has_errors());
//! ```

pub mod document;
pub mod filename;
pub mod loader;
pub mod markdown;
pub mod order;
pub mod timestamp;
pub mod validate;

#[cfg(test)]
mod proptests;

pub use document::{parse_document, Document, Image, Seo};
pub use filename::PostFilename;
pub use loader::{BatchReport, Failure, LoadedDocument, Loader, LoaderOptions};
pub use markdown::{split_frontmatter, strip_frontmatter, Frontmatter};
pub use order::{compare_by_date, sort_by_date, Dated};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use validate::{
    validate_body, validate_body_with, Diagnostic, DiagnosticKind, Severity, ValidationOptions,
    ValidationReport,
};

// Re-export HeadingLevel for convenience
pub use pulldown_cmark::HeadingLevel;
