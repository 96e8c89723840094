//! Error types for Folio operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Folio crates. Uses `thiserror` for derive macros.
//!
//! Document-level variants (`MalformedMetadata`, `MissingRequiredField`,
//! `InvalidTimestamp`, `InvalidField`, `BodyValidation`) describe why a single
//! content file was rejected. The remaining variants describe failures of the
//! surrounding machinery (files, configuration, tasks).

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in Folio operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific file or directory.
    #[error("I/O error at {}: {source}", path.display())]
    IoPath {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The metadata block is missing, unterminated, or not decodable.
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    /// A required metadata field is absent.
    #[error("Missing required field: {field}")]
    MissingRequiredField {
        /// Name of the missing field.
        field: String,
    },

    /// A timestamp field could not be parsed.
    #[error("Invalid timestamp in '{field}': {value:?} ({reason})")]
    InvalidTimestamp {
        /// Dotted name of the field, e.g. `seo.date_modified`.
        field: String,
        /// The raw value found in the metadata block.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A metadata field is present but violates a content rule.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// Dotted name of the field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The body has validation errors and the loader runs in strict mode.
    #[error("Body validation failed with {count} error(s)")]
    BodyValidation {
        /// Number of error-severity diagnostics.
        count: usize,
    },

    /// A background task panicked or was cancelled.
    #[error("Task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create an I/O error without path context.
    pub fn io(err: std::io::Error) -> Self {
        Self::Io(err)
    }

    /// Create an I/O error with the path that caused it.
    pub fn io_with_path(err: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoPath {
            path: path.as_ref().to_path_buf(),
            source: err,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a malformed metadata error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMetadata(msg.into())
    }

    /// Create a missing required field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Create an invalid timestamp error.
    pub fn invalid_timestamp(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidTimestamp {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a task failure error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    /// Returns whether this error describes a problem with a document's
    /// content rather than with the environment it was loaded from.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedMetadata(_)
                | Self::MissingRequiredField { .. }
                | Self::InvalidTimestamp { .. }
                | Self::InvalidField { .. }
                | Self::BodyValidation { .. }
        )
    }

    /// Short stable name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::IoPath { .. } => "io",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not-found",
            Self::Serialization(_) => "serialization",
            Self::MalformedMetadata(_) => "malformed-metadata",
            Self::MissingRequiredField { .. } => "missing-required-field",
            Self::InvalidTimestamp { .. } => "invalid-timestamp",
            Self::InvalidField { .. } => "invalid-field",
            Self::BodyValidation { .. } => "body-validation",
            Self::Task(_) => "task",
        }
    }
}

/// Result type alias using Folio's Error type.
pub type Result<T> = std::result::Result<T, Error>;
