//! Async file utilities for content discovery.
//!
//! Directory walking runs on the blocking pool via `walkdir`; reads use
//! `tokio::fs`. Results are returned in a deterministic order (sorted by
//! relative path) so that reports are stable between runs.

use std::path::{Path, PathBuf};

use tokio::fs;
use walkdir::{DirEntry, WalkDir};

use crate::{Error, Result};

/// Options for discovering content files.
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// File extensions to match (without dot). Empty matches every file.
    pub extensions: Vec<String>,
    /// Maximum directory depth to search (None = unlimited)
    pub max_depth: Option<usize>,
    /// Whether to descend into dot-directories and include dot-files.
    pub include_hidden: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

impl FindOptions {
    /// Create options for finding markdown files (`.md`, `.markdown`).
    pub fn markdown() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string()],
            max_depth: None,
            include_hidden: false,
        }
    }

    /// Replace the matched extensions.
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Set maximum search depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Check whether a path's extension is one we are looking for.
    pub fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|wanted| *wanted == ext)
            })
            .unwrap_or(false)
    }
}

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Full path to the file.
    pub path: PathBuf,
    /// File stem (filename without extension).
    pub stem: String,
    /// Path relative to the search base.
    pub relative_path: PathBuf,
}

impl FileInfo {
    /// Build file info for `path` relative to `base_path`.
    pub fn new(base_path: &Path, path: &Path) -> Self {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        let relative_path = path.strip_prefix(base_path).unwrap_or(path).to_path_buf();

        Self {
            path: path.to_path_buf(),
            stem,
            relative_path,
        }
    }

    /// Identifier for reports: the relative path with `/` separators.
    pub fn id(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn walk(base_path: &Path, options: &FindOptions) -> Result<Vec<FileInfo>> {
    let mut walker = WalkDir::new(base_path).follow_links(true);
    if let Some(max_depth) = options.max_depth {
        walker = walker.max_depth(max_depth);
    }

    let mut files = Vec::new();
    let entries = walker
        .into_iter()
        .filter_entry(|e| options.include_hidden || !is_hidden(e));

    for entry in entries {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf);
            let io = std::io::Error::from(e);
            match path {
                Some(p) => Error::io_with_path(io, p),
                None => Error::io(io),
            }
        })?;

        if !entry.file_type().is_file() || !options.matches_extension(entry.path()) {
            continue;
        }

        files.push(FileInfo::new(base_path, entry.path()));
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

/// Find all files matching criteria in a directory.
///
/// # Example
///
/// ```no_run
/// # use folio_core::util::files::{find_all_files, FindOptions};
/// # use std::path::Path;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let files = find_all_files(Path::new("_posts"), FindOptions::markdown()).await?;
/// for file in &files {
///     println!("{}", file.id());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn find_all_files(base_path: &Path, options: FindOptions) -> Result<Vec<FileInfo>> {
    let metadata = fs::metadata(base_path)
        .await
        .map_err(|e| Error::io_with_path(e, base_path))?;
    if !metadata.is_dir() {
        return Err(Error::not_found(format!(
            "{} is not a directory",
            base_path.display()
        )));
    }

    let base = base_path.to_path_buf();
    let files = tokio::task::spawn_blocking(move || walk(&base, &options))
        .await
        .map_err(|e| Error::task(format!("directory walk: {e}")))??;

    log::debug!(
        "Discovered {} content file(s) under {}",
        files.len(),
        base_path.display()
    );
    Ok(files)
}

/// Read a file's contents as a string.
pub async fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))
}
