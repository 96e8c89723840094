//! YAML frontmatter extraction from content files.
//!
//! Frontmatter is the metadata block at the very start of a content file,
//! delimited by `---` lines:
//!
//! ```markdown
//! ---
//! title: Windowing in Stream Analytics
//! date: 2020-02-12 16:45:04 -0500
//! tags:
//!   - azure
//!   - streaming
//! ---
//!
//! ## Tumbling windows
//! ```
//!
//! Unlike a lenient markdown reader, a content file *must* carry a metadata
//! block: a missing or unterminated block is a [`MalformedMetadata`] error.
//!
//! # Usage
//!
//! ```rust
//! use folio_content::markdown::split_frontmatter;
//!
//! let content = "---\ntitle: Test\n---\n\nBody";
//! let fm = split_frontmatter(content).unwrap();
//!
//! assert_eq!(fm.get_str("title"), Some("Test"));
//! assert_eq!(fm.body(), "\nBody");
//! ```
//!
//! [`MalformedMetadata`]: folio_core::Error::MalformedMetadata

use folio_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_yaml::Value;

/// The marker line that opens and closes the metadata block.
pub const DELIMITER: &str = "---";

const BOM: char = '\u{feff}';

/// A split content file: the decoded metadata block and the verbatim body.
#[derive(Debug, Clone)]
pub struct Frontmatter<'a> {
    /// Parsed YAML metadata. `Null` for an empty block.
    value: Value,
    /// Raw YAML text between the delimiters.
    raw: &'a str,
    /// Everything after the closing delimiter line.
    body: &'a str,
}

impl<'a> Frontmatter<'a> {
    /// Get the parsed YAML value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Take ownership of the YAML value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Raw YAML text between the delimiters.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Get the body content (everything after the closing delimiter line).
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Deserialize the metadata into a specific type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use folio_content::markdown::split_frontmatter;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Meta {
    ///     title: String,
    /// }
    ///
    /// let fm = split_frontmatter("---\ntitle: Hello\n---\nBody").unwrap();
    /// let meta: Meta = fm.deserialize().unwrap();
    /// assert_eq!(meta.title, "Hello");
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml::from_value(self.value.clone())
            .map_err(|e| Error::malformed(format!("cannot decode metadata: {e}")))
    }

    /// Get a string field from the metadata.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.value.get(key)?.as_str()
    }

    /// Get a string list field from the metadata.
    ///
    /// Returns an empty vec if the field is missing or not a sequence.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.value
            .get(key)
            .and_then(|v| v.as_sequence())
            .map(|seq| {
                seq.iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Split one line (including its terminator) off the front of `text`.
///
/// Returns the line without its terminator and the remainder.
fn take_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(pos) => {
            let line = &text[..pos];
            (line.strip_suffix('\r').unwrap_or(line), &text[pos + 1..])
        }
        None => (text, ""),
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Split a content file into its metadata block and body.
///
/// The file must begin with a `---` line (a leading byte-order mark is
/// skipped). The block ends at the next line consisting solely of `---`;
/// everything after that line is the body, returned verbatim.
///
/// # Errors
///
/// Returns [`Error::MalformedMetadata`] when the opening delimiter is
/// missing, the closing delimiter is never found, or the block is not
/// valid YAML.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::split_frontmatter;
///
/// let fm = split_frontmatter("---\ntitle: Test\n---\n# Heading").unwrap();
/// assert_eq!(fm.get_str("title"), Some("Test"));
/// assert_eq!(fm.body(), "# Heading");
///
/// assert!(split_frontmatter("# Just Markdown").is_err());
/// assert!(split_frontmatter("---\ntitle: Test\n").is_err());
/// ```
pub fn split_frontmatter(content: &str) -> Result<Frontmatter<'_>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);

    let (first, after_opening) = take_line(content);
    if !is_delimiter(first) {
        return Err(Error::malformed(
            "content must begin with a '---' metadata delimiter line",
        ));
    }

    let mut rest = after_opening;
    let mut consumed = 0;
    loop {
        if rest.is_empty() {
            return Err(Error::malformed(
                "metadata block is not terminated by a closing '---' line",
            ));
        }
        let (line, next) = take_line(rest);
        if is_delimiter(line) {
            let raw = &after_opening[..consumed];
            let value = decode_yaml(raw)?;
            return Ok(Frontmatter {
                value,
                raw,
                body: next,
            });
        }
        consumed += rest.len() - next.len();
        rest = next;
    }
}

fn decode_yaml(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str::<Value>(raw).map_err(|e| {
        log::debug!("Failed to parse frontmatter YAML: {e}");
        Error::malformed(format!("metadata block is not valid YAML: {e}"))
    })
}

/// Strip frontmatter from content, returning only the body.
///
/// Content without a well-formed metadata block is returned unchanged.
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content)
        .map(|fm| fm.body())
        .unwrap_or(content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    // ------------------------------------------------------------------------
    // Basic extraction tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_split_valid_frontmatter() {
        let content = "---\ntitle: Test Document\nauthor: Someone\n---\n\n# Content";
        let fm = split_frontmatter(content).unwrap();

        assert_eq!(fm.get_str("title"), Some("Test Document"));
        assert_eq!(fm.get_str("author"), Some("Someone"));
        assert_eq!(fm.raw(), "title: Test Document\nauthor: Someone\n");
        assert_eq!(fm.body(), "\n# Content");
    }

    #[test]
    fn test_split_no_frontmatter() {
        let err = split_frontmatter("# Just Markdown\n\nNo frontmatter here.").unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
    }

    #[test]
    fn test_split_empty_frontmatter() {
        let fm = split_frontmatter("---\n---\nBody content").unwrap();
        assert!(fm.value().is_null());
        assert_eq!(fm.body(), "Body content");
    }

    #[test]
    fn test_split_no_closing() {
        let content = "---\ntitle: Incomplete\n\nNo closing delimiter";
        let err = split_frontmatter(content).unwrap_err();
        assert!(err.to_string().contains("not terminated"));
    }

    #[test]
    fn test_split_invalid_yaml() {
        let content = "---\n{{invalid: yaml: here}}\n---\n\nBody";
        let err = split_frontmatter(content).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
    }

    #[test]
    fn test_split_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.get_str("title"), Some("Windows"));
        assert_eq!(fm.body(), "Body\r\n");
    }

    #[test]
    fn test_split_skips_bom() {
        let content = "\u{feff}---\ntitle: Bom\n---\nBody";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.get_str("title"), Some("Bom"));
    }

    #[test]
    fn test_split_closing_delimiter_at_eof() {
        let fm = split_frontmatter("---\ntitle: Only\n---").unwrap();
        assert_eq!(fm.get_str("title"), Some("Only"));
        assert_eq!(fm.body(), "");
    }

    // ------------------------------------------------------------------------
    // Complex frontmatter tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_split_with_lists() {
        let content = "---\ntitle: Test\ntags:\n  - rust\n  - markdown\n---\n\nBody";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.get_string_list("tags"), vec!["rust", "markdown"]);
        assert!(fm.get_string_list("missing").is_empty());
    }

    #[test]
    fn test_split_with_nested() {
        let content = "---\nimage:\n  path: /assets/img/a.png\n---\n\nBody";
        let fm = split_frontmatter(content).unwrap();
        let path = fm
            .value()
            .get("image")
            .and_then(|m| m.get("path"))
            .and_then(|a| a.as_str());
        assert_eq!(path, Some("/assets/img/a.png"));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestFrontmatter {
        title: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_deserialize_frontmatter() {
        let content = "---\ntitle: My Doc\ntags:\n  - a\n  - b\n---\n\nBody";
        let fm = split_frontmatter(content).unwrap();
        let meta: TestFrontmatter = fm.deserialize().unwrap();
        assert_eq!(meta.title, "My Doc");
        assert_eq!(meta.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_deserialize_wrong_shape() {
        let fm = split_frontmatter("---\ntags: [a]\n---\n").unwrap();
        let result: Result<TestFrontmatter> = fm.deserialize();
        assert!(matches!(result, Err(Error::MalformedMetadata(_))));
    }

    // ------------------------------------------------------------------------
    // Edge cases
    // ------------------------------------------------------------------------

    #[test]
    fn test_dashes_in_body_are_preserved() {
        let content = "---\ntitle: Test\n---\n\nContent\n---\nwith a rule";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.body(), "\nContent\n---\nwith a rule");
    }

    #[test]
    fn test_indented_dashes_do_not_close() {
        let content = "---\ntitle: Test\n ---\n";
        assert!(split_frontmatter(content).is_err());
    }

    #[test]
    fn test_unicode_frontmatter() {
        let content = "---\ntitle: 音楽理論\n---\n\n本文";
        let fm = split_frontmatter(content).unwrap();
        assert_eq!(fm.get_str("title"), Some("音楽理論"));
        assert_eq!(fm.body().trim(), "本文");
    }

    #[test]
    fn test_empty_content() {
        assert!(split_frontmatter("").is_err());
    }

    #[test]
    fn test_only_opening_delimiter() {
        assert!(split_frontmatter("---").is_err());
    }

    #[test]
    fn test_strip_frontmatter() {
        assert_eq!(strip_frontmatter("---\ntitle: T\n---\n# H"), "# H");
        assert_eq!(strip_frontmatter("# Just content"), "# Just content");
    }
}
