//! The `YYYY-MM-DD-slug.md` filename convention.
//!
//! Site generators route posts by their filename. The loader parses the
//! convention when it is present but never requires it.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

static POST_STEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})-(.+)$").expect("valid post filename regex")
});

/// Date and slug encoded in a post filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFilename {
    /// Publication day from the `YYYY-MM-DD` prefix.
    pub date: NaiveDate,
    /// Remainder of the stem after the date.
    pub slug: String,
}

impl PostFilename {
    /// Parse the file stem of `path`.
    ///
    /// Returns `None` when the stem does not follow the convention or the
    /// date is not a real calendar day.
    ///
    /// ```rust
    /// use folio_content::PostFilename;
    ///
    /// let name = PostFilename::parse("_posts/2020-02-12-stream-windows.md").unwrap();
    /// assert_eq!(name.slug, "stream-windows");
    /// assert!(PostFilename::parse("about.md").is_none());
    /// ```
    pub fn parse(path: impl AsRef<Path>) -> Option<Self> {
        let stem = path.as_ref().file_stem()?.to_str()?;
        let caps = POST_STEM.captures(stem)?;
        let date = NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        )?;
        let slug = caps[4].to_string();
        Some(Self { date, slug })
    }
}

impl fmt::Display for PostFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format("%Y-%m-%d"), self.slug)
    }
}
