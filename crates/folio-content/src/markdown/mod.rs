//! Markdown parsing and frontmatter extraction utilities.
//!
//! - [`frontmatter`]: splitting a content file into metadata and body
//! - [`parser`]: plain-text extraction (headings, paragraphs, word content)
//!
//! Both return generic values (`serde_yaml::Value`, `String`); the typed
//! [`Document`](crate::Document) model is built on top of them.

pub mod frontmatter;
pub mod parser;

pub use frontmatter::{split_frontmatter, strip_frontmatter, Frontmatter, DELIMITER};
pub use parser::{extract_first_heading, extract_first_paragraph, extract_text_content};
