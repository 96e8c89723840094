//! Markdown structure parsing utilities.
//!
//! Folio never renders markup; these helpers only pull plain text out of a
//! body using `pulldown-cmark`:
//!
//! - Extract the first heading (any level)
//! - Extract the first paragraph (used for excerpts)
//! - Strip formatting to get plain text (used for word counts)
//!
//! # Example
//!
//! ```rust
//! use folio_content::markdown::parser::{extract_first_heading, extract_first_paragraph};
//! use pulldown_cmark::HeadingLevel;
//!
//! let content = "# My Title\n\nThis is the first paragraph.\n\n## Section";
//!
//! let (level, title) = extract_first_heading(content).unwrap();
//! assert_eq!(level, HeadingLevel::H1);
//! assert_eq!(title, "My Title");
//!
//! let paragraph = extract_first_paragraph(content, 100).unwrap();
//! assert_eq!(paragraph, "This is the first paragraph.");
//! ```

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Parser with the extensions content files rely on.
pub(crate) fn parser(content: &str) -> Parser<'_> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    Parser::new_ext(content, options)
}

/// Extract the first heading from markdown content.
///
/// Returns the heading level and text content. Inline formatting (bold, italic,
/// links) is stripped from the heading text.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::extract_first_heading;
/// use pulldown_cmark::HeadingLevel;
///
/// let content = "Some text\n\n## Introduction\n\nMore text";
/// let (level, text) = extract_first_heading(content).unwrap();
/// assert_eq!(level, HeadingLevel::H2);
/// assert_eq!(text, "Introduction");
/// ```
pub fn extract_first_heading(content: &str) -> Option<(HeadingLevel, String)> {
    let mut in_heading = false;
    let mut heading_level = HeadingLevel::H1;
    let mut heading_text = String::new();

    for event in parser(content) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                heading_level = level;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if in_heading && !heading_text.trim().is_empty() {
                    return Some((heading_level, heading_text.trim().to_string()));
                }
                in_heading = false;
            }
            Event::Text(text) | Event::Code(text) if in_heading => {
                heading_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_heading => {
                heading_text.push(' ');
            }
            _ => {}
        }
    }

    None
}

/// Extract the first paragraph from markdown content.
///
/// Skips headings, blockquotes, and footnote definitions, and extracts the
/// first top-level paragraph. Inline formatting is stripped and footnote
/// markers are dropped. Content is truncated to `max_chars` characters,
/// at a word boundary, with `...` appended.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::extract_first_paragraph;
///
/// let content = "# Title\n\nThis is a **bold** introduction.\n\nMore content.";
/// let paragraph = extract_first_paragraph(content, 50).unwrap();
/// assert_eq!(paragraph, "This is a bold introduction.");
/// ```
pub fn extract_first_paragraph(content: &str, max_chars: usize) -> Option<String> {
    let mut in_paragraph = false;
    let mut paragraph_text = String::new();
    // Depth of containers whose paragraphs are not excerpt material.
    let mut skipped_depth = 0usize;

    for event in parser(content) {
        match event {
            Event::Start(Tag::BlockQuote(_) | Tag::FootnoteDefinition(_) | Tag::Item) => {
                skipped_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(_) | TagEnd::FootnoteDefinition | TagEnd::Item) => {
                skipped_depth = skipped_depth.saturating_sub(1);
            }

            Event::Start(Tag::Paragraph) if skipped_depth == 0 => {
                in_paragraph = true;
                paragraph_text.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let normalized = normalize_whitespace(&paragraph_text);
                if !normalized.is_empty() {
                    return Some(truncate_text(&normalized, max_chars));
                }
                in_paragraph = false;
            }

            Event::Text(text) | Event::Code(text) if in_paragraph => {
                paragraph_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_paragraph => {
                paragraph_text.push(' ');
            }

            _ => {}
        }
    }

    None
}

/// Extract plain text content from markdown, stripping all formatting.
///
/// Code blocks are skipped; inline code is kept.
///
/// # Example
///
/// ```rust
/// use folio_content::markdown::parser::extract_text_content;
///
/// let content = "# Title\n\nSome **bold** and *italic* text.\n\n```rust\ncode\n```";
/// let text = extract_text_content(content);
/// assert_eq!(text, "Title Some bold and italic text.");
/// ```
pub fn extract_text_content(content: &str) -> String {
    let mut text_content = String::new();
    let mut in_code_block = false;

    for event in parser(content) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Text(text) | Event::Code(text) if !in_code_block => {
                text_content.push_str(&text);
            }
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item) => {
                text_content.push(' ');
            }
            _ => {}
        }
    }

    normalize_whitespace(&text_content)
}

/// Truncate text to at most `max_chars` characters, adding "..." if truncated.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let truncate_at = text[..cut]
        .rfind(char::is_whitespace)
        .unwrap_or(cut);

    format!("{}...", text[..truncate_at].trim_end())
}

/// Normalize whitespace: collapse runs of whitespace into single spaces.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================
