//! The parsed content document.
//!
//! A [`Document`] is the structured form of one content file: the decoded
//! metadata block plus the verbatim body. [`parse_document`] is the only way
//! raw text becomes a `Document`; every metadata rule is enforced there, so a
//! `Document` obtained from it is always valid.
//!
//! Metadata keys this module does not model are kept in `extra` mappings,
//! which lets [`Document::to_frontmatter`] reproduce the full key set.

use chrono::{DateTime, FixedOffset};
use folio_core::{normalize_id, slugify, Error, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::markdown::frontmatter::{split_frontmatter, DELIMITER};
use crate::markdown::parser::{extract_first_paragraph, extract_text_content};
use crate::timestamp::{format_timestamp, parse_timestamp};

/// Default excerpt length used when `seo.description` is absent.
pub const DEFAULT_EXCERPT_CHARS: usize = 160;

/// A parsed content file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Human-readable headline.
    pub title: String,
    /// Publication date with its original offset.
    pub date: DateTime<FixedOffset>,
    /// Hierarchical grouping labels, outermost first.
    pub categories: Vec<String>,
    /// Flat labels, deduplicated in first-seen order.
    pub tags: Vec<String>,
    /// Preview image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// Auxiliary search-engine metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<Seo>,
    /// Top-level metadata keys not modelled above, in file order.
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub extra: Mapping,
    /// Everything after the metadata block, unparsed.
    pub body: String,
}

/// The `image` metadata structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Image {
    /// Relative location of the image resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Other keys (`alt`, `lqip`, ...).
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub extra: Mapping,
}

/// The `seo` metadata structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Seo {
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<FixedOffset>>,
    /// Page description for search engines and feeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Other keys.
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub extra: Mapping,
}

impl Document {
    /// Create a document with the required fields and no optional metadata.
    pub fn new(
        title: impl Into<String>,
        date: DateTime<FixedOffset>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            date,
            categories: Vec::new(),
            tags: Vec::new(),
            image: None,
            seo: None,
            extra: Mapping::new(),
            body: body.into(),
        }
    }

    /// URL slug derived from the title.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// First paragraph of the body as plain text, cut to `max_chars`.
    pub fn excerpt(&self, max_chars: usize) -> Option<String> {
        extract_first_paragraph(&self.body, max_chars)
    }

    /// `seo.description` if set, otherwise an excerpt of the body.
    pub fn description(&self) -> Option<String> {
        self.seo
            .as_ref()
            .and_then(|seo| seo.description.clone())
            .or_else(|| self.excerpt(DEFAULT_EXCERPT_CHARS))
    }

    /// Number of words in the body's prose, excluding code blocks.
    pub fn word_count(&self) -> usize {
        extract_text_content(&self.body).split_whitespace().count()
    }

    /// Whether the document carries `tag`, compared by normalized id.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = normalize_id(tag);
        self.tags.iter().any(|t| normalize_id(t) == wanted)
    }

    /// Whether `category` appears anywhere in the category path.
    pub fn in_category(&self, category: &str) -> bool {
        let wanted = normalize_id(category);
        self.categories.iter().any(|c| normalize_id(c) == wanted)
    }

    /// Build the metadata block as an ordered YAML mapping.
    ///
    /// Required keys come first, then optional ones, then extras in their
    /// original order. Empty label lists are omitted.
    pub fn metadata(&self) -> Mapping {
        let mut map = Mapping::new();
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert("date".into(), Value::String(format_timestamp(&self.date)));
        if !self.categories.is_empty() {
            map.insert("categories".into(), string_sequence(&self.categories));
        }
        if !self.tags.is_empty() {
            map.insert("tags".into(), string_sequence(&self.tags));
        }
        if let Some(image) = &self.image {
            let mut m = Mapping::new();
            if let Some(path) = &image.path {
                m.insert("path".into(), Value::String(path.clone()));
            }
            m.extend(image.extra.clone());
            map.insert("image".into(), Value::Mapping(m));
        }
        if let Some(seo) = &self.seo {
            let mut m = Mapping::new();
            if let Some(modified) = &seo.date_modified {
                m.insert("date_modified".into(), Value::String(format_timestamp(modified)));
            }
            if let Some(description) = &seo.description {
                m.insert("description".into(), Value::String(description.clone()));
            }
            m.extend(seo.extra.clone());
            map.insert("seo".into(), Value::Mapping(m));
        }
        map.extend(self.extra.clone());
        map
    }

    /// Serialize the metadata block, including both delimiter lines.
    ///
    /// Parsing the result again yields an equivalent key/value set.
    pub fn to_frontmatter(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.metadata())
            .map_err(|e| Error::serialization(format!("cannot encode metadata: {e}")))?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
    }

    /// Serialize the whole content file: metadata block followed by the body.
    pub fn render(&self) -> Result<String> {
        let mut out = self.to_frontmatter()?;
        out.push_str(&self.body);
        Ok(out)
    }
}

fn string_sequence(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}

/// Parse the full text of one content file into a [`Document`].
///
/// The body is stored verbatim; it is not rendered or validated here (see
/// [`validate_body`](crate::validate::validate_body)).
///
/// # Errors
///
/// - [`Error::MalformedMetadata`]: the metadata block is missing,
///   unterminated, not valid YAML, not a mapping, or a field has the wrong
///   shape.
/// - [`Error::MissingRequiredField`]: `title` or `date` is absent, or the
///   title is empty.
/// - [`Error::InvalidTimestamp`]: `date` or `seo.date_modified` does not
///   parse.
/// - [`Error::InvalidField`]: an image path or label breaks a content rule.
///
/// # Example
///
/// ```rust
/// use folio_content::parse_document;
///
/// let doc = parse_document("---\ntitle: \"X\"\ndate: 2020-02-12 16:45:04 -0500\n---\nBody\n").unwrap();
/// assert_eq!(doc.title, "X");
/// assert!(doc.categories.is_empty());
/// assert_eq!(doc.body, "Body\n");
/// ```
pub fn parse_document(raw: &str) -> Result<Document> {
    let fm = split_frontmatter(raw)?;
    let body = fm.body().to_string();

    let mut map = match fm.into_value() {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        other => {
            return Err(Error::malformed(format!(
                "metadata block must be a mapping, found {}",
                shape(&other)
            )));
        }
    };

    let title = take_title(&mut map)?;
    let date = take_date(&mut map)?;
    let categories = take_labels(&mut map, "categories")?;
    let tags = dedup(take_labels(&mut map, "tags")?);
    let image = take_image(&mut map)?;
    let seo = take_seo(&mut map)?;

    Ok(Document {
        title,
        date,
        categories,
        tags,
        image,
        seo,
        extra: map,
        body,
    })
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Render a scalar as text. Sequences and mappings yield `None`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn wrong_shape(field: &str, expected: &str, found: &Value) -> Error {
    Error::malformed(format!(
        "'{field}' must be {expected}, found {}",
        shape(found)
    ))
}

fn take_title(map: &mut Mapping) -> Result<String> {
    let value = match map.shift_remove("title") {
        None | Some(Value::Null) => return Err(Error::missing_field("title")),
        Some(value) => value,
    };
    let title = scalar_text(&value).ok_or_else(|| wrong_shape("title", "a string", &value))?;
    if title.trim().is_empty() {
        return Err(Error::missing_field("title"));
    }
    Ok(title)
}

fn take_date(map: &mut Mapping) -> Result<DateTime<FixedOffset>> {
    match map.shift_remove("date") {
        None | Some(Value::Null) => Err(Error::missing_field("date")),
        Some(value) => timestamp_value("date", &value),
    }
}

fn timestamp_value(field: &str, value: &Value) -> Result<DateTime<FixedOffset>> {
    let text = scalar_text(value).ok_or_else(|| wrong_shape(field, "a timestamp", value))?;
    parse_timestamp(field, &text)
}

fn take_labels(map: &mut Mapping, field: &str) -> Result<Vec<String>> {
    let labels = match map.shift_remove(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                scalar_text(item)
                    .ok_or_else(|| wrong_shape(&format!("{field}[{i}]"), "a string", item))
            })
            .collect::<Result<Vec<_>>>()?,
        Some(value) => {
            let text = scalar_text(&value)
                .ok_or_else(|| wrong_shape(field, "a sequence of strings", &value))?;
            text.split_whitespace().map(String::from).collect()
        }
    };

    labels
        .into_iter()
        .map(|label| check_label(field, label))
        .collect()
}

fn check_label(field: &str, label: String) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::invalid_field(field, "labels must not be empty"));
    }
    if label.contains(',') {
        return Err(Error::invalid_field(
            field,
            format!("label {label:?} contains a ',' delimiter"),
        ));
    }
    if label.contains(['\n', '\r']) {
        return Err(Error::invalid_field(
            field,
            format!("label {label:?} contains a line break"),
        ));
    }
    Ok(label.to_string())
}

fn dedup(labels: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(labels.len());
    for label in labels {
        if !seen.contains(&label) {
            seen.push(label);
        }
    }
    seen
}

fn take_mapping(map: &mut Mapping, field: &str) -> Result<Option<Mapping>> {
    match map.shift_remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(m)) => Ok(Some(m)),
        Some(other) => Err(wrong_shape(field, "a mapping", &other)),
    }
}

fn take_image(map: &mut Mapping) -> Result<Option<Image>> {
    // A bare string is shorthand for `image: { path: ... }`.
    if let Some(Value::String(path)) = map.get("image") {
        let path = check_image_path(path.clone())?;
        map.shift_remove("image");
        return Ok(Some(Image {
            path: Some(path),
            extra: Mapping::new(),
        }));
    }

    let Some(mut m) = take_mapping(map, "image")? else {
        return Ok(None);
    };
    let path = match m.shift_remove("path") {
        None | Some(Value::Null) => None,
        Some(Value::String(path)) => Some(check_image_path(path)?),
        Some(other) => return Err(wrong_shape("image.path", "a string", &other)),
    };
    Ok(Some(Image { path, extra: m }))
}

fn check_image_path(path: String) -> Result<String> {
    if path.trim().is_empty() {
        return Err(Error::invalid_field("image.path", "path must not be empty"));
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(Error::invalid_field(
            "image.path",
            format!("{path:?} must be a relative path"),
        ));
    }
    if path.contains("://") {
        return Err(Error::invalid_field(
            "image.path",
            format!("{path:?} must be a relative path, not a URL"),
        ));
    }
    Ok(path)
}

fn take_seo(map: &mut Mapping) -> Result<Option<Seo>> {
    let Some(mut m) = take_mapping(map, "seo")? else {
        return Ok(None);
    };
    let date_modified = match m.shift_remove("date_modified") {
        None | Some(Value::Null) => None,
        Some(value) => Some(timestamp_value("seo.date_modified", &value)?),
    };
    let description = match m.shift_remove("description") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            scalar_text(&value)
                .ok_or_else(|| wrong_shape("seo.description", "a string", &value))?,
        ),
    };
    Ok(Some(Seo {
        date_modified,
        description,
        extra: m,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM_POST: &str = "---
title: Windowing in Azure Stream Analytics
date: 2020-02-12 16:45:04 -0500
categories: [Azure, Stream Analytics]
tags: [azure, streaming, windows, azure]
image:
  path: assets/img/windows.png
  alt: Tumbling windows
seo:
  date_modified: 2020-03-01 10:00:00 -0500
  description: How the four window kinds group events.
layout: post
---

Stream processing needs a notion of *time*.[^1]

[^1]: Event time, to be precise.
";

    fn doc(meta: &str) -> Result<Document> {
        parse_document(&format!("---\n{meta}---\nBody\n"))
    }

    // ------------------------------------------------------------------------
    // Successful parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_full_document() {
        let d = parse_document(STREAM_POST).unwrap();

        assert_eq!(d.title, "Windowing in Azure Stream Analytics");
        assert_eq!(format_timestamp(&d.date), "2020-02-12 16:45:04 -0500");
        assert_eq!(d.categories, vec!["Azure", "Stream Analytics"]);
        assert_eq!(d.tags, vec!["azure", "streaming", "windows"]);

        let image = d.image.as_ref().unwrap();
        assert_eq!(image.path.as_deref(), Some("assets/img/windows.png"));
        assert_eq!(
            image.extra.get("alt").and_then(Value::as_str),
            Some("Tumbling windows")
        );

        let seo = d.seo.as_ref().unwrap();
        assert!(seo.date_modified.is_some());
        assert_eq!(
            seo.description.as_deref(),
            Some("How the four window kinds group events.")
        );

        assert_eq!(d.extra.get("layout").and_then(Value::as_str), Some("post"));
        assert!(d.body.starts_with("\nStream processing"));
    }

    #[test]
    fn test_missing_categories_is_empty() {
        let d = doc("title: \"X\"\ndate: 2020-02-12 16:45:04 -0500\n").unwrap();
        assert_eq!(d.title, "X");
        assert!(d.categories.is_empty());
        assert!(d.tags.is_empty());
        assert!(d.image.is_none());
        assert!(d.seo.is_none());
        assert!(d.extra.is_empty());
    }

    #[test]
    fn test_body_is_verbatim() {
        let raw = "---\ntitle: T\ndate: 2020-02-12 16:45:04 -0500\n---\n\n```cpp\ntemplate <auto N>\n```\n  trailing  \n";
        let d = parse_document(raw).unwrap();
        assert_eq!(d.body, "\n```cpp\ntemplate <auto N>\n```\n  trailing  \n");
    }

    #[test]
    fn test_scalar_labels_split_on_whitespace() {
        let d = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\ntags: cpp templates cpp\n").unwrap();
        assert_eq!(d.tags, vec!["cpp", "templates"]);
    }

    #[test]
    fn test_numeric_title_and_tags_become_strings() {
        let d = doc("title: 2020\ndate: 2020-02-12 16:45:04 -0500\ntags: [20, cpp]\n").unwrap();
        assert_eq!(d.title, "2020");
        assert_eq!(d.tags, vec!["20", "cpp"]);
    }

    #[test]
    fn test_image_shorthand() {
        let d = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\nimage: img/a.png\n").unwrap();
        assert_eq!(d.image.unwrap().path.as_deref(), Some("img/a.png"));
    }

    #[test]
    fn test_empty_sections_are_absent() {
        let d = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\nimage:\nseo:\ncategories:\n").unwrap();
        assert!(d.image.is_none());
        assert!(d.seo.is_none());
        assert!(d.categories.is_empty());
    }

    // ------------------------------------------------------------------------
    // Required fields
    // ------------------------------------------------------------------------

    #[test]
    fn test_missing_title() {
        let err = doc("date: 2020-02-12 16:45:04 -0500\n").unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { ref field } if field == "title"));
    }

    #[test]
    fn test_empty_title() {
        let err = doc("title: \"  \"\ndate: 2020-02-12 16:45:04 -0500\n").unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));
    }

    #[test]
    fn test_missing_date() {
        let err = doc("title: T\n").unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { ref field } if field == "date"));
    }

    #[test]
    fn test_empty_metadata_block() {
        let err = parse_document("---\n---\nBody").unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField { .. }));
    }

    // ------------------------------------------------------------------------
    // Malformed and invalid metadata
    // ------------------------------------------------------------------------

    #[test]
    fn test_unterminated_block() {
        let err = parse_document("---\ntitle: T\ndate: 2020-02-12 16:45:04 -0500\n").unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
    }

    #[test]
    fn test_missing_block() {
        let err = parse_document("# No metadata\n").unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
    }

    #[test]
    fn test_metadata_not_a_mapping() {
        let err = parse_document("---\n- a\n- b\n---\n").unwrap_err();
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn test_invalid_date() {
        let err = doc("title: T\ndate: someday\n").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { ref field, .. } if field == "date"));
    }

    #[test]
    fn test_invalid_date_modified() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\nseo:\n  date_modified: 2020-02-12\n")
            .unwrap_err();
        assert!(
            matches!(err, Error::InvalidTimestamp { ref field, .. } if field == "seo.date_modified")
        );
    }

    #[test]
    fn test_title_wrong_shape() {
        let err = doc("title: [a, b]\ndate: 2020-02-12 16:45:04 -0500\n").unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata(_)));
    }

    #[test]
    fn test_absolute_image_path_rejected() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\nimage:\n  path: /assets/a.png\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "image.path"));
    }

    #[test]
    fn test_url_image_path_rejected() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\nimage: https://cdn.example/a.png\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { .. }));
    }

    #[test]
    fn test_empty_image_path_rejected() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\nimage:\n  path: \"\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidField { .. }));
    }

    #[test]
    fn test_label_with_comma_rejected() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\ntags: [\"a,b\"]\n").unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "tags"));
    }

    #[test]
    fn test_empty_label_rejected() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\ncategories: [\"\"]\n").unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref field, .. } if field == "categories"));
    }

    #[test]
    fn test_nested_label_rejected() {
        let err = doc("title: T\ndate: 2020-02-12 16:45:04 -0500\ntags: [[a]]\n").unwrap_err();
        assert!(err.to_string().contains("tags[0]"));
    }

    // ------------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------------

    #[test]
    fn test_round_trip_full_document() {
        let original = parse_document(STREAM_POST).unwrap();
        let rendered = original.render().unwrap();
        let reparsed = parse_document(&rendered).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_to_frontmatter_layout() {
        let d = doc("layout: post\ntitle: X\ndate: 2020-02-12T16:45:04-05:00\n").unwrap();
        let fm = d.to_frontmatter().unwrap();
        assert!(fm.starts_with("---\ntitle: X\n"));
        assert!(fm.contains("2020-02-12 16:45:04 -0500"));
        assert!(fm.ends_with("layout: post\n---\n"));
        assert!(!fm.contains("categories"));
    }

    #[test]
    fn test_ambiguous_title_survives_round_trip() {
        let d = doc("title: \"true\"\ndate: 2020-02-12 16:45:04 -0500\n").unwrap();
        let again = parse_document(&d.render().unwrap()).unwrap();
        assert_eq!(again.title, "true");
    }

    #[test]
    fn test_fractional_date_survives_round_trip() {
        let d = doc("title: X\ndate: 2020-02-12T16:45:04.500-05:00\n").unwrap();
        let rendered = d.render().unwrap();
        assert!(rendered.contains("2020-02-12 16:45:04.500 -0500"));

        let again = parse_document(&rendered).unwrap();
        assert_eq!(again.date, d.date);
        assert_eq!(again, d);
    }

    // ------------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------------

    #[test]
    fn test_slug() {
        let d = parse_document(STREAM_POST).unwrap();
        assert_eq!(d.slug(), "windowing-in-azure-stream-analytics");
    }

    #[test]
    fn test_excerpt_and_description() {
        let mut d = parse_document(STREAM_POST).unwrap();
        assert_eq!(
            d.excerpt(200).as_deref(),
            Some("Stream processing needs a notion of time.")
        );
        assert_eq!(
            d.description().as_deref(),
            Some("How the four window kinds group events.")
        );
        d.seo = None;
        assert_eq!(
            d.description().as_deref(),
            Some("Stream processing needs a notion of time.")
        );
    }

    #[test]
    fn test_label_lookup_is_normalized() {
        let d = parse_document(STREAM_POST).unwrap();
        assert!(d.has_tag("Azure"));
        assert!(d.in_category("stream_analytics"));
        assert!(!d.has_tag("cpp"));
    }

    #[test]
    fn test_word_count_skips_code() {
        let d = Document::new(
            "T",
            parse_timestamp("date", "2020-02-12 16:45:04 -0500").unwrap(),
            "Two words\n\n```\nignored code here\n```\n",
        );
        assert_eq!(d.word_count(), 2);
    }
}
