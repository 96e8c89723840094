//! Body well-formedness checks.
//!
//! [`validate_body`] walks the markdown events of a document body and
//! reports structural problems that a renderer would silently paper over:
//!
//! - code fences that are opened but never closed
//! - footnote references without a definition
//! - footnote definitions that are never referenced, or defined twice
//!
//! Fences are found wherever the parser finds them, including inside list
//! items and blockquotes. Code blocks and inline code spans are never
//! scanned for footnotes.
//!
//! Validation never rejects a document by itself; it returns a
//! [`ValidationReport`] and leaves the decision to the caller (the loader's
//! strict mode turns error diagnostics into a failure).

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

use crate::markdown::parser::parser;

static FOOTNOTE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\^([^\]\s]+)\]").expect("valid footnote reference regex")
});

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic; the document renders, perhaps not as intended.
    Warning,
    /// The body is structurally broken.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// A code fence runs to the end of the body.
    UnterminatedCodeFence,
    /// `[^label]` with no `[^label]:` definition.
    UndefinedFootnote,
    /// `[^label]:` that nothing references.
    UnusedFootnoteDefinition,
    /// The same label is defined more than once.
    DuplicateFootnoteDefinition,
    /// The date in the filename disagrees with the metadata date.
    FilenameDateMismatch,
}

impl DiagnosticKind {
    /// Severity this kind is always reported with.
    pub fn severity(self) -> Severity {
        match self {
            Self::UnterminatedCodeFence | Self::UndefinedFootnote => Severity::Error,
            Self::UnusedFootnoteDefinition
            | Self::DuplicateFootnoteDefinition
            | Self::FilenameDateMismatch => Severity::Warning,
        }
    }

    /// Stable kebab-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnterminatedCodeFence => "unterminated-code-fence",
            Self::UndefinedFootnote => "undefined-footnote",
            Self::UnusedFootnoteDefinition => "unused-footnote-definition",
            Self::DuplicateFootnoteDefinition => "duplicate-footnote-definition",
            Self::FilenameDateMismatch => "filename-date-mismatch",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding about a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Always `kind.severity()`.
    pub severity: Severity,
    /// What was found.
    pub kind: DiagnosticKind,
    /// 1-based line number. Relative to the body unless the report was
    /// shifted with [`ValidationReport::offset_lines`].
    pub line: usize,
    /// Human-readable explanation naming the fence or footnote label.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic; severity follows from `kind`.
    pub fn new(kind: DiagnosticKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            line,
            message: message.into(),
        }
    }

    /// Whether this diagnostic has error severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} [{}]: {}",
            self.line, self.severity, self.kind, self.message
        )
    }
}

/// A fenced code block found in the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// First word of the info string (`cpp`, `sql`, ...).
    pub language: Option<String>,
    /// Line of the opening fence.
    pub line: usize,
}

/// Which checks [`validate_body_with`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Report unterminated code fences.
    pub code_fences: bool,
    /// Report footnote pairing problems.
    pub footnotes: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            code_fences: true,
            footnotes: true,
        }
    }
}

/// Result of validating one body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Findings, ordered by line.
    pub diagnostics: Vec<Diagnostic>,
    /// Every fenced code block, in order of appearance.
    pub code_blocks: Vec<CodeBlock>,
}

impl ValidationReport {
    /// Whether any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Error-severity diagnostics, in line order.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warning-severity diagnostics, in line order.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// No diagnostics at all.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Add a diagnostic, keeping line order.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let at = self
            .diagnostics
            .partition_point(|d| d.line <= diagnostic.line);
        self.diagnostics.insert(at, diagnostic);
    }

    /// Shift every line number by `lines`, turning body-relative lines into
    /// file-relative ones.
    pub fn offset_lines(&mut self, lines: usize) {
        for d in &mut self.diagnostics {
            d.line += lines;
        }
        for block in &mut self.code_blocks {
            block.line += lines;
        }
    }
}

/// Validate a body with every check enabled.
///
/// # Example
///
/// ```rust
/// use folio_content::validate::{validate_body, DiagnosticKind};
///
/// let report = validate_body("Time is relative.[^1]\n");
/// assert!(report.has_errors());
/// assert_eq!(report.diagnostics[0].kind, DiagnosticKind::UndefinedFootnote);
/// ```
pub fn validate_body(body: &str) -> ValidationReport {
    validate_body_with(body, &ValidationOptions::default())
}

/// Maps byte offsets in a body to 1-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(body: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            body.match_indices('\n')
                .map(|(i, _)| i + 1)
                .filter(|&start| start < body.len()),
        );
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset).max(1)
    }
}

/// A fenced code block whose end has not been seen yet.
struct OpenFence {
    /// Source range of the whole block, fences included.
    range: Range<usize>,
    /// End of the last content line (or of the opening line when empty).
    content_end: usize,
    line: usize,
}

impl OpenFence {
    fn new(body: &str, range: Range<usize>, line: usize) -> Self {
        let content_end = body[range.start..]
            .find('\n')
            .map_or(body.len(), |i| range.start + i + 1)
            .min(range.end);
        Self {
            range,
            content_end,
            line,
        }
    }

    /// The parser ends a fence at its closing run, at the end of its
    /// container, or at the end of the body. Only the first leaves text
    /// after the last content line.
    fn is_closed(&self, body: &str) -> bool {
        body.get(self.content_end..self.range.end)
            .is_some_and(|rest| !rest.trim().is_empty())
    }

    fn marker<'a>(&self, body: &'a str) -> &'a str {
        let opening = body[self.range.start..].trim_start();
        let Some(first) = opening.chars().next() else {
            return "";
        };
        let len = opening.chars().take_while(|&c| c == first).count();
        &opening[..len * first.len_utf8()]
    }
}

struct FootnoteSite {
    label: String,
    line: usize,
}

/// Consecutive prose text events. The parser splits unmatched brackets into
/// separate events, so `[^label]` is only visible once they are joined.
#[derive(Default)]
struct TextRun {
    text: String,
    /// `(offset in text, offset in body)` for each joined event.
    pieces: Vec<(usize, usize)>,
}

impl TextRun {
    fn push(&mut self, text: &str, source_start: usize) {
        self.pieces.push((self.text.len(), source_start));
        self.text.push_str(text);
    }

    /// Collect literal `[^label]` references, which the parser leaves as
    /// text when the label has no definition.
    fn drain_references(&mut self, lines: &LineIndex, references: &mut Vec<FootnoteSite>) {
        for caps in FOOTNOTE_REFERENCE.captures_iter(&self.text) {
            let Some(found) = caps.get(0) else { continue };
            let at = self.pieces.partition_point(|&(offset, _)| offset <= found.start());
            let source = self
                .pieces
                .get(at.saturating_sub(1))
                .map_or(0, |&(offset, source)| source + (found.start() - offset));
            references.push(FootnoteSite {
                label: caps[1].to_lowercase(),
                line: lines.line_of(source),
            });
        }
        self.text.clear();
        self.pieces.clear();
    }
}

/// Validate a body, running only the checks enabled in `options`.
pub fn validate_body_with(body: &str, options: &ValidationOptions) -> ValidationReport {
    let lines = LineIndex::new(body);
    let mut report = ValidationReport::default();
    let mut definitions: Vec<FootnoteSite> = Vec::new();
    let mut references: Vec<FootnoteSite> = Vec::new();
    let mut fence: Option<OpenFence> = None;
    let mut in_code = false;
    let mut run = TextRun::default();

    for (event, range) in parser(body).into_offset_iter() {
        if in_code || !matches!(event, Event::Text(_)) {
            run.drain_references(&lines, &mut references);
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code = true;
                if let CodeBlockKind::Fenced(info) = kind {
                    let line = lines.line_of(range.start);
                    report.code_blocks.push(CodeBlock {
                        language: info.split_whitespace().next().map(String::from),
                        line,
                    });
                    fence = Some(OpenFence::new(body, range, line));
                }
            }
            Event::Text(_) if in_code => {
                if let Some(open) = &mut fence {
                    open.content_end = open.content_end.max(range.end);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                if let Some(open) = fence.take()
                    && options.code_fences
                    && !open.is_closed(body)
                {
                    report.push(Diagnostic::new(
                        DiagnosticKind::UnterminatedCodeFence,
                        open.line,
                        format!("code fence `{}` is never closed", open.marker(body)),
                    ));
                }
            }
            Event::Text(text) => run.push(&text, range.start),
            Event::FootnoteReference(label) => references.push(FootnoteSite {
                label: label.to_lowercase(),
                line: lines.line_of(range.start),
            }),
            Event::Start(Tag::FootnoteDefinition(label)) => definitions.push(FootnoteSite {
                label: label.to_lowercase(),
                line: lines.line_of(range.start),
            }),
            _ => {}
        }
    }
    run.drain_references(&lines, &mut references);

    if options.footnotes {
        check_footnotes(&definitions, &references, &mut report);
    }

    report
}

fn check_footnotes(
    definitions: &[FootnoteSite],
    references: &[FootnoteSite],
    report: &mut ValidationReport,
) {
    let mut defined: HashMap<&str, usize> = HashMap::new();
    for def in definitions {
        if let Some(first) = defined.get(def.label.as_str()) {
            report.push(Diagnostic::new(
                DiagnosticKind::DuplicateFootnoteDefinition,
                def.line,
                format!(
                    "footnote [^{}] is already defined on line {first}",
                    def.label
                ),
            ));
        } else {
            defined.insert(&def.label, def.line);
        }
    }

    for reference in references {
        if !defined.contains_key(reference.label.as_str()) {
            report.push(Diagnostic::new(
                DiagnosticKind::UndefinedFootnote,
                reference.line,
                format!("footnote [^{}] has no definition", reference.label),
            ));
        }
    }

    for def in definitions {
        let first_definition = defined.get(def.label.as_str()) == Some(&def.line);
        let referenced = references.iter().any(|r| r.label == def.label);
        if first_definition && !referenced {
            report.push(Diagnostic::new(
                DiagnosticKind::UnusedFootnoteDefinition,
                def.line,
                format!("footnote [^{}] is defined but never referenced", def.label),
            ));
        }
    }
}
