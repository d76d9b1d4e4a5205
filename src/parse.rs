//! Article text parsing.
//!
//! Turns a loosely formatted text file into an [`ArticleDocument`]. The
//! grammar is line oriented and read by a small state machine:
//!
//! ```text
//! Title: Sample Post                 ┐
//! Author: Jane Doe                   │ SeekingField
//! Date: March 5, 2024                │
//! ReadTime: 4 min read               │
//! Image: ledger.jpg                  ┘
//! Summary:                           ┐
//! Keeping books is easier than it    │ InSummary (lines joined by spaces)
//! looks.                             ┘
//! Sections:                          → back to SeekingField
//! 1. Start With a Budget             ┐
//! Budget text...                     │ InSection (line breaks kept)
//!                                    │
//! More budget text.                  ┘
//! 2. Reconcile Monthly               ┐ InSection
//! ...                                ┘
//! Final Thoughts:                    ┐
//! Closing text.                      ┘ InFinal (terminal)
//! ```
//!
//! ## Labels
//!
//! Labels match case-insensitively and must be followed directly by a colon
//! (horizontal whitespace allowed in between). `Date of incorporation: 1999`
//! is therefore summary text, not a `Date:` field. For each field the first
//! occurrence with a value wins.
//!
//! Fields are recognized while seeking or inside the summary. Inside a
//! section or the final block every line is content.
//!
//! ## Section conventions
//!
//! A document marks sections either with explicit `Section: Title` lines or
//! with numbered `N. Title` lines. If any explicit marker is present the
//! document uses the explicit convention and numbered lines are ordinary
//! content, which keeps numbered lists inside sections intact.
//!
//! ## Failures
//!
//! Only a missing `Title:` is fatal. Missing optional fields default to
//! empty strings, unrecognized lines outside any block are ignored, and an
//! unparseable date becomes a warning carried next to the document in
//! [`Parsed`].

use crate::dates::{self, DateParseWarning};
use crate::types::{ArticleDocument, Section};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}missing required field `{field}`", location(path))]
    MalformedInput {
        field: &'static str,
        path: Option<PathBuf>,
    },
    #[error("{}{warning}", location(path))]
    DateWarning {
        warning: DateParseWarning,
        path: Option<PathBuf>,
    },
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!("{}: ", p.display()),
        None => String::new(),
    }
}

impl ParseError {
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            ParseError::MalformedInput { field, path: None } => ParseError::MalformedInput {
                field,
                path: Some(path.to_path_buf()),
            },
            ParseError::DateWarning {
                warning,
                path: None,
            } => ParseError::DateWarning {
                warning,
                path: Some(path.to_path_buf()),
            },
            other => other,
        }
    }
}

/// A successfully parsed document plus any recoverable problems.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: ArticleDocument,
    pub warnings: Vec<DateParseWarning>,
}

impl Parsed {
    /// Promote the first warning to an error. Used by `--strict`.
    pub fn strict(self) -> Result<ArticleDocument, ParseError> {
        match self.warnings.into_iter().next() {
            Some(warning) => Err(ParseError::DateWarning {
                warning,
                path: None,
            }),
            None => Ok(self.document),
        }
    }
}

/// Read and parse an article file.
///
/// Fails with [`ParseError::MissingInput`] when the file does not exist, and
/// attaches the path to every other parse failure.
pub fn parse_article_file(path: &Path) -> Result<Parsed, ParseError> {
    if !path.is_file() {
        return Err(ParseError::MissingInput(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_article(&text).map_err(|e| e.with_path(path))
}

// ============================================================================
// Line classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Author,
    Date,
    ReadTime,
    Image,
}

const FIELD_LABELS: &[(Field, &[&str])] = &[
    (Field::Title, &["Title"]),
    (Field::Author, &["Author"]),
    (Field::Date, &["Date"]),
    (Field::ReadTime, &["ReadTime", "Read Time"]),
    (Field::Image, &["Image"]),
];

const SUMMARY_LABELS: &[&str] = &["Summary"];
const SECTIONS_HEADER_LABELS: &[&str] = &["Sections"];
const SECTION_LABELS: &[&str] = &["Section"];
const FINAL_LABELS: &[&str] = &["Final Thoughts", "Final"];

/// How a document marks its sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Convention {
    Numbered,
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Field(Field, &'a str),
    Summary(&'a str),
    SectionsHeader,
    Section(&'a str),
    Final(&'a str),
    Text(&'a str),
}

/// Match `Label:` at the start of `line`. Returns the trimmed text after
/// the colon.
fn labeled<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    let line = line.trim_start();
    labels.iter().find_map(|label| {
        let head = line.get(..label.len())?;
        if !head.eq_ignore_ascii_case(label) {
            return None;
        }
        let rest = line[label.len()..].trim_start_matches([' ', '\t']);
        rest.strip_prefix(':').map(str::trim)
    })
}

/// Match a numbered section marker `N. Title`.
fn numbered(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some(title)
}

fn classify(line: &str, convention: Convention) -> Line<'_> {
    if let Some(rest) = labeled(line, FINAL_LABELS) {
        return Line::Final(rest);
    }
    if labeled(line, SECTIONS_HEADER_LABELS).is_some() {
        return Line::SectionsHeader;
    }
    if let Some(title) = labeled(line, SECTION_LABELS) {
        return Line::Section(title);
    }
    if convention == Convention::Numbered {
        if let Some(title) = numbered(line) {
            return Line::Section(title);
        }
    }
    if let Some(rest) = labeled(line, SUMMARY_LABELS) {
        return Line::Summary(rest);
    }
    for (field, labels) in FIELD_LABELS {
        if let Some(value) = labeled(line, labels) {
            return Line::Field(*field, value);
        }
    }
    Line::Text(line)
}

fn detect_convention(text: &str) -> Convention {
    if text.lines().any(|l| labeled(l, SECTION_LABELS).is_some()) {
        Convention::Explicit
    } else {
        Convention::Numbered
    }
}

// ============================================================================
// State machine
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekingField,
    InSummary,
    InSection,
    InFinal,
}

#[derive(Default)]
struct Builder<'a> {
    title: Option<&'a str>,
    author: Option<&'a str>,
    date: Option<&'a str>,
    read_time: Option<&'a str>,
    image: Option<&'a str>,
    summary_seen: bool,
    summary: Vec<&'a str>,
    sections: Vec<Section>,
    open_section: Option<(&'a str, Vec<&'a str>)>,
    final_lines: Vec<&'a str>,
}

impl<'a> Builder<'a> {
    fn set_field(&mut self, field: Field, value: &'a str) {
        if value.is_empty() {
            return;
        }
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Date => &mut self.date,
            Field::ReadTime => &mut self.read_time,
            Field::Image => &mut self.image,
        };
        if slot.is_none() {
            *slot = Some(value);
        } else {
            debug!(?field, value, "ignoring repeated field");
        }
    }

    fn close_section(&mut self) {
        if let Some((title, lines)) = self.open_section.take() {
            self.sections.push(Section {
                title: title.to_string(),
                content: lines.join("\n").trim().to_string(),
            });
        }
    }
}

/// Parse article text into a document.
pub fn parse_article(text: &str) -> Result<Parsed, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let convention = detect_convention(text);
    let mut b = Builder::default();
    let mut state = State::SeekingField;

    for raw in text.lines() {
        if state == State::InFinal {
            b.final_lines.push(raw);
            continue;
        }

        let line = classify(raw, convention);
        state = match (state, line) {
            (_, Line::Final(inline)) => {
                b.close_section();
                if !inline.is_empty() {
                    b.final_lines.push(inline);
                }
                State::InFinal
            }
            (_, Line::Section(title)) => {
                b.close_section();
                b.open_section = Some((title, Vec::new()));
                State::InSection
            }
            (State::InSection, _) => {
                if let Some((_, lines)) = b.open_section.as_mut() {
                    lines.push(raw);
                }
                State::InSection
            }
            (_, Line::SectionsHeader) => State::SeekingField,
            (_, Line::Field(field, value)) => {
                b.set_field(field, value);
                State::SeekingField
            }
            (_, Line::Summary(inline)) => {
                if b.summary_seen {
                    debug!("ignoring repeated Summary block");
                    State::SeekingField
                } else {
                    b.summary_seen = true;
                    if !inline.is_empty() {
                        b.summary.push(inline);
                    }
                    State::InSummary
                }
            }
            (State::InSummary, Line::Text(t)) => {
                let t = t.trim();
                if !t.is_empty() {
                    b.summary.push(t);
                }
                State::InSummary
            }
            (s, Line::Text(t)) => {
                if !t.trim().is_empty() {
                    debug!(line = t, "ignoring line outside any block");
                }
                s
            }
        };
    }
    b.close_section();

    let title = b
        .title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ParseError::MalformedInput {
            field: "Title",
            path: None,
        })?;

    let date_raw = b.date.unwrap_or_default();
    let normalized = dates::normalize(date_raw);

    let document = ArticleDocument {
        title: title.to_string(),
        author: b.author.unwrap_or_default().to_string(),
        date_raw: date_raw.to_string(),
        date: normalized.date,
        read_time: b.read_time.unwrap_or_default().to_string(),
        image: b.image.unwrap_or_default().to_string(),
        summary: b.summary.join(" "),
        sections: b.sections,
        final_thoughts: b.final_lines.join("\n").trim().to_string(),
    };

    Ok(Parsed {
        document,
        warnings: normalized.warning.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
Title: Sample Post
Author: Jane Doe
Date: March 5, 2024
ReadTime: 4 min read
Image: ledger.jpg
Summary:
Keeping books is easier than it looks.
A few habits go a long way.
Sections:
1. Start With a Budget
Write down what comes in.

Then write down what goes out.
2. Reconcile Monthly
Match every transaction.
Final Thoughts:
Small steps add up.
";

    fn parse(text: &str) -> ArticleDocument {
        parse_article(text).unwrap().document
    }

    // =========================================================================
    // Full documents
    // =========================================================================

    #[test]
    fn parses_all_fields() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.title, "Sample Post");
        assert_eq!(doc.author, "Jane Doe");
        assert_eq!(doc.date_raw, "March 5, 2024");
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(doc.read_time, "4 min read");
        assert_eq!(doc.image, "ledger.jpg");
    }

    #[test]
    fn summary_lines_joined_with_spaces() {
        let doc = parse(SAMPLE);
        assert_eq!(
            doc.summary,
            "Keeping books is easier than it looks. A few habits go a long way."
        );
    }

    #[test]
    fn numbered_sections_in_order() {
        let doc = parse(SAMPLE);
        let titles: Vec<&str> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Start With a Budget", "Reconcile Monthly"]);
    }

    #[test]
    fn section_content_keeps_paragraph_breaks() {
        let doc = parse(SAMPLE);
        assert_eq!(
            doc.sections[0].content,
            "Write down what comes in.\n\nThen write down what goes out."
        );
        assert_eq!(doc.sections[1].content, "Match every transaction.");
    }

    #[test]
    fn final_thoughts_captured() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.final_thoughts, "Small steps add up.");
    }

    #[test]
    fn sample_has_no_warnings() {
        assert!(parse_article(SAMPLE).unwrap().warnings.is_empty());
    }

    #[test]
    fn slug_derived_from_title() {
        assert_eq!(parse(SAMPLE).slug(), "Sample_Post");
        assert_eq!(parse(SAMPLE).file_name(), "Sample_Post.html");
    }

    // =========================================================================
    // Fields
    // =========================================================================

    #[test]
    fn missing_title_is_fatal() {
        let err = parse_article("Author: Nobody\nSummary:\nText").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedInput { field: "Title", .. }
        ));
    }

    #[test]
    fn empty_title_is_fatal() {
        let err = parse_article("Title:   \nAuthor: Nobody").unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput { .. }));
    }

    #[test]
    fn symbol_only_title_still_gets_a_slug() {
        let a = parse("Title: ???\nAuthor: A");
        let b = parse("Title: 日本語\nAuthor: A");
        assert_eq!(a.title, "???");
        assert!(a.slug().starts_with("article-"), "{}", a.slug());
        assert!(b.slug().starts_with("article-"), "{}", b.slug());
        assert_ne!(a.slug(), b.slug());
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let doc = parse("Title: Bare");
        assert_eq!(doc.author, "");
        assert_eq!(doc.read_time, "");
        assert_eq!(doc.image, "");
        assert_eq!(doc.summary, "");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.final_thoughts, "");
    }

    #[test]
    fn labels_are_case_insensitive() {
        let doc = parse("TITLE: Loud\nauthor: quiet\nreadtime: 2 min");
        assert_eq!(doc.title, "Loud");
        assert_eq!(doc.author, "quiet");
        assert_eq!(doc.read_time, "2 min");
    }

    #[test]
    fn read_time_with_space_accepted() {
        assert_eq!(parse("Title: T\nRead Time: 3 min").read_time, "3 min");
    }

    #[test]
    fn whitespace_before_colon_allowed() {
        assert_eq!(parse("Title : Spaced").title, "Spaced");
    }

    #[test]
    fn first_field_wins() {
        let doc = parse("Title: First\nTitle: Second\nAuthor: A\nAuthor: B");
        assert_eq!(doc.title, "First");
        assert_eq!(doc.author, "A");
    }

    #[test]
    fn prefix_word_is_not_a_field() {
        let text = "\
Title: Forming an LLC
Date: March 5, 2024
Summary:
Date of incorporation matters more than you think.
Authority comes from the operating agreement.
";
        let doc = parse(text);
        assert_eq!(doc.date_raw, "March 5, 2024");
        assert_eq!(
            doc.summary,
            "Date of incorporation matters more than you think. \
             Authority comes from the operating agreement."
        );
    }

    #[test]
    fn field_with_colon_after_extra_word_is_text() {
        let doc = parse("Title: T\nSummary:\nDate of incorporation: 1999");
        assert_eq!(doc.date_raw, "");
        assert_eq!(doc.summary, "Date of incorporation: 1999");
    }

    #[test]
    fn unknown_date_produces_warning_and_sentinel() {
        let parsed = parse_article("Title: T\nDate: sometime soon").unwrap();
        assert_eq!(parsed.document.date, dates::sentinel());
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].raw, "sometime soon");
    }

    #[test]
    fn missing_date_produces_warning() {
        let parsed = parse_article("Title: T").unwrap();
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn strict_rejects_warnings() {
        let parsed = parse_article("Title: T\nDate: whenever").unwrap();
        assert!(matches!(
            parsed.strict(),
            Err(ParseError::DateWarning { .. })
        ));
    }

    #[test]
    fn strict_passes_clean_documents() {
        let doc = parse_article(SAMPLE).unwrap().strict().unwrap();
        assert_eq!(doc.title, "Sample Post");
    }

    // =========================================================================
    // Summary
    // =========================================================================

    #[test]
    fn summary_inline_text_kept() {
        let doc = parse("Title: T\nSummary: Inline start.\nContinues here.");
        assert_eq!(doc.summary, "Inline start. Continues here.");
    }

    #[test]
    fn summary_skips_blank_lines() {
        let doc = parse("Title: T\nSummary:\nOne.\n\n\nTwo.");
        assert_eq!(doc.summary, "One. Two.");
    }

    #[test]
    fn summary_ends_at_field() {
        let doc = parse("Summary:\nAbout things.\nTitle: Late Title\nStray line");
        assert_eq!(doc.title, "Late Title");
        assert_eq!(doc.summary, "About things.");
    }

    #[test]
    fn summary_ends_at_section_marker() {
        let doc = parse("Title: T\nSummary:\nShort.\n1. First\nBody");
        assert_eq!(doc.summary, "Short.");
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn repeated_summary_ignored() {
        let doc = parse("Title: T\nSummary: One.\nAuthor: A\nSummary: Two.\nMore.");
        assert_eq!(doc.summary, "One.");
    }

    // =========================================================================
    // Sections
    // =========================================================================

    #[test]
    fn explicit_section_markers() {
        let text = "\
Title: T
Section: Getting Started
1. Open an account
2. Pick software
Section: Next Steps
Hire help.
";
        let doc = parse(text);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].title, "Getting Started");
        assert_eq!(
            doc.sections[0].content,
            "1. Open an account\n2. Pick software"
        );
        assert_eq!(doc.sections[1].content, "Hire help.");
    }

    #[test]
    fn fields_inside_sections_are_content() {
        let text = "Title: T\n1. Dates\nDate: whatever you like\nAuthor: still content";
        let doc = parse(text);
        assert_eq!(doc.date_raw, "");
        assert_eq!(doc.author, "");
        assert_eq!(
            doc.sections[0].content,
            "Date: whatever you like\nAuthor: still content"
        );
    }

    #[test]
    fn decimal_number_is_not_a_marker() {
        let doc = parse("Title: T\n1. Growth\n2.5 percent growth is typical.");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].content, "2.5 percent growth is typical.");
    }

    #[test]
    fn empty_numbered_line_is_not_a_marker() {
        assert!(numbered("3.").is_none());
        assert!(numbered("3. ").is_none());
        assert_eq!(numbered("12. Twelve"), Some("Twelve"));
    }

    #[test]
    fn section_content_trimmed_of_surrounding_blank_lines() {
        let doc = parse("Title: T\n1. A\n\n\nBody\n\n\n2. B\nMore");
        assert_eq!(doc.sections[0].content, "Body");
    }

    #[test]
    fn zero_sections_is_valid() {
        let doc = parse("Title: T\nSummary: Just a note.\nFinal Thoughts:\nBye.");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.final_thoughts, "Bye.");
    }

    #[test]
    fn unrecognized_lines_outside_blocks_ignored() {
        let doc = parse("Random preamble\nTitle: T\nmore noise\nSections:\n1. A\nBody");
        assert_eq!(doc.title, "T");
        assert_eq!(doc.summary, "");
        assert_eq!(doc.sections[0].content, "Body");
    }

    // =========================================================================
    // Final block
    // =========================================================================

    #[test]
    fn final_short_label_accepted() {
        let doc = parse("Title: T\n1. A\nBody\nFinal:\nDone.");
        assert_eq!(doc.sections[0].content, "Body");
        assert_eq!(doc.final_thoughts, "Done.");
    }

    #[test]
    fn final_inline_text_kept() {
        let doc = parse("Title: T\nFinal Thoughts: Inline.\nSecond line.");
        assert_eq!(doc.final_thoughts, "Inline.\nSecond line.");
    }

    #[test]
    fn final_block_is_terminal() {
        let doc = parse("Title: T\nFinal Thoughts:\nWrap up.\n3. Not a section\nAuthor: Not a field");
        assert!(doc.sections.is_empty());
        assert_eq!(doc.author, "");
        assert_eq!(
            doc.final_thoughts,
            "Wrap up.\n3. Not a section\nAuthor: Not a field"
        );
    }

    #[test]
    fn final_thoughts_not_confused_with_final_word() {
        let doc = parse("Title: T\nSummary:\nFinally, some advice.");
        assert_eq!(doc.summary, "Finally, some advice.");
        assert_eq!(doc.final_thoughts, "");
    }

    // =========================================================================
    // Line endings and encoding
    // =========================================================================

    #[test]
    fn crlf_and_bom_handled() {
        let text = "\u{feff}Title: Windows\r\nAuthor: Someone\r\nSummary:\r\nLine one.\r\n";
        let doc = parse(text);
        assert_eq!(doc.title, "Windows");
        assert_eq!(doc.author, "Someone");
        assert_eq!(doc.summary, "Line one.");
    }

    // =========================================================================
    // File entry point
    // =========================================================================

    #[test]
    fn parse_file_missing_input() {
        let tmp = TempDir::new().unwrap();
        let err = parse_article_file(&tmp.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ParseError::MissingInput(_)));
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn parse_file_malformed_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("untitled.txt");
        fs::write(&path, "Author: Someone\n").unwrap();
        let err = parse_article_file(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("untitled.txt"), "{msg}");
        assert!(msg.contains("`Title`"), "{msg}");
    }

    #[test]
    fn parse_file_reads_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sample.txt");
        fs::write(&path, SAMPLE).unwrap();
        let parsed = parse_article_file(&path).unwrap();
        assert_eq!(parsed.document.title, "Sample Post");
    }
}
