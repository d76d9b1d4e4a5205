//! Shared types passed between pipeline steps.
//!
//! An [`ArticleDocument`] is the full parse of one text file. It only lives
//! for the duration of a publish: the renderer consumes it whole, and the
//! metadata store keeps a trimmed-down [`crate::store::ArticleRecord`].

use chrono::NaiveDate;

/// One titled section of an article body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    /// Section body with internal line breaks preserved. Paragraphs are
    /// separated by blank lines.
    pub content: String,
}

impl Section {
    /// Split the content into paragraphs at blank lines, joining the lines
    /// of each paragraph with a single space.
    pub fn paragraphs(&self) -> Vec<String> {
        paragraphs(&self.content)
    }
}

/// A parsed article, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDocument {
    /// Always non-empty; the parser rejects documents without one.
    pub title: String,
    pub author: String,
    /// Date exactly as written in the source file.
    pub date_raw: String,
    /// Canonical date. [`crate::dates::sentinel`] when `date_raw` did not
    /// parse.
    pub date: NaiveDate,
    pub read_time: String,
    /// Image filename as written in the source file (no directory).
    pub image: String,
    pub summary: String,
    pub sections: Vec<Section>,
    /// Empty when the article has no closing section.
    pub final_thoughts: String,
}

impl ArticleDocument {
    /// The article's slug, derived with the one canonical algorithm.
    pub fn slug(&self) -> String {
        crate::naming::slugify(&self.title)
    }

    /// Output filename of the rendered page (`{slug}.html`).
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug())
    }
}

/// Split text into paragraphs at blank lines. Lines within a paragraph are
/// trimmed and joined with a single space; empty paragraphs are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                out.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join(" "));
    }
    out
}
