//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what was published (titles, slugs, counts), with paths
//! shown as indented context lines relative to the project root. Diagnostics
//! go through `tracing` on stderr; this module only writes the summary to
//! stdout.
//!
//! Every command has a pure `format_*` function returning lines, so the
//! layout is unit-testable, plus a `print_*` wrapper.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Sample Post
//!     Source: articles/source/sample_post.txt
//!     Slug: Sample_Post
//!     Author: Jane Doe
//!     Date: March 5, 2024 (2024-03-05)
//!     Read time: 4 min read
//!     Image: ledger.jpg
//!     Summary: Keeping books is easier than it looks. A few habits go a lon...
//! Sections
//! 001 Start With a Budget (2 paragraphs)
//! 002 Reconcile Monthly (1 paragraph)
//! Final Thoughts (1 paragraph)
//! ```
//!
//! ## Article / Build
//!
//! ```text
//! Sample Post → articles/Sample_Post.html
//!     Source: articles/source/sample_post.txt
//!     Store: added
//! Blog → 1 page
//!     blog/index.html
//! ```
//!
//! ## Sitemap
//!
//! ```text
//! Sitemap → public/sitemap.xml (21 URLs)
//!     Static pages: 8
//!     Service areas: 11
//!     Articles: 1
//! ```

use crate::dates;
use crate::parse::Parsed;
use crate::pipeline::{ArticleReport, BatchReport, BlogReport, PublishReport, SitemapReport};
use crate::store::AppendOutcome;
use std::path::Path;

/// Summaries in `check` output are cut to this many characters.
const SUMMARY_PREVIEW: usize = 60;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` when it lives under it, as-is otherwise.
fn rel(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}...", crate::naming::truncate_chars(text, max))
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn outcome_label(outcome: AppendOutcome) -> &'static str {
    match outcome {
        AppendOutcome::Inserted => "added",
        AppendOutcome::Duplicate => "already present (unchanged)",
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the structured view of a parsed article.
pub fn format_check_output(parsed: &Parsed, source: &Path, root: &Path) -> Vec<String> {
    let doc = &parsed.document;
    let mut lines = vec![doc.title.clone()];
    let field = |label: &str, value: &str| format!("{}{}: {}", indent(1), label, value);

    lines.push(field("Source", &rel(source, root)));
    lines.push(field("Slug", &doc.slug()));
    if !doc.author.is_empty() {
        lines.push(field("Author", &doc.author));
    }
    lines.push(field("Date", &describe_date(&doc.date_raw)));
    if !doc.read_time.is_empty() {
        lines.push(field("Read time", &doc.read_time));
    }
    if !doc.image.is_empty() {
        lines.push(field("Image", &doc.image));
    }
    if !doc.summary.is_empty() {
        lines.push(field("Summary", &truncate_desc(&doc.summary, SUMMARY_PREVIEW)));
    }

    if !doc.sections.is_empty() || !doc.final_thoughts.is_empty() {
        lines.push("Sections".to_string());
    }
    for (i, section) in doc.sections.iter().enumerate() {
        let count = section.paragraphs().len();
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            section.title,
            plural(count, "paragraph", "paragraphs")
        ));
    }
    if !doc.final_thoughts.is_empty() {
        let count = crate::types::paragraphs(&doc.final_thoughts).len();
        lines.push(format!(
            "Final Thoughts ({})",
            plural(count, "paragraph", "paragraphs")
        ));
    }

    if !parsed.warnings.is_empty() {
        lines.push("Warnings".to_string());
        for warning in &parsed.warnings {
            lines.push(format!("{}{}", indent(1), warning));
        }
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(parsed: &Parsed, source: &Path, root: &Path) {
    for line in format_check_output(parsed, source, root) {
        println!("{}", line);
    }
}

// ============================================================================
// article / build
// ============================================================================

fn format_article(report: &ArticleReport, root: &Path) -> Vec<String> {
    let mut lines = vec![
        format!("{} → {}", report.title, rel(&report.page, root)),
        format!("{}Source: {}", indent(1), rel(&report.source, root)),
        format!("{}Store: {}", indent(1), outcome_label(report.outcome)),
    ];
    for warning in &report.warnings {
        lines.push(format!("{}Warning: {}", indent(1), warning));
    }
    lines
}

fn format_blog_pages(pages: &[std::path::PathBuf], root: &Path) -> Vec<String> {
    let mut lines = vec![format!("Blog → {}", plural(pages.len(), "page", "pages"))];
    lines.extend(pages.iter().map(|p| format!("{}{}", indent(1), rel(p, root))));
    lines
}

/// Format the result of publishing a single article.
pub fn format_publish_output(report: &PublishReport, root: &Path) -> Vec<String> {
    let mut lines = format_article(&report.article, root);
    lines.extend(format_blog_pages(&report.blog_pages, root));
    lines
}

/// Print publish output to stdout.
pub fn print_publish_output(report: &PublishReport, root: &Path) {
    for line in format_publish_output(report, root) {
        println!("{}", line);
    }
}

/// Format the result of a batch build.
pub fn format_batch_output(report: &BatchReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for article in &report.published {
        lines.extend(format_article(article, root));
    }
    if !report.failed.is_empty() {
        lines.push("Failed".to_string());
        for (path, err) in &report.failed {
            lines.push(format!("{}{}", indent(1), rel(path, root)));
            lines.push(format!("{}{}", indent(2), err));
        }
    }
    lines.extend(format_blog_pages(&report.blog_pages, root));
    lines.push(format!(
        "Published {}, {} failed",
        plural(report.published.len(), "article", "articles"),
        report.failed.len()
    ));
    lines
}

/// Print batch output to stdout.
pub fn print_batch_output(report: &BatchReport, root: &Path) {
    for line in format_batch_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// blog
// ============================================================================

/// Format the result of a blog rebuild.
pub fn format_blog_output(report: &BlogReport, root: &Path) -> Vec<String> {
    let mut lines = format_blog_pages(&report.pages, root);
    lines.insert(
        1,
        format!(
            "{}{}",
            indent(1),
            plural(report.articles, "article", "articles")
        ),
    );
    lines
}

/// Print blog output to stdout.
pub fn print_blog_output(report: &BlogReport, root: &Path) {
    for line in format_blog_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// sitemap
// ============================================================================

/// Format the result of sitemap generation.
pub fn format_sitemap_output(report: &SitemapReport, root: &Path) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Sitemap → {} ({} URLs)",
            rel(&report.path, root),
            report.total()
        ),
        format!("{}Static pages: {}", indent(1), report.static_pages),
        format!("{}Service areas: {}", indent(1), report.service_areas),
        format!("{}Articles: {}", indent(1), report.articles),
    ];
    if let Some(ping) = &report.ping {
        lines.push(format!(
            "Ping → {} notified, {} failed",
            ping.notified.len(),
            ping.failed.len()
        ));
        for endpoint in &ping.notified {
            lines.push(format!("{}ok: {}", indent(1), endpoint));
        }
        for err in &ping.failed {
            lines.push(format!("{}failed: {}", indent(1), err));
        }
    }
    lines
}

/// Print sitemap output to stdout.
pub fn print_sitemap_output(report: &SitemapReport, root: &Path) {
    for line in format_sitemap_output(report, root) {
        println!("{}", line);
    }
}

/// Raw date followed by its canonical form, or `(unrecognized)`.
fn describe_date(raw: &str) -> String {
    match dates::parse_date(raw) {
        Some(d) => format!("{} ({})", raw.trim(), d.format("%Y-%m-%d")),
        None => format!("{} (unrecognized)", raw.trim()),
    }
}

// ============================================================================
// Tests
// ============================================================================
