//! Slug and summary derivation.
//!
//! Every code path that needs an article's identifier goes through
//! [`slugify`]: the parser, the metadata store's dedup key, the rendered
//! filename and the sitemap URL. There is exactly one algorithm.
//!
//! ## Slugs
//!
//! - Characters other than ASCII alphanumerics, `_`, `-` and whitespace are
//!   dropped (`"What's New?"` → `"Whats New"`)
//! - Leading and trailing whitespace is trimmed
//! - Each remaining whitespace character becomes `_`
//!
//! ```text
//! "Sample Post"              → "Sample_Post"
//! "Q&A: Payroll 2025"        → "QA_Payroll_2025"
//! "Year-End  Checklist"      → "Year-End__Checklist"
//! ```
//!
//! Runs of whitespace are not collapsed, so titles that differ only in
//! spacing keep distinct slugs.
//!
//! A non-empty title with nothing left after filtering (`"???"`,
//! `"日本語"`) gets `article-` plus the first 12 hex digits of the SHA-256
//! of the trimmed title. Only a blank title has an empty slug.

use sha2::{Digest, Sha256};

/// Hex digits of the title hash kept in fallback slugs.
const FALLBACK_HASH_LEN: usize = 12;

/// Derive the canonical slug for a title.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    let slug: String = kept
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let title = title.trim();
    if slug.is_empty() && !title.is_empty() {
        fallback_slug(title)
    } else {
        slug
    }
}

fn fallback_slug(title: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(title.as_bytes()));
    format!("article-{}", &digest[..FALLBACK_HASH_LEN])
}

/// Maximum sentences kept by [`short_summary`].
const SUMMARY_SENTENCES: usize = 2;

/// Shorten a summary to its first two sentences for listing display.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text. Text with fewer sentences is returned whole.
pub fn short_summary(text: &str) -> String {
    let text = text.trim();
    let mut sentences = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if at_boundary {
            sentences += 1;
            if sentences == SUMMARY_SENTENCES {
                return text[..i + c.len_utf8()].to_string();
            }
        }
    }
    text.to_string()
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}
