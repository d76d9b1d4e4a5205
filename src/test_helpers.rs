//! Shared test utilities for the provision-press test suite.
//!
//! Provides fixture setup, canned documents and records, and lookups that
//! panic with a readable message on miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let doc = sample_document();
//! let records = vec![record("Older", "January 2, 2023"), record("Newer", "March 5, 2024")];
//! assert_eq!(find_record(&records, "Newer").title, "Newer");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::dates;
use crate::naming;
use crate::store::ArticleRecord;
use crate::types::{ArticleDocument, Section};

// =========================================================================
// Fixture setup
// =========================================================================

/// Project root laid out with the default config: `fixtures/articles/`
/// copied to `articles/source/` in a temp directory.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/articles");
    let source = tmp.path().join(SiteConfig::default().paths.source_dir);
    std::fs::create_dir_all(&source).unwrap();
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), source.join(entry.file_name())).unwrap();
    }
    tmp
}

/// Path of one fixture article in a root created by [`setup_fixtures`].
pub fn fixture_article(root: &Path, file: &str) -> std::path::PathBuf {
    root.join(SiteConfig::default().paths.source_dir).join(file)
}

// =========================================================================
// Canned values
// =========================================================================

/// The document parsed from `fixtures/articles/sample_post.txt`.
pub fn sample_document() -> ArticleDocument {
    ArticleDocument {
        title: "Sample Post".to_string(),
        author: "Jane Doe".to_string(),
        date_raw: "March 5, 2024".to_string(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        read_time: "4 min read".to_string(),
        image: "ledger.jpg".to_string(),
        summary: "Keeping books is easier than it looks. A few habits go a long way."
            .to_string(),
        sections: vec![
            Section {
                title: "Start With a Budget".to_string(),
                content: "Write down what comes in.\n\nThen write down what goes out.".to_string(),
            },
            Section {
                title: "Reconcile Monthly".to_string(),
                content: "Match every transaction.".to_string(),
            },
        ],
        final_thoughts: "Small steps add up.".to_string(),
    }
}

/// A store record with the given title and raw date. `parsed_date` is
/// whatever the date parser makes of `date`.
pub fn record(title: &str, date: &str) -> ArticleRecord {
    ArticleRecord {
        title: title.to_string(),
        summary: format!("All about {title}."),
        author: "Jane Doe".to_string(),
        date: date.to_string(),
        parsed_date: dates::parse_date(date),
        mins: "3 min read".to_string(),
        image: "../Article_Images/placeholder.jpg".to_string(),
        safe_title: naming::slugify(title),
        extra: serde_json::Map::new(),
    }
}

// =========================================================================
// Lookups - panics with a clear message on miss
// =========================================================================

/// Find a record by title. Panics if not found.
pub fn find_record<'a>(records: &'a [ArticleRecord], title: &str) -> &'a ArticleRecord {
    records.iter().find(|r| r.title == title).unwrap_or_else(|| {
        let titles = record_titles(records);
        panic!("record '{title}' not found. Available: {titles:?}")
    })
}

/// All record titles in order.
pub fn record_titles(records: &[ArticleRecord]) -> Vec<&str> {
    records.iter().map(|r| r.title.as_str()).collect()
}
