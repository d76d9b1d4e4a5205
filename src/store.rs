//! Article metadata store.
//!
//! A flat JSON array of [`ArticleRecord`]s, one per published article,
//! keyed by slug. The blog index and the sitemap are both rebuilt from it.
//!
//! ## File format
//!
//! ```json
//! [
//!   {
//!     "title": "Sample Post",
//!     "summary": "Keeping books is easier than it looks. A few habits go a long way.",
//!     "author": "Jane Doe",
//!     "date": "March 5, 2024",
//!     "parsed_date": "2024-03-05T00:00:00",
//!     "mins": "4 min read",
//!     "image": "../Article_Images/ledger.jpg",
//!     "safe_title": "Sample_Post"
//!   }
//! ]
//! ```
//!
//! Keys this crate does not know about are kept on each record and written
//! back unchanged, so hand-added annotations survive a republish.
//!
//! ## Semantics
//!
//! - **Append-only**: records are added, never updated in place. Appending a
//!   slug that already exists is a logged no-op, so republishing an article
//!   is idempotent.
//! - **Whole-file rewrites**: every save serializes the full list to a
//!   sibling temp file and renames it over the store. There is no locking;
//!   one pipeline run per output directory at a time.
//! - **Seeding**: when the file does not exist yet, [`MetadataStore::load`]
//!   persists the injected [`Seed`] and returns it. The seed is
//!   configuration, not code.

use crate::dates::{self, iso_date};
use crate::naming;
use crate::types::ArticleDocument;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid metadata JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One published article as persisted in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    /// Listing summary, at most two sentences.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub author: String,
    /// Date exactly as written in the article file.
    #[serde(default)]
    pub date: String,
    /// Canonical date. Absent in some hand-written legacy entries.
    #[serde(default, with = "iso_date")]
    pub parsed_date: Option<NaiveDate>,
    /// Read time text, e.g. `"4 min read"`.
    #[serde(default)]
    pub mins: String,
    /// Image path as referenced from the article page.
    #[serde(default)]
    pub image: String,
    /// Slug; the store's dedup key.
    #[serde(default)]
    pub safe_title: String,
    /// Unknown keys, preserved across rewrites.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ArticleRecord {
    /// Build the record for a freshly parsed document.
    ///
    /// `images_url` is prefixed to the image filename (`"../Article_Images/"`
    /// by default). An article without an image keeps an empty path, and one
    /// whose date did not parse gets no `parsed_date`.
    pub fn from_document(doc: &ArticleDocument, images_url: &str) -> Self {
        let image = if doc.image.is_empty() {
            String::new()
        } else {
            format!("{}{}", images_url, doc.image)
        };
        Self {
            title: doc.title.clone(),
            summary: naming::short_summary(&doc.summary),
            author: doc.author.clone(),
            date: doc.date_raw.clone(),
            parsed_date: dates::parse_date(&doc.date_raw),
            mins: doc.read_time.clone(),
            image,
            safe_title: doc.slug(),
            extra: serde_json::Map::new(),
        }
    }

    /// The record's slug. Legacy entries without `safe_title` fall back to
    /// the canonical slug of their title.
    pub fn slug(&self) -> String {
        let stored = self.safe_title.trim();
        let stored = stored.strip_suffix(".html").unwrap_or(stored);
        if stored.is_empty() {
            naming::slugify(&self.title)
        } else {
            stored.to_string()
        }
    }

    /// Canonical date: `parsed_date`, else a re-parse of `date`.
    pub fn canonical_date(&self) -> Option<NaiveDate> {
        self.parsed_date.or_else(|| dates::parse_date(&self.date))
    }

    /// Date used for ordering; undated records get the sentinel.
    pub fn sort_date(&self) -> NaiveDate {
        self.canonical_date().unwrap_or_else(dates::sentinel)
    }
}

/// Whether [`MetadataStore::append`] added the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Inserted,
    /// A record with the same slug already exists; nothing was written.
    Duplicate,
}

/// Records written to a fresh store on first load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seed(Vec<ArticleRecord>);

impl Seed {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_records(records: Vec<ArticleRecord>) -> Self {
        Self(records)
    }

    /// Load a seed file (same JSON format as the store itself).
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        read_records(path).map(Self)
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.0
    }
}

/// JSON-file backed list of [`ArticleRecord`]s.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
    seed: Seed,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>, seed: Seed) -> Self {
        Self {
            path: path.into(),
            seed,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. Seeds (and persists) the store if the file is
    /// absent.
    pub fn load(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        if !self.path.exists() {
            let records = self.seed.records().to_vec();
            info!(
                path = %self.path.display(),
                count = records.len(),
                "metadata store missing; writing seed records"
            );
            self.save(&records)?;
            return Ok(records);
        }
        let records = read_records(&self.path)?;
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.slug()) {
                warn!(slug = %record.slug(), "metadata store contains a duplicate slug");
            }
        }
        Ok(records)
    }

    /// Add a record unless its slug is already present.
    pub fn append(&self, record: ArticleRecord) -> Result<AppendOutcome, StoreError> {
        let mut records = self.load()?;
        let slug = record.slug();
        if records.iter().any(|r| r.slug() == slug) {
            warn!(%slug, "article already in metadata store; skipping insert");
            return Ok(AppendOutcome::Duplicate);
        }
        records.push(record);
        self.save(&records)?;
        info!(%slug, total = records.len(), "added article to metadata store");
        Ok(AppendOutcome::Inserted)
    }

    /// Rewrite the whole store.
    pub fn save(&self, records: &[ArticleRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Vec<ArticleRecord>, StoreError> {
    let content = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
