//! End-to-end publishing operations.
//!
//! Each public function here backs one CLI command and strings the
//! single-purpose modules together:
//!
//! ```text
//! publish_article:  parse → render page → append to store → rewrite blog
//! publish_all:      publish_article per source file, blog rewritten once
//! rebuild_blog:     store → blog
//! generate_sitemap: store → sitemap.xml (→ optional ping)
//! ```
//!
//! Parsing always happens first, so a malformed article leaves every output
//! untouched. Later steps write whole files; re-running a command after a
//! failure is the recovery path.

use crate::blog;
use crate::config::{ResolvedPaths, SiteConfig};
use crate::dates::DateParseWarning;
use crate::parse::{self, ParseError};
use crate::render::{self, RenderError};
use crate::sitemap::{self, PingSummary, SitemapError};
use crate::store::{AppendOutcome, ArticleRecord, MetadataStore, Seed, StoreError};
use chrono::Local;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Sitemap(#[from] SitemapError),
    #[error("source directory not found: {}", .0.display())]
    MissingSourceDir(PathBuf),
    #[error("failed to walk source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A project root with its loaded configuration.
#[derive(Debug, Clone)]
pub struct Site {
    pub root: PathBuf,
    pub config: SiteConfig,
    pub paths: ResolvedPaths,
}

impl Site {
    pub fn new(root: impl Into<PathBuf>, config: SiteConfig) -> Self {
        let root = root.into();
        let paths = config.resolve(&root);
        Self {
            root,
            config,
            paths,
        }
    }

    /// The metadata store. The seed file is only read when the store does
    /// not exist yet.
    pub fn store(&self) -> Result<MetadataStore, StoreError> {
        let seed = match &self.paths.seed_file {
            Some(seed_file) if !self.paths.metadata_file.exists() => Seed::from_file(seed_file)?,
            _ => Seed::empty(),
        };
        Ok(MetadataStore::new(&self.paths.metadata_file, seed))
    }
}

/// What publishing one article produced.
#[derive(Debug)]
pub struct ArticleReport {
    pub source: PathBuf,
    pub title: String,
    pub slug: String,
    pub page: PathBuf,
    pub outcome: AppendOutcome,
    pub warnings: Vec<DateParseWarning>,
}

/// Result of the `article` command.
#[derive(Debug)]
pub struct PublishReport {
    pub article: ArticleReport,
    pub blog_pages: Vec<PathBuf>,
}

/// Result of the `build` command.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub published: Vec<ArticleReport>,
    pub failed: Vec<(PathBuf, PipelineError)>,
    pub blog_pages: Vec<PathBuf>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Result of the `blog` command.
#[derive(Debug)]
pub struct BlogReport {
    pub articles: usize,
    pub pages: Vec<PathBuf>,
}

/// Result of the `sitemap` command.
#[derive(Debug)]
pub struct SitemapReport {
    pub path: PathBuf,
    pub static_pages: usize,
    pub service_areas: usize,
    pub articles: usize,
    /// `None` unless a ping was requested.
    pub ping: Option<PingSummary>,
}

impl SitemapReport {
    pub fn total(&self) -> usize {
        self.static_pages + self.service_areas + self.articles + 1
    }
}

/// Parse, render and record one article, without touching the blog index.
fn publish_one(input: &Path, site: &Site, strict: bool) -> Result<ArticleReport, PipelineError> {
    let parsed = parse::parse_article_file(input)?;
    for warning in &parsed.warnings {
        warn!(input = %input.display(), "{warning}");
    }
    let warnings = parsed.warnings.clone();
    let document = if strict {
        parsed.strict().map_err(|e| e.with_path(input))?
    } else {
        parsed.document
    };

    let page = render::write_article(&document, &site.paths.article_dir, &site.config)?;
    let record = ArticleRecord::from_document(&document, &site.config.paths.images_url);
    let outcome = site.store()?.append(record)?;

    Ok(ArticleReport {
        source: input.to_path_buf(),
        slug: document.slug(),
        title: document.title,
        page,
        outcome,
        warnings,
    })
}

/// Publish one article file and rewrite the blog index.
pub fn publish_article(
    input: &Path,
    site: &Site,
    strict: bool,
) -> Result<PublishReport, PipelineError> {
    let article = publish_one(input, site, strict)?;
    let blog_pages = rebuild_blog(site)?.pages;
    info!(slug = %article.slug, "published article");
    Ok(PublishReport {
        article,
        blog_pages,
    })
}

/// Source files consumed by `build`: every `.txt` under the source
/// directory, in file-name order.
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::MissingSourceDir(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let is_txt = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if entry.file_type().is_file() && is_txt {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Publish every source file. Per-file failures are collected; the blog
/// index is rewritten once at the end regardless.
pub fn publish_all(site: &Site, strict: bool) -> Result<BatchReport, PipelineError> {
    let files = source_files(&site.paths.source_dir)?;
    info!(count = files.len(), dir = %site.paths.source_dir.display(), "publishing sources");

    let mut report = BatchReport::default();
    for file in files {
        match publish_one(&file, site, strict) {
            Ok(article) => report.published.push(article),
            Err(e) => {
                error!(input = %file.display(), error = %e, "failed to publish article");
                report.failed.push((file, e));
            }
        }
    }
    report.blog_pages = rebuild_blog(site)?.pages;
    Ok(report)
}

/// Repaginate the blog index from the store.
pub fn rebuild_blog(site: &Site) -> Result<BlogReport, PipelineError> {
    let records = site.store()?.load()?;
    let pages = blog::write_blog(&records, &site.paths.blog_dir, &site.config)?;
    Ok(BlogReport {
        articles: records.len(),
        pages,
    })
}

/// Write the sitemap from the store and optionally notify search engines.
pub fn generate_sitemap(site: &Site, ping: bool) -> Result<SitemapReport, PipelineError> {
    let records = site.store()?.load()?;
    let today = Local::now().date_naive();
    let entries = sitemap::build_entries(&site.config, &records, &site.paths.article_dir, today);
    let xml = sitemap::render_xml(&entries);
    sitemap::write_sitemap(&site.paths.sitemap_file, &xml)?;

    let static_pages = site.config.sitemap.static_pages.len();
    let service_areas = site.config.sitemap.service_areas.len();
    let articles = entries.len() - static_pages - service_areas - 1;

    let ping = if ping {
        let endpoints = &site.config.sitemap.ping_endpoints;
        if endpoints.is_empty() {
            warn!("ping requested but sitemap.ping_endpoints is empty");
        }
        Some(sitemap::notify(
            endpoints,
            &sitemap::sitemap_url(&site.config),
            site.config.sitemap.ping_timeout(),
        ))
    } else {
        None
    };

    Ok(SitemapReport {
        path: site.paths.sitemap_file.clone(),
        static_pages,
        service_areas,
        articles,
        ping,
    })
}

// ============================================================================
// Tests
// ============================================================================
