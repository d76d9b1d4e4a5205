//! Sitemap generation and search-engine notification.
//!
//! The sitemap lists every public route in four groups, in this order:
//!
//! | Group | Priority | Change freq | Last modified |
//! |-------|----------|-------------|---------------|
//! | Static pages | `/` 1.0, key pages 0.9, others 0.5 | weekly | today |
//! | Service areas | 0.8 | monthly | today |
//! | Articles (`articles/{slug}.html`) | 0.9 | weekly | see below |
//! | The sitemap itself | 0.3 | monthly | today |
//!
//! An article's last-modified date is the first available of:
//!
//! 1. modification time of the rendered page, in local time
//! 2. the record's `parsed_date`
//! 3. a re-parse of the record's raw `date`
//! 4. today
//!
//! Falling back past (1) is logged, since it means the page is missing.
//!
//! Notification is a best-effort GET of `{endpoint}?sitemap={url}` against
//! each configured endpoint. Failures are collected, never propagated.

use crate::config::SiteConfig;
use crate::dates;
use crate::store::ArticleRecord;
use chrono::{DateTime, Local, NaiveDate};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Route prefix of article pages on the live site.
const ARTICLE_ROUTE: &str = "articles";
const SITEMAP_ROUTE: &str = "/sitemap.xml";

const PRIORITY_HOME: f32 = 1.0;
const PRIORITY_KEY: f32 = 0.9;
const PRIORITY_STATIC: f32 = 0.5;
const PRIORITY_AREA: f32 = 0.8;
const PRIORITY_ARTICLE: f32 = 0.9;
const PRIORITY_SELF: f32 = 0.3;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A failed ping. Logged by callers, never fatal.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("ping to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Where an article's last-modified date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastmodSource {
    PageFile,
    ParsedDate,
    DateField,
    Today,
}

impl LastmodSource {
    fn describe(self) -> &'static str {
        match self {
            LastmodSource::PageFile => "page file",
            LastmodSource::ParsedDate => "parsed_date",
            LastmodSource::DateField => "date field",
            LastmodSource::Today => "today",
        }
    }
}

/// Absolute URL of the sitemap itself.
pub fn sitemap_url(config: &SiteConfig) -> String {
    format!("{}{}", config.site.base_url, SITEMAP_ROUTE)
}

fn static_priority(page: &str, config: &SiteConfig) -> f32 {
    if page == "/" {
        PRIORITY_HOME
    } else if config.sitemap.key_pages.iter().any(|k| k == page) {
        PRIORITY_KEY
    } else {
        PRIORITY_STATIC
    }
}

/// Last-modified date of an article and where it came from.
pub fn article_lastmod(
    record: &ArticleRecord,
    page: &Path,
    today: NaiveDate,
) -> (NaiveDate, LastmodSource) {
    if let Ok(modified) = fs::metadata(page).and_then(|m| m.modified()) {
        let local: DateTime<Local> = modified.into();
        return (local.date_naive(), LastmodSource::PageFile);
    }
    if let Some(date) = record.parsed_date {
        return (date, LastmodSource::ParsedDate);
    }
    if let Some(date) = dates::parse_date(&record.date) {
        return (date, LastmodSource::DateField);
    }
    (today, LastmodSource::Today)
}

/// Build the full entry list.
///
/// `article_dir` is where rendered pages live on disk; it is only used for
/// modification times. Records with neither a title nor a stored slug are
/// skipped.
pub fn build_entries(
    config: &SiteConfig,
    records: &[ArticleRecord],
    article_dir: &Path,
    today: NaiveDate,
) -> Vec<SitemapEntry> {
    let base = &config.site.base_url;
    let mut entries = Vec::with_capacity(
        config.sitemap.static_pages.len()
            + config.sitemap.service_areas.len()
            + records.len()
            + 1,
    );

    for page in &config.sitemap.static_pages {
        entries.push(SitemapEntry {
            loc: format!("{base}{page}"),
            lastmod: today,
            changefreq: ChangeFreq::Weekly,
            priority: static_priority(page, config),
        });
    }

    for area in &config.sitemap.service_areas {
        entries.push(SitemapEntry {
            loc: format!("{base}/{}", area.trim_start_matches('/')),
            lastmod: today,
            changefreq: ChangeFreq::Monthly,
            priority: PRIORITY_AREA,
        });
    }

    for record in records {
        let slug = record.slug();
        if slug.is_empty() {
            warn!(title = %record.title, "skipping record with no slug");
            continue;
        }
        let file_name = format!("{slug}.html");
        let page = article_dir.join(&file_name);
        let (lastmod, source) = article_lastmod(record, &page, today);
        if source != LastmodSource::PageFile {
            warn!(
                page = %page.display(),
                source = source.describe(),
                "article page not found; using fallback lastmod"
            );
        }
        entries.push(SitemapEntry {
            loc: format!("{base}/{ARTICLE_ROUTE}/{file_name}"),
            lastmod,
            changefreq: ChangeFreq::Weekly,
            priority: PRIORITY_ARTICLE,
        });
    }

    entries.push(SitemapEntry {
        loc: sitemap_url(config),
        lastmod: today,
        changefreq: ChangeFreq::Monthly,
        priority: PRIORITY_SELF,
    });

    entries
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Serialize entries as a sitemaps.org `<urlset>` document.
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\n");
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n\n",
            escape_xml(&entry.loc),
            entry.lastmod.format("%Y-%m-%d"),
            entry.changefreq.as_str(),
            entry.priority,
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Write the sitemap, creating the parent directory.
pub fn write_sitemap(path: &Path, xml: &str) -> Result<(), SitemapError> {
    let write_err = |source| SitemapError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, xml).map_err(write_err)?;
    info!(path = %path.display(), "wrote sitemap");
    Ok(())
}

/// Outcome of [`notify`].
#[derive(Debug, Default)]
pub struct PingSummary {
    /// Endpoints that answered with a success status.
    pub notified: Vec<String>,
    pub failed: Vec<NotificationError>,
}

/// Ping every endpoint with `GET {endpoint}?sitemap={sitemap_url}`.
pub fn notify(endpoints: &[String], sitemap_url: &str, timeout: Duration) -> PingSummary {
    let mut summary = PingSummary::default();
    if endpoints.is_empty() {
        return summary;
    }
    let client = match reqwest::blocking::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            let err = NotificationError::Client(e);
            warn!(error = %err, "sitemap notification skipped");
            summary.failed.push(err);
            return summary;
        }
    };
    for endpoint in endpoints {
        let result = client
            .get(endpoint)
            .query(&[("sitemap", sitemap_url)])
            .send()
            .and_then(|resp| resp.error_for_status());
        match result {
            Ok(resp) => {
                info!(%endpoint, status = %resp.status(), "notified search engine");
                summary.notified.push(endpoint.clone());
            }
            Err(source) => {
                let err = NotificationError::Request {
                    endpoint: endpoint.clone(),
                    source,
                };
                warn!(error = %err, "sitemap notification failed");
                summary.failed.push(err);
            }
        }
    }
    summary
}

// ============================================================================
// Tests
// ============================================================================
