//! Site configuration.
//!
//! Handles loading, validating, and merging `site.toml`. Stock defaults
//! describe the conventional layout; a `site.toml` in the project root
//! overrides any subset of them. All paths are relative to the project root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Provision Bookkeeping"
//! base_url = "https://provisionbk.com"
//! nav = [
//!     { label = "Home", href = "../" },
//!     { label = "About", href = "../about-us" },
//!     { label = "Blog", href = "../blog" },
//!     { label = "Contact", href = "../contact-us" },
//! ]
//!
//! [paths]
//! source_dir = "articles/source"     # Text files consumed by `build`
//! article_dir = "articles"           # Rendered article pages
//! blog_dir = "blog"                  # Paginated blog index
//! metadata_file = "articles/articles_metadata.json"
//! sitemap_file = "public/sitemap.xml"
//! images_url = "../Article_Images/"  # Prefix for article images
//!
//! [blog]
//! page_size = 6
//!
//! [store]
//! # seed_file = "articles/seed.json" # Records written to a fresh store
//!
//! [sitemap]
//! static_pages = ["/", "/about-us", "/services", ...]
//! key_pages = ["/services", "/blog"] # Priority 0.9 instead of 0.5
//! service_areas = ["gilbert-az-bookkeeping", ...]
//! ping_endpoints = []
//! ping_timeout_secs = 5
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the config file looked up in the project root.
pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and navigation chrome.
    pub site: SiteInfo,
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Blog listing settings.
    pub blog: BlogConfig,
    /// Metadata store settings.
    pub store: StoreConfig,
    /// Sitemap routes and ping targets.
    pub sitemap: SitemapConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blog.page_size == 0 {
            return Err(ConfigError::Validation(
                "blog.page_size must be at least 1".into(),
            ));
        }
        if self.sitemap.ping_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "sitemap.ping_timeout_secs must be at least 1".into(),
            ));
        }
        let base = &self.site.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "site.base_url must be an http(s) URL, got {base:?}"
            )));
        }
        if base.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.base_url must not end with '/'".into(),
            ));
        }
        if let Some(page) = self.sitemap.static_pages.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::Validation(format!(
                "sitemap.static_pages entries must start with '/', got {page:?}"
            )));
        }
        Ok(())
    }

    /// Resolve every configured path against the project root.
    pub fn resolve(&self, root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            source_dir: root.join(&self.paths.source_dir),
            article_dir: root.join(&self.paths.article_dir),
            blog_dir: root.join(&self.paths.blog_dir),
            metadata_file: root.join(&self.paths.metadata_file),
            sitemap_file: root.join(&self.paths.sitemap_file),
            seed_file: self.store.seed_file.as_ref().map(|p| root.join(p)),
        }
    }
}

/// Site identity and navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Business name shown in the header, footer, and page titles.
    pub name: String,
    /// Absolute site URL without trailing slash; prefixes sitemap locations.
    pub base_url: String,
    /// Header navigation links.
    pub nav: Vec<NavLink>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "Provision Bookkeeping".to_string(),
            base_url: "https://provisionbk.com".to_string(),
            nav: vec![
                NavLink::new("Home", "../"),
                NavLink::new("About", "../about-us"),
                NavLink::new("Blog", "../blog"),
                NavLink::new("Contact", "../contact-us"),
            ],
        }
    }
}

/// One header navigation link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// Input and output locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory of article text files consumed by `build`.
    pub source_dir: PathBuf,
    /// Where rendered article pages are written (`{slug}.html`).
    pub article_dir: PathBuf,
    /// Where blog index pages are written.
    pub blog_dir: PathBuf,
    /// The metadata store JSON file.
    pub metadata_file: PathBuf,
    /// The sitemap XML file.
    pub sitemap_file: PathBuf,
    /// URL prefix for article images as referenced from article pages.
    pub images_url: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("articles/source"),
            article_dir: PathBuf::from("articles"),
            blog_dir: PathBuf::from("blog"),
            metadata_file: PathBuf::from("articles/articles_metadata.json"),
            sitemap_file: PathBuf::from("public/sitemap.xml"),
            images_url: "../Article_Images/".to_string(),
        }
    }
}

/// Blog listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Articles per listing page.
    pub page_size: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self { page_size: 6 }
    }
}

/// Metadata store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// JSON file of records written to the store when it does not exist yet.
    pub seed_file: Option<PathBuf>,
}

/// Sitemap routes and search-engine notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Fixed site routes. `/` gets priority 1.0.
    pub static_pages: Vec<String>,
    /// Static routes promoted to priority 0.9; the rest get 0.5.
    pub key_pages: Vec<String>,
    /// Service-area route slugs (priority 0.8, monthly).
    pub service_areas: Vec<String>,
    /// Endpoints pinged with `?sitemap=<url>` after writing, when requested.
    pub ping_endpoints: Vec<String>,
    /// Per-request timeout for pings.
    pub ping_timeout_secs: u64,
}

impl SitemapConfig {
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        let strings =
            |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            static_pages: strings(&[
                "/",
                "/about-us",
                "/services",
                "/contact-us",
                "/blog",
                "/privacy-policy",
                "/terms-of-service",
                "/sitemap",
            ]),
            key_pages: strings(&["/services", "/blog"]),
            service_areas: strings(&[
                "gilbert-az-bookkeeping",
                "phoenix-az-bookkeeping",
                "scottsdale-az-bookkeeping",
                "tempe-az-bookkeeping",
                "tucson-az-bookkeeping",
                "mesa-az-bookkeeping",
                "chandler-az-bookkeeping",
                "glendale-az-bookkeeping",
                "peoria-az-bookkeeping",
                "surprise-az-bookkeeping",
                "yuma-az-bookkeeping",
            ]),
            ping_endpoints: Vec::new(),
            ping_timeout_secs: 5,
        }
    }
}

/// Configured paths joined onto the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub source_dir: PathBuf,
    pub article_dir: PathBuf,
    pub blog_dir: PathBuf,
    pub metadata_file: PathBuf,
    pub sitemap_file: PathBuf,
    pub seed_file: Option<PathBuf>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// [`SiteConfig::default`] as a TOML table, the layer `site.toml` sits on.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Lay `site` over `defaults`, key by key.
///
/// Only tables merge: a `[sitemap]` table in `site.toml` that sets
/// `key_pages` keeps the stock `static_pages`, but the `key_pages` list it
/// gives replaces the stock list whole.
pub fn merge_toml(defaults: toml::Value, site: toml::Value) -> toml::Value {
    match (defaults, site) {
        (toml::Value::Table(mut merged), toml::Value::Table(site)) => {
            for (key, value) in site {
                let value = match merged.remove(&key) {
                    Some(default) => merge_toml(default, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, site) => site,
    }
}

/// Parse `{root}/site.toml`, or `None` when the project has none.
fn read_site_toml(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    Ok(Some(toml::from_str(&fs::read_to_string(&path)?)?))
}

/// The project's config: stock defaults, overridden by `site.toml` when
/// present, then checked by [`SiteConfig::validate`].
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let mut value = stock_defaults_value();
    if let Some(site) = read_site_toml(root)? {
        value = merge_toml(value, site);
    }
    let config: SiteConfig = value.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site configuration
# ==================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the project
# root (the --root option, default: current directory).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Business name used in page titles, header, and footer.
name = "Provision Bookkeeping"

# Absolute URL of the live site, without trailing slash.
base_url = "https://provisionbk.com"

# Header navigation, relative to the article and blog directories.
nav = [
    { label = "Home", href = "../" },
    { label = "About", href = "../about-us" },
    { label = "Blog", href = "../blog" },
    { label = "Contact", href = "../contact-us" },
]

# ---------------------------------------------------------------------------
# Locations
# ---------------------------------------------------------------------------
[paths]
# Article text files processed by `build`.
source_dir = "articles/source"

# Rendered article pages ({slug}.html).
article_dir = "articles"

# Paginated blog index (index.html, page-2.html, ...).
blog_dir = "blog"

# Metadata store.
metadata_file = "articles/articles_metadata.json"

# Sitemap output.
sitemap_file = "public/sitemap.xml"

# Prefix for article images as referenced from article pages.
images_url = "../Article_Images/"

# ---------------------------------------------------------------------------
# Blog index
# ---------------------------------------------------------------------------
[blog]
# Articles per listing page.
page_size = 6

# ---------------------------------------------------------------------------
# Metadata store
# ---------------------------------------------------------------------------
[store]
# Records written to the store the first time it is created.
# seed_file = "articles/seed.json"

# ---------------------------------------------------------------------------
# Sitemap
# ---------------------------------------------------------------------------
[sitemap]
# Fixed routes. "/" gets priority 1.0, key pages 0.9, the rest 0.5.
static_pages = [
    "/",
    "/about-us",
    "/services",
    "/contact-us",
    "/blog",
    "/privacy-policy",
    "/terms-of-service",
    "/sitemap",
]
key_pages = ["/services", "/blog"]

# Service-area routes (priority 0.8, monthly).
service_areas = [
    "gilbert-az-bookkeeping",
    "phoenix-az-bookkeeping",
    "scottsdale-az-bookkeeping",
    "tempe-az-bookkeeping",
    "tucson-az-bookkeeping",
    "mesa-az-bookkeeping",
    "chandler-az-bookkeeping",
    "glendale-az-bookkeeping",
    "peoria-az-bookkeeping",
    "surprise-az-bookkeeping",
    "yuma-az-bookkeeping",
]

# Notified with GET <endpoint>?sitemap=<sitemap url> by `sitemap --ping`.
ping_endpoints = []

# Per-request timeout for pings.
ping_timeout_secs = 5
"##
}
