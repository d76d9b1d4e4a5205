//! Paginated blog index.
//!
//! Every run rebuilds the whole index from the metadata store: records are
//! sorted newest first, chunked into pages of `blog.page_size`, and each
//! page is written to the blog directory.
//!
//! ## Output structure
//!
//! ```text
//! blog/
//! ├── index.html      # Page 1
//! ├── page-2.html
//! └── page-3.html
//! ```
//!
//! An empty store still produces `index.html` with no cards. Page files
//! left over from a larger store are deleted so the route set always
//! matches the store.

use crate::config::SiteConfig;
use crate::render::{self, RenderError};
use crate::store::ArticleRecord;
use maud::{Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One page of the blog index.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPage {
    /// 1-based page number.
    pub number: usize,
    /// Total number of pages in the index.
    pub total: usize,
    pub records: Vec<ArticleRecord>,
    /// `index.html` for page 1, `page-{n}.html` otherwise.
    pub file_name: String,
    /// File name of the previous page, if any.
    pub prev: Option<String>,
    /// File name of the next page, if any.
    pub next: Option<String>,
}

/// File name of a page in the blog directory.
pub fn page_file_name(number: usize) -> String {
    if number <= 1 {
        "index.html".to_string()
    } else {
        format!("page-{number}.html")
    }
}

/// Sort newest first. The sort is stable, so records sharing a date keep
/// their store order. Undated records sort last.
pub fn sort_records(records: &mut [ArticleRecord]) {
    records.sort_by_key(|r| std::cmp::Reverse(r.sort_date()));
}

/// Split sorted records into pages of `page_size`.
///
/// Yields `ceil(len / page_size)` pages, or a single empty page when there
/// are no records.
pub fn paginate(records: &[ArticleRecord], page_size: usize) -> Vec<BlogPage> {
    let page_size = page_size.max(1);
    let chunks: Vec<&[ArticleRecord]> = if records.is_empty() {
        vec![records]
    } else {
        records.chunks(page_size).collect()
    };
    let total = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let number = i + 1;
            BlogPage {
                number,
                total,
                records: chunk.to_vec(),
                file_name: page_file_name(number),
                prev: (number > 1).then(|| page_file_name(number - 1)),
                next: (number < total).then(|| page_file_name(number + 1)),
            }
        })
        .collect()
}

/// Link from a blog page to an article page.
fn article_href(record: &ArticleRecord, config: &SiteConfig) -> String {
    let dir = config.paths.article_dir.to_string_lossy().replace('\\', "/");
    format!("../{}/{}.html", dir.trim_end_matches('/'), record.slug())
}

fn article_card(record: &ArticleRecord, config: &SiteConfig) -> Markup {
    let href = article_href(record, config);
    html! {
        div.blog-card {
            a href=(href) {
                @if !record.image.is_empty() {
                    img.blog-image src=(record.image) alt=(record.title);
                }
                div.blog-card-text {
                    h2 { (record.title) }
                    p.blog-meta {
                        (record.date)
                        @if !record.mins.is_empty() { "  -  " (record.mins) }
                    }
                    p.blog-summary { (record.summary) }
                }
            }
        }
    }
}

fn pagination(page: &BlogPage) -> Markup {
    html! {
        nav.pagination aria-label="Blog pages" {
            @if let Some(prev) = &page.prev {
                a.prev href=(prev) { "Previous" }
            }
            span.page-count { "Page " (page.number) " of " (page.total) }
            @if let Some(next) = &page.next {
                a.next href=(next) { "Next" }
            }
        }
    }
}

/// Renders one blog index page.
pub fn render_blog_page(page: &BlogPage, config: &SiteConfig) -> Markup {
    let title = if page.number == 1 {
        format!("{} Blog", config.site.name)
    } else {
        format!("{} Blog - Page {}", config.site.name, page.number)
    };
    let description = format!("Articles and guides from {}.", config.site.name);
    let content = html! {
        main {
            section.blog-main {
                h1 { "Blog" }
                div.blog-grid {
                    @for record in &page.records {
                        (article_card(record, config))
                    }
                }
                (pagination(page))
            }
        }
    };
    render::base_document(&title, &description, config, content)
}

/// Sort, paginate and write the blog index into `dir`.
///
/// Returns the written paths in page order.
pub fn write_blog(
    records: &[ArticleRecord],
    dir: &Path,
    config: &SiteConfig,
) -> Result<Vec<PathBuf>, RenderError> {
    let mut sorted = records.to_vec();
    sort_records(&mut sorted);
    let pages = paginate(&sorted, config.blog.page_size);

    let mut written = Vec::with_capacity(pages.len());
    for page in &pages {
        let path = dir.join(&page.file_name);
        render::write_page(&path, render_blog_page(page, config))?;
        debug!(page = page.number, records = page.records.len(), "wrote blog page");
        written.push(path);
    }
    remove_stale_pages(dir, pages.len());
    info!(
        pages = pages.len(),
        articles = sorted.len(),
        dir = %dir.display(),
        "wrote blog index"
    );
    Ok(written)
}

/// Delete `page-{n}.html` files with `n > total`.
fn remove_stale_pages(dir: &Path, total: usize) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(number) = name
            .to_str()
            .and_then(|n| n.strip_prefix("page-"))
            .and_then(|n| n.strip_suffix(".html"))
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };
        if number > total {
            match fs::remove_file(entry.path()) {
                Ok(()) => info!(path = %entry.path().display(), "removed stale blog page"),
                Err(e) => warn!(path = %entry.path().display(), error = %e, "could not remove stale blog page"),
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
