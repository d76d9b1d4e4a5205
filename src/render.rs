//! Article page rendering.
//!
//! Combines a parsed [`ArticleDocument`] with the site chrome (stylesheets,
//! header navigation, footer, menu script) into one HTML page per article,
//! written to `{article_dir}/{slug}.html`. Republishing overwrites the file.
//!
//! HTML is produced with [maud](https://maud.lambda.xyz/), so every
//! interpolated value is escaped. Interpolation points on an article page:
//!
//! | Value | Where |
//! |-------|-------|
//! | title | `<title>`, `<h1>`, image `alt` |
//! | summary | meta description (first 160 chars), summary block |
//! | author, display date, read time | byline |
//! | image path | `<img src>` (`{images_url}{image}`) |
//! | sections | `<h2>` + one `<p>` per paragraph |
//! | final thoughts | closing "Final Thoughts" section, when present |
//!
//! The chrome helpers are shared with the blog index ([`crate::blog`]).

use crate::config::{NavLink, SiteConfig};
use crate::dates;
use crate::naming;
use crate::types::{self, ArticleDocument};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Stylesheets linked from every page, relative to the page directory.
const STYLESHEETS: &[&str] = &[
    "../Styles/Header.css",
    "../Styles/Opening Picture.css",
    "../Styles/How_We_Differ.css",
    "../Styles/Welcome.css",
    "../Styles/How_It_Works.css",
    "../Styles/contact-us.css",
    "../Styles/Footer.css",
    "../Styles/About_Us.css",
    "../Styles/Blog.css",
    "../Styles/Articles.css",
];

const FONTS: &str =
    "https://fonts.googleapis.com/css2?family=Montserrat:wght@400;800&display=swap";
const LOGO: &str = "../Provision Bookkeeping Logo.ico.png";
const BLOG_HREF: &str = "../blog";
const FOOTER_ADDRESS: &str = "865 East Baseline Rd #1091, Gilbert, AZ 85233";
const FOOTER_MAP: &str = "https://www.google.com/maps/search/?api=1&query=865+East+Baseline+Rd+%231091,+Gilbert,+AZ+85233";
const FOOTER_PHONE: &str = "602-767-3829";
const FOOTER_EMAIL: &str = "contact@provisionbk.com";

const MENU_JS: &str = r#"
    const menuToggle = document.querySelector('.menu-toggle');
    const navMenu = document.querySelector('.nav-menu');
    menuToggle.addEventListener('click', () => {
        navMenu.classList.toggle('active');
    });
"#;

/// Meta descriptions are cut to this many characters.
const META_DESCRIPTION_LEN: usize = 160;

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document: head, header, `content`, footer, script.
pub fn base_document(
    title: &str,
    description: &str,
    config: &SiteConfig,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(naming::truncate_chars(description, META_DESCRIPTION_LEN));
                title { (title) }
                @for sheet in STYLESHEETS {
                    link rel="stylesheet" href=(sheet);
                }
                link href=(FONTS) rel="stylesheet";
            }
            body {
                (site_header(&config.site.name, &config.site.nav))
                (content)
                (site_footer(&config.site.name))
                script { (PreEscaped(MENU_JS)) }
            }
        }
    }
}

/// Renders the site header with logo and navigation menu.
fn site_header(site_name: &str, nav: &[NavLink]) -> Markup {
    html! {
        header {
            div.header-container {
                a.logo href="/" {
                    img src=(LOGO) alt={ (site_name) " LLC Logo" };
                    span { (site_name.to_uppercase()) }
                }
                (render_nav(nav))
                button.menu-toggle aria-label="Toggle navigation" { "☰" }
            }
        }
    }
}

/// Renders the navigation menu.
pub fn render_nav(items: &[NavLink]) -> Markup {
    html! {
        nav.nav-menu {
            @for item in items {
                a href=(item.href) { (item.label) }
            }
        }
    }
}

fn site_footer(site_name: &str) -> Markup {
    html! {
        footer role="contentinfo" {
            div.footer-content {
                img src=(LOGO) alt=(site_name) style="height: 20px;";
                "© " (site_name) " LLC "
                a href=(FOOTER_MAP) target="_blank" rel="noopener noreferrer" {
                    (FOOTER_ADDRESS)
                }
                br;
                a href={ "tel:+1" (FOOTER_PHONE.replace('-', "")) } { (FOOTER_PHONE) }
                " | "
                a href={ "mailto:" (FOOTER_EMAIL) } { (FOOTER_EMAIL) }
            }
        }
    }
}

fn back_link(class: &str) -> Markup {
    html! {
        section class=(class) {
            a href=(BLOG_HREF) { p { "Back" } }
        }
    }
}

fn paragraphs(text: &str) -> Markup {
    html! {
        @for para in types::paragraphs(text) {
            p { (para) }
        }
    }
}

// ============================================================================
// Article page
// ============================================================================

/// Image `src` for an article: `images_url` + filename, empty without image.
pub fn image_path(doc: &ArticleDocument, config: &SiteConfig) -> String {
    if doc.image.is_empty() {
        String::new()
    } else {
        format!("{}{}", config.paths.images_url, doc.image)
    }
}

/// Renders one article page.
pub fn render_article(doc: &ArticleDocument, config: &SiteConfig) -> Markup {
    let display_date = dates::display_date(&doc.date_raw);
    let byline = match (display_date.is_empty(), doc.read_time.is_empty()) {
        (false, false) => format!("{}  -  {}", display_date, doc.read_time),
        (false, true) => display_date,
        (true, _) => doc.read_time.clone(),
    };
    let image = image_path(doc, config);

    let content = html! {
        main {
            (back_link("previous_page1"))
            section.article-main {
                div.article-title { h1 { (doc.title) } }
            }
            div.date-author {
                p { (doc.author) }
                p { (byline) }
            }
            article {
                div.article-image-summary {
                    @if !image.is_empty() {
                        img.article-image src=(image) alt=(doc.title);
                    }
                    div.article-summary { (doc.summary) }
                }
                @for section in &doc.sections {
                    section {
                        h2 { (section.title) }
                        (paragraphs(&section.content))
                    }
                }
                @if !doc.final_thoughts.is_empty() {
                    section {
                        h2 { "Final Thoughts" }
                        (paragraphs(&doc.final_thoughts))
                    }
                }
            }
            (back_link("previous_page2"))
        }
    };

    base_document(&doc.title, &doc.summary, config, content)
}

/// Render an article and write it to `{article_dir}/{slug}.html`.
pub fn write_article(
    doc: &ArticleDocument,
    article_dir: &Path,
    config: &SiteConfig,
) -> Result<PathBuf, RenderError> {
    let path = article_dir.join(doc.file_name());
    write_page(&path, render_article(doc, config))?;
    info!(path = %path.display(), "wrote article page");
    Ok(path)
}

/// Write rendered markup to `path`, creating the parent directory.
pub fn write_page(path: &Path, markup: Markup) -> Result<(), RenderError> {
    let write_err = |source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, markup.into_string()).map_err(write_err)
}

// ============================================================================
// Tests
// ============================================================================
