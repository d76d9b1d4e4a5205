//! End-to-end runs of the publishing pipeline against a temp project root.

use provision_press::config::{SiteConfig, load_config};
use provision_press::pipeline::{self, Site};
use provision_press::store::{AppendOutcome, ArticleRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures/articles")
        .join(name)
}

/// Empty project root with one fixture copied into the source directory.
fn project_with(names: &[&str]) -> (TempDir, Site) {
    let tmp = TempDir::new().unwrap();
    let site = Site::new(tmp.path(), SiteConfig::default());
    fs::create_dir_all(&site.paths.source_dir).unwrap();
    for name in names {
        fs::copy(fixture(name), site.paths.source_dir.join(name)).unwrap();
    }
    (tmp, site)
}

fn load_records(site: &Site) -> Vec<ArticleRecord> {
    serde_json::from_str(&fs::read_to_string(&site.paths.metadata_file).unwrap()).unwrap()
}

#[test]
fn sample_post_end_to_end() {
    let (tmp, site) = project_with(&["sample_post.txt"]);
    let input = site.paths.source_dir.join("sample_post.txt");

    let report = pipeline::publish_article(&input, &site, false).unwrap();
    assert_eq!(report.article.outcome, AppendOutcome::Inserted);

    // Article page
    let page = tmp.path().join("articles/Sample_Post.html");
    let html = fs::read_to_string(&page).unwrap();
    assert!(html.contains("<h1>Sample Post</h1>"));
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("../Article_Images/ledger.jpg"));
    assert!(html.contains("<h2>Start With a Budget</h2>"));
    assert!(html.contains("<h2>Final Thoughts</h2>"));

    // Store record
    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&site.paths.metadata_file).unwrap()).unwrap();
    let record = &raw[0];
    assert_eq!(record["safe_title"], "Sample_Post");
    assert_eq!(record["date"], "March 5, 2024");
    assert_eq!(record["parsed_date"], "2024-03-05T00:00:00");
    assert_eq!(record["mins"], "4 min read");
    assert_eq!(record["image"], "../Article_Images/ledger.jpg");
    assert_eq!(
        record["summary"],
        "Keeping books is easier than it looks. A few habits go a long way."
    );

    // Blog index lists it first on page 1
    let blog = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
    assert!(blog.contains(r#"href="../articles/Sample_Post.html""#));
    assert!(!blog.contains(r#"class="prev""#));
    assert!(!blog.contains(r#"class="next""#));

    // Sitemap entry
    let sitemap = pipeline::generate_sitemap(&site, false).unwrap();
    assert_eq!(sitemap.total(), 8 + 11 + 1 + 1);
    let xml = fs::read_to_string(tmp.path().join("public/sitemap.xml")).unwrap();
    let block = xml
        .split("<url>")
        .find(|b| b.contains("articles/Sample_Post.html"))
        .unwrap();
    assert!(block.contains("<loc>https://provisionbk.com/articles/Sample_Post.html</loc>"));
    assert!(block.contains("<changefreq>weekly</changefreq>"));
    assert!(block.contains("<priority>0.9</priority>"));
}

#[test]
fn newest_article_listed_first() {
    let (tmp, site) = project_with(&["sample_post.txt", "quarterly_taxes.txt"]);
    for name in ["sample_post.txt", "quarterly_taxes.txt"] {
        pipeline::publish_article(&site.paths.source_dir.join(name), &site, false).unwrap();
    }

    let blog = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
    let newer = blog.find("Estimated_Taxes_A_Quarterly_Checklist.html").unwrap();
    let older = blog.find("Sample_Post.html").unwrap();
    assert!(newer < older);

    // Store order is append order, not date order
    let titles: Vec<String> = load_records(&site).into_iter().map(|r| r.title).collect();
    assert_eq!(
        titles,
        vec!["Sample Post", "Estimated Taxes: A Quarterly Checklist"]
    );
}

#[test]
fn explicit_section_article_keeps_numbered_list() {
    let (tmp, site) = project_with(&["quarterly_taxes.txt"]);
    pipeline::publish_article(
        &site.paths.source_dir.join("quarterly_taxes.txt"),
        &site,
        false,
    )
    .unwrap();

    let html = fs::read_to_string(
        tmp.path()
            .join("articles/Estimated_Taxes_A_Quarterly_Checklist.html"),
    )
    .unwrap();
    assert!(html.contains("<h2>Know the Deadlines</h2>"));
    assert!(html.contains("<h2>Set Money Aside</h2>"));
    assert!(html.contains("1. Open a savings account."));
    assert!(html.contains("Plan early and the deadlines stop being stressful."));

    let records = load_records(&site);
    assert_eq!(records[0].mins, "6 min read");
    assert_eq!(
        records[0].summary,
        "Quarterly estimates catch many new business owners off guard. This checklist keeps you ahead of each deadline."
    );
}

#[test]
fn build_publishes_everything_and_reports_failures() {
    let (tmp, site) = project_with(&[
        "sample_post.txt",
        "quarterly_taxes.txt",
        "undated_note.txt",
        "no_title.txt",
    ]);

    let report = pipeline::publish_all(&site, false).unwrap();
    assert_eq!(report.published.len(), 3);
    assert_eq!(report.failed.len(), 1);

    // Undated article sorts last
    let blog = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
    let undated = blog.find("Year-End_Notes.html").unwrap();
    let sample = blog.find("Sample_Post.html").unwrap();
    assert!(sample < undated);

    // Second build changes nothing in the store
    let before = fs::read_to_string(&site.paths.metadata_file).unwrap();
    let again = pipeline::publish_all(&site, false).unwrap();
    assert!(
        again
            .published
            .iter()
            .all(|a| a.outcome == AppendOutcome::Duplicate)
    );
    assert_eq!(fs::read_to_string(&site.paths.metadata_file).unwrap(), before);
}

#[test]
fn blog_paginates_after_six_articles() {
    let (tmp, site) = project_with(&[]);
    let template = fs::read_to_string(fixture("sample_post.txt")).unwrap();
    for day in 1..=7 {
        let text = template
            .replace("Title: Sample Post", &format!("Title: Post {day}"))
            .replace("Date: March 5, 2024", &format!("Date: 03/{day:02}/2024"));
        fs::write(site.paths.source_dir.join(format!("post_{day}.txt")), text).unwrap();
    }

    let report = pipeline::publish_all(&site, false).unwrap();
    assert_eq!(report.blog_pages.len(), 2);

    let first = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
    let second = fs::read_to_string(tmp.path().join("blog/page-2.html")).unwrap();
    assert!(first.contains("Post_7.html"));
    assert!(!first.contains("Post_1.html"));
    assert!(second.contains("Post_1.html"));
    assert!(first.contains(r#"href="page-2.html""#));
    assert!(second.contains(r#"href="index.html""#));
}

#[test]
fn config_overrides_layout() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("site.toml"),
        r#"
[paths]
article_dir = "out/articles"
blog_dir = "out/blog"
metadata_file = "data/meta.json"

[blog]
page_size = 1
"#,
    )
    .unwrap();
    let site = Site::new(tmp.path(), load_config(tmp.path()).unwrap());
    fs::create_dir_all(&site.paths.source_dir).unwrap();
    for name in ["sample_post.txt", "quarterly_taxes.txt"] {
        fs::copy(fixture(name), site.paths.source_dir.join(name)).unwrap();
    }

    let report = pipeline::publish_all(&site, false).unwrap();
    assert_eq!(report.blog_pages.len(), 2);
    assert!(tmp.path().join("out/articles/Sample_Post.html").exists());
    assert!(tmp.path().join("out/blog/page-2.html").exists());
    assert!(tmp.path().join("data/meta.json").exists());
}

#[test]
fn symbol_only_titles_publish_as_separate_articles() {
    let (tmp, site) = project_with(&[]);
    let template = fs::read_to_string(fixture("sample_post.txt")).unwrap();
    for (file, title) in [("symbols.txt", "???"), ("kanji.txt", "日本語")] {
        let text = template.replace("Title: Sample Post", &format!("Title: {title}"));
        fs::write(site.paths.source_dir.join(file), text).unwrap();
    }

    let report = pipeline::publish_all(&site, false).unwrap();
    assert!(report.failed.is_empty());
    assert!(
        report
            .published
            .iter()
            .all(|a| a.outcome == AppendOutcome::Inserted && a.slug.starts_with("article-"))
    );
    assert!(!tmp.path().join("articles/.html").exists());
    for article in &report.published {
        assert!(article.page.exists(), "{}", article.page.display());
    }

    let records = load_records(&site);
    assert_eq!(records.len(), 2);
    let sitemap = pipeline::generate_sitemap(&site, false).unwrap();
    assert_eq!(sitemap.total(), 8 + 11 + 2 + 1);
}

#[test]
fn hand_edited_parsed_date_does_not_break_blog_or_sitemap() {
    let (tmp, site) = project_with(&[]);
    fs::create_dir_all(site.paths.metadata_file.parent().unwrap()).unwrap();
    fs::write(
        &site.paths.metadata_file,
        r#"[
  {"title":"Old","summary":"","author":"","date":"October 3, 2025","parsed_date":"10/03/2025","mins":"","image":"","safe_title":"Old"},
  {"title":"Older","summary":"","author":"","date":"whenever","parsed_date":"not a date","mins":"","image":"","safe_title":"Older"}
]"#,
    )
    .unwrap();

    pipeline::rebuild_blog(&site).unwrap();
    let blog = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
    assert!(blog.find("Old.html").unwrap() < blog.find("Older.html").unwrap());

    let sitemap = pipeline::generate_sitemap(&site, false).unwrap();
    assert_eq!(sitemap.total(), 8 + 11 + 2 + 1);
    let xml = fs::read_to_string(tmp.path().join("public/sitemap.xml")).unwrap();
    let block = xml.split("<url>").find(|b| b.contains("/Old.html")).unwrap();
    assert!(block.contains("<lastmod>2025-10-03</lastmod>"));
}

#[test]
fn undated_article_sorts_after_pre_epoch_article() {
    let (tmp, site) = project_with(&["undated_note.txt"]);
    let template = fs::read_to_string(fixture("sample_post.txt")).unwrap();
    let founding = template
        .replace("Title: Sample Post", "Title: Founding Memo")
        .replace("Date: March 5, 2024", "Date: 12/31/1969");
    fs::write(site.paths.source_dir.join("founding.txt"), founding).unwrap();

    pipeline::publish_all(&site, false).unwrap();

    let blog = fs::read_to_string(tmp.path().join("blog/index.html")).unwrap();
    let founding = blog.find("Founding_Memo.html").unwrap();
    let undated = blog.find("Year-End_Notes.html").unwrap();
    assert!(founding < undated);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&site.paths.metadata_file).unwrap()).unwrap();
    let undated = raw
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["safe_title"] == "Year-End_Notes")
        .unwrap();
    assert!(undated["parsed_date"].is_null());
}
