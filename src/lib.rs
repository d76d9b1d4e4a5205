//! # Provision Press
//!
//! The build-time content pipeline behind a small business website. Writers
//! hand over loosely formatted plain-text articles; this crate turns each one
//! into a styled HTML page, records it in a JSON metadata store, and rebuilds
//! the paginated blog index and the XML sitemap from that store.
//!
//! # Architecture: One Store, Three Outputs
//!
//! ```text
//!                       ┌──────────────► articles/{slug}.html
//! article.txt ─► parse ─┤
//!                       └─► store ──┬──► blog/index.html, page-2.html, ...
//!                  (articles_metadata.json)
//!                                   └──► public/sitemap.xml ─► (ping)
//! ```
//!
//! The metadata store is the single source of truth for listings. The blog
//! index and sitemap are pure functions of it, rebuilt whole on every run,
//! so there is no incremental state to drift.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`parse`] | Line state machine turning article text into an [`types::ArticleDocument`] |
//! | [`dates`] | Date normalization (two accepted formats, sentinel fallback, store serde) |
//! | [`naming`] | Slug derivation and summary shortening |
//! | [`store`] | Append-only JSON metadata store with seeding and duplicate detection |
//! | [`render`] | Article page rendering with Maud, plus the shared site chrome |
//! | [`blog`] | Sorting, pagination, and rendering of the blog index |
//! | [`sitemap`] | Sitemap entries, XML serialization, search-engine ping |
//! | [`pipeline`] | End-to-end operations backing each CLI command |
//! | [`config`] | `site.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Document types shared between parse, render, and store |
//! | [`output`] | CLI summaries printed after each command |
//!
//! # Design Decisions
//!
//! ## One Slug Algorithm
//!
//! A slug names the article file, keys the store, and forms the sitemap URL.
//! All three derive it through [`naming::slugify`], so the page the blog
//! links to is always the page that was written.
//!
//! ## Warnings Travel With Results
//!
//! An unrecognized date is not an error. Parsing returns the document
//! together with a list of [`dates::DateParseWarning`]s; the record is
//! stored without a `parsed_date` and sorts after every dated one. `--strict` turns warnings into failures for
//! callers who would rather stop.
//!
//! ## Parse Before Write
//!
//! Publishing parses the whole file before touching the filesystem, so a
//! malformed article never leaves a half-updated site behind.
//!
//! ## Seed Is Configuration
//!
//! Records that predate the pipeline are loaded from an optional seed file
//! when the store is first created ([`store::Seed`]), never compiled in.

pub mod blog;
pub mod config;
pub mod dates;
pub mod naming;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod sitemap;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
