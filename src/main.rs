use clap::{Parser, Subcommand};
use provision_press::pipeline::{self, Site};
use provision_press::{config, output, parse};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "provision-press")]
#[command(about = "Publish plain-text articles as HTML pages, a blog index and a sitemap")]
#[command(long_about = "\
Publish plain-text articles as HTML pages, a blog index and a sitemap

Every path is resolved against the project root (--root). Defaults:

  site.toml                          # Site config (optional)
  articles/
  ├── source/                        # Article text files read by `build`
  │   └── sample_post.txt
  ├── Sample_Post.html               # Rendered article pages
  └── articles_metadata.json         # Metadata store
  blog/
  ├── index.html                     # Blog index, newest first
  └── page-2.html
  public/sitemap.xml

Article format:

  Title: Sample Post                 # Required
  Author: Jane Doe
  Date: March 5, 2024                # or 03/05/2024
  ReadTime: 4 min read
  Image: ledger.jpg
  Summary:
  One or more lines of summary.
  Sections:
  1. First Section                   # or `Section: First Section`
  Body text.
  Final Thoughts:
  Closing text.

Run 'provision-press gen-config' to generate a documented site.toml.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Project root; every configured path is relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Shared flag for commands that publish articles.
#[derive(clap::Args, Clone)]
struct StrictArgs {
    /// Treat unrecognized dates as errors instead of warnings
    #[arg(long)]
    strict: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Publish one article: page, metadata record, blog index
    Article {
        /// Article text file
        input: PathBuf,
        #[command(flatten)]
        strict: StrictArgs,
    },
    /// Publish every .txt file in the source directory
    Build(StrictArgs),
    /// Rebuild the blog index from the metadata store
    Blog,
    /// Write the sitemap from the metadata store
    Sitemap {
        /// Notify the configured search-engine endpoints afterwards
        #[arg(long)]
        ping: bool,
    },
    /// Parse an article and print its structure without writing anything
    Check {
        /// Article text file
        input: PathBuf,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Article { input, strict } => {
            let site = load_site(&cli.root)?;
            let report = pipeline::publish_article(&input, &site, strict.strict)?;
            output::print_publish_output(&report, &site.root);
        }
        Command::Build(strict) => {
            let site = load_site(&cli.root)?;
            println!("==> Publishing {}", site.paths.source_dir.display());
            let report = pipeline::publish_all(&site, strict.strict)?;
            output::print_batch_output(&report, &site.root);
            if report.has_failures() {
                return Err(format!("{} article(s) failed to publish", report.failed.len()).into());
            }
        }
        Command::Blog => {
            let site = load_site(&cli.root)?;
            let report = pipeline::rebuild_blog(&site)?;
            output::print_blog_output(&report, &site.root);
        }
        Command::Sitemap { ping } => {
            let site = load_site(&cli.root)?;
            let report = pipeline::generate_sitemap(&site, ping)?;
            output::print_sitemap_output(&report, &site.root);
        }
        Command::Check { input } => {
            let parsed = parse::parse_article_file(&input)?;
            output::print_check_output(&parsed, &input, &cli.root);
            println!("==> Article is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. INFO by default, DEBUG with `-v`.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_site(root: &std::path::Path) -> Result<Site, config::ConfigError> {
    let config = config::load_config(root)?;
    Ok(Site::new(root, config))
}
