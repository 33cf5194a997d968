// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - generate: crawl a website and write its sitemap
// - inspect: read an existing sitemap (URL or file) and list its entries
//
// Every crawl flag maps one-to-one onto a CrawlPolicy builder method, see
// `GenerateArgs::to_policy`.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use sitemap_crawler::config::{
    DEFAULT_CONCURRENCY, DEFAULT_MAX_URLS, DEFAULT_USER_AGENT,
};
use sitemap_crawler::{ConfigError, CrawlPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-crawler",
    version,
    about = "Crawl a website and generate an XML sitemap, or inspect an existing one",
    long_about = "sitemap-crawler follows links from a starting page, stays on the same site, \
                  and writes every page it found as a sitemaps.org XML document."
)]
pub struct Cli {
    /// Log every fetched page (same as RUST_LOG=sitemap_crawler=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and write its sitemap
    ///
    /// Example: sitemap-crawler generate https://example.com --exclude admin -o sitemap.xml
    Generate(GenerateArgs),

    /// List the entries of an existing sitemap
    ///
    /// Example: sitemap-crawler inspect https://example.com/sitemap.xml --tree
    Inspect {
        /// Sitemap URL (http/https) or path to a local XML file
        source: String,

        /// Output entries as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also print the site hierarchy derived from the URLs
        #[arg(long)]
        tree: bool,

        /// Request timeout in seconds when the source is a URL
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Starting page of the crawl (e.g., https://example.com)
    pub url: String,

    /// Maximum number of pages to include
    #[arg(long, default_value_t = DEFAULT_MAX_URLS)]
    pub max_urls: usize,

    /// Skip pages whose path contains this text (case-insensitive, repeatable)
    #[arg(long = "exclude", value_name = "PATH")]
    pub excluded_paths: Vec<String>,

    /// File extensions to skip (repeatable); replaces the default
    /// jpg, jpeg, png, gif, pdf, zip list when given
    #[arg(long = "skip-ext", value_name = "EXT")]
    pub skipped_extensions: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Minimum delay between two requests, in milliseconds (0 = no limit)
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Number of pages fetched at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Stop the crawl after this many seconds and keep what was found
    #[arg(long)]
    pub max_duration_secs: Option<u64>,

    /// Write the sitemap to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the crawl report as JSON instead of the sitemap
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Builds and validates the crawl policy described by the flags.
    pub fn to_policy(&self) -> Result<CrawlPolicy, ConfigError> {
        let mut policy = CrawlPolicy::new(&self.url)?
            .with_excluded_paths(&self.excluded_paths)
            .with_max_urls(self.max_urls)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_delay(Duration::from_millis(self.delay_ms))
            .with_concurrency(self.concurrency)
            .with_user_agent(self.user_agent.clone())
            .with_max_duration(self.max_duration_secs.map(Duration::from_secs));

        if !self.skipped_extensions.is_empty() {
            policy = policy.with_skipped_extensions(&self.skipped_extensions);
        }

        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_generate_defaults() {
        let cli = parse(&["sitemap-crawler", "generate", "https://example.com"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let policy = args.to_policy().unwrap();
        assert_eq!(policy.max_urls(), DEFAULT_MAX_URLS);
        assert_eq!(policy.delay(), Duration::from_millis(100));
        assert_eq!(policy.skipped_extensions().len(), 6);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_generate_flags_reach_policy() {
        let cli = parse(&[
            "sitemap-crawler",
            "generate",
            "https://example.com",
            "--max-urls",
            "20",
            "--exclude",
            "Admin",
            "--exclude",
            "cart",
            "--skip-ext",
            "svg",
            "--concurrency",
            "2",
            "--max-duration-secs",
            "30",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let policy = args.to_policy().unwrap();
        assert_eq!(policy.max_urls(), 20);
        assert_eq!(policy.excluded_paths(), ["admin", "cart"]);
        assert_eq!(policy.skipped_extensions(), ["svg"]);
        assert_eq!(policy.concurrency(), 2);
        assert_eq!(policy.max_duration(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_max_urls_is_config_error() {
        let cli = parse(&[
            "sitemap-crawler",
            "generate",
            "https://example.com",
            "--max-urls",
            "0",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(matches!(args.to_policy(), Err(ConfigError::ZeroMaxUrls)));
    }

    #[test]
    fn test_zero_timeout_is_config_error() {
        let cli = parse(&[
            "sitemap-crawler",
            "generate",
            "https://example.com",
            "--timeout-secs",
            "0",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(matches!(args.to_policy(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_inspect_flags() {
        let cli = parse(&["sitemap-crawler", "inspect", "sitemap.xml", "--tree", "--json"]);
        match cli.command {
            Commands::Inspect { source, json, tree, .. } => {
                assert_eq!(source, "sitemap.xml");
                assert!(json);
                assert!(tree);
            }
            _ => panic!("expected inspect"),
        }
    }
}
