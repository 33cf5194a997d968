// src/main.rs
// =============================================================================
// This is the entry point of the sitemap-crawler CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Dispatch to the subcommand handler
// 4. Exit with a code scripts can act on:
//    0 = success, 1 = partial result (failed pages or aborted crawl), 2 = error
//
// stdout carries only the requested output (sitemap XML, JSON or table), so
// `sitemap-crawler generate https://example.com > sitemap.xml` just works.
// Progress and warnings go to stderr.
// =============================================================================

mod cli;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sitemap_crawler::crawl::HttpFetcher;
use sitemap_crawler::sitemap::{self, ParsedEntry, SiteTree, SitemapSource};
use sitemap_crawler::{CrawlReport, Crawler};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, GenerateArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "sitemap_crawler=debug"
    } else {
        "sitemap_crawler=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Generate(args) => handle_generate(args).await,
        Commands::Inspect {
            source,
            json,
            tree,
            timeout_secs,
        } => handle_inspect(&source, json, tree, timeout_secs).await,
    }
}

// Handles the 'generate' subcommand
async fn handle_generate(args: GenerateArgs) -> Result<i32> {
    let policy = args.to_policy()?;

    eprintln!("🔍 Crawling: {}", policy.seed());
    eprintln!(
        "📊 Max URLs: {}, concurrency: {}",
        policy.max_urls(),
        policy.concurrency()
    );

    let crawler = Crawler::new(&policy)?;

    // Ctrl-C stops the crawl; whatever was found so far is still written
    let cancel = crawler.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⏹️  Interrupted, finishing with partial results");
            cancel.cancel();
        }
    });

    let report = crawler.run().await;
    print_crawl_summary(&report);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let xml = sitemap::generate(&report)?;
        match &args.output {
            Some(path) => {
                tokio::fs::write(path, &xml)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("💾 Sitemap written to {}", path.display());
            }
            None => print!("{}", xml),
        }
    }

    if report.is_complete() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'inspect' subcommand
async fn handle_inspect(source: &str, json: bool, tree: bool, timeout_secs: u64) -> Result<i32> {
    let fetcher = HttpFetcher::new(
        Duration::from_secs(timeout_secs),
        sitemap_crawler::config::DEFAULT_USER_AGENT,
    )?;

    let xml = SitemapSource::parse(source).load(&fetcher).await?;
    let entries = sitemap::parse_sitemap(&xml)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_table(&entries);
    }

    if tree {
        let tree = SiteTree::from_urls(entries.iter().map(|e| &e.loc));
        println!("\n🌳 Site structure ({} nodes):", tree.node_count());
        print!("{}", tree.render());
    }

    Ok(0)
}

fn print_crawl_summary(report: &CrawlReport) {
    for failure in &report.failures {
        eprintln!("   ⚠️  {} ({})", failure.url, failure.error);
    }

    eprintln!("📊 Summary:");
    eprintln!("   ✅ Pages: {}", report.urls.len());
    eprintln!("   ❌ Failed: {}", report.failures.len());
    if report.aborted {
        eprintln!("   ⏹️  Crawl stopped early");
    }
}

// Prints sitemap entries as a human-readable table
fn print_table(entries: &[ParsedEntry]) {
    println!(
        "{:<60} {:<12} {:<12} {:<8}",
        "URL", "LASTMOD", "CHANGEFREQ", "PRIORITY"
    );
    println!("{}", "=".repeat(95));

    for entry in entries {
        // Truncate URL if too long for display
        let url_display = if entry.loc.chars().count() > 57 {
            format!("{}...", entry.loc.chars().take(57).collect::<String>())
        } else {
            entry.loc.clone()
        };

        println!(
            "{:<60} {:<12} {:<12} {:<8}",
            url_display, entry.lastmod, entry.changefreq, entry.priority
        );
    }

    println!();
    println!("📋 Total: {}", entries.len());
}
