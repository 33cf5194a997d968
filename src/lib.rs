// src/lib.rs
// =============================================================================
// sitemap-crawler: discover the pages of a website and describe them as an
// XML sitemap.
//
// Modules:
// - config: CrawlPolicy, the immutable settings for one crawl
// - crawl: the crawl engine (scope rules, frontier, fetching, link extraction)
// - sitemap: sitemap generation and parsing
// - error: typed errors shared by all of the above
//
// Typical use:
//
//   let policy = CrawlPolicy::new("https://example.com")?.with_max_urls(500);
//   let report = crawl(&policy).await?;
//   let xml = sitemap::generate(&report)?;
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod sitemap;

pub use config::CrawlPolicy;
pub use crawl::{crawl, CrawlReport, Crawler};
pub use error::{ConfigError, FetchError, SitemapError};
