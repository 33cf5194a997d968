// src/sitemap/mod.rs
// =============================================================================
// This module turns crawl results into sitemap documents and reads them back.
//
// Submodules:
// - entry: per-URL metadata (lastmod, changefreq, priority)
// - writer: XML serialization
// - parser: XML parsing, namespace-prefix tolerant
// - tree: site hierarchy derived from URL paths
// - source: loading a sitemap from a URL or a file
// =============================================================================

mod entry;
mod parser;
mod source;
mod tree;
mod writer;

pub use entry::{build_entries, ChangeFreq, Priority, SitemapEntry};
pub use parser::{parse_sitemap, ParsedEntry};
pub use source::SitemapSource;
pub use tree::SiteTree;
pub use writer::{to_xml, SITEMAP_NAMESPACE};

use crate::crawl::CrawlReport;
use crate::error::SitemapError;

/// Builds the sitemap document for a finished crawl.
///
/// Every entry's lastmod is the day the crawl finished (UTC).
pub fn generate(report: &CrawlReport) -> Result<String, SitemapError> {
    let entries = build_entries(&report.urls, &report.seed, report.finished_at.date_naive());
    to_xml(&entries)
}
