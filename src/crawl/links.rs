// src/crawl/links.rs
// =============================================================================
// This module extracts hyperlinks from fetched HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM, tolerating broken markup the way browsers do
// - Supports CSS selectors for finding elements
//
// Malformed HTML never produces an error here. The parser recovers, and any
// href that cannot be resolved is skipped, so the worst case for a broken
// page is "zero links found".
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::scope::resolve_link;

/// Extracts every `<a href>` target from `html`, resolved against `base_url`.
///
/// `<base href>` is honored when present, like a browser would. Links are
/// returned in document order, duplicates included; deduplication is the
/// frontier's job.
///
/// Example:
///   html = "<a href='/docs'>Docs</a>"
///   base_url = "https://example.com/guide/"
///   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    // Both selectors are constants and known to be valid
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let base_selector = Selector::parse("base[href]").unwrap();

    let base = document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| base_url.join(href.trim()).ok())
        .unwrap_or_else(|| base_url.clone());

    document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(&base, href))
        .collect()
}
