// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Submodules:
// - scope: which URLs belong to the crawl (same origin, exclusions, file types)
// - links: hyperlink extraction from HTML
// - fetch: the Fetcher trait and its reqwest implementation
// - frontier: visited set + work queue
// - engine: the traversal loop, worker limit, rate limiting, cancellation
// - report: what a crawl returns
// =============================================================================

mod engine;
mod fetch;
mod frontier;
mod links;
mod report;
mod scope;

pub use engine::{crawl, Crawler};
pub use fetch::{FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, UrlId};
pub use links::extract_links;
pub use report::{CrawlReport, FetchFailure};
pub use scope::{normalize, path_depth, resolve_link, should_include};
