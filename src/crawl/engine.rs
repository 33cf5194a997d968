// src/crawl/engine.rs
// =============================================================================
// This module implements the crawl itself: a breadth-first traversal from the
// seed URL over an explicit frontier.
//
// How it works:
// 1. The seed goes into the frontier (and the visited set)
// 2. While there is room, pop URLs and start fetching them, up to
//    `concurrency` at a time
// 3. When a fetch completes successfully, accept the page and queue every
//    in-scope link that hasn't been seen yet
// 4. When a fetch fails, record why and move on
// 5. Stop when nothing is queued or in flight, when the result set is full,
//    or when the crawl is cancelled or out of time
//
// All crawl state lives in this one task. Fetches run concurrently inside a
// FuturesUnordered, but only this loop touches the frontier and the result
// set, so "is there still room?" and "accept this page" can never race.
//
// Truncation order:
// - A fetch only starts if `accepted + in_flight < max_urls`, so we never
//   fetch pages we would have to throw away
// - With concurrency 1 the result is exactly the first `max_urls` pages that
//   fetched successfully, in breadth-first discovery order
// - With more workers, pages in the same in-flight window may complete in
//   any order, which can change which pages make the cut on a large site
//
// Politeness:
// - One rate limiter for the whole crawl spaces out request starts by the
//   configured delay, no matter how many fetches are in flight
// =============================================================================

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::fetch::{Fetcher, HttpFetcher};
use super::frontier::Frontier;
use super::links::extract_links;
use super::report::{CrawlReport, FetchFailure};
use super::scope::{normalize, should_include};
use crate::config::CrawlPolicy;
use crate::error::{ConfigError, FetchError};

/// Crawls one site according to a borrowed policy.
pub struct Crawler<'a> {
    policy: &'a CrawlPolicy,
    fetcher: Arc<dyn Fetcher>,
    limiter: Option<DefaultDirectRateLimiter>,
    cancel: CancellationToken,
}

// The result of visiting one page: the links it contains, or why it failed
struct Visit {
    url: Url,
    links: Result<Vec<Url>, FetchError>,
}

impl<'a> Crawler<'a> {
    /// Builds a crawler that fetches over HTTP.
    pub fn new(policy: &'a CrawlPolicy) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::from_policy(policy)?;
        Self::with_fetcher(policy, Arc::new(fetcher))
    }

    /// Builds a crawler on top of any fetcher.
    pub fn with_fetcher(
        policy: &'a CrawlPolicy,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, ConfigError> {
        policy.validate()?;

        // A zero delay means no rate limiting at all
        let limiter = Quota::with_period(policy.delay()).map(RateLimiter::direct);

        Ok(Self {
            policy,
            fetcher,
            limiter,
            cancel: CancellationToken::new(),
        })
    }

    /// Uses a caller-owned token, so the crawl can be aborted from elsewhere.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that aborts this crawl when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the crawl to completion (or abort) and returns what was found.
    ///
    /// Page failures never end the crawl; they are collected in the report.
    pub async fn run(&self) -> CrawlReport {
        let policy = self.policy;
        let mut report = CrawlReport::new(policy.seed());
        let mut frontier = Frontier::new(policy.seed().clone());
        let mut in_flight = FuturesUnordered::new();
        let deadline = policy.max_duration().map(|limit| Instant::now() + limit);

        info!(
            seed = %policy.seed(),
            max_urls = policy.max_urls(),
            concurrency = policy.concurrency(),
            "starting crawl"
        );

        loop {
            if self.cancel.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d) {
                report.aborted = true;
                break;
            }

            // Start as many fetches as the worker limit and the URL budget allow
            while in_flight.len() < policy.concurrency()
                && report.urls.len() + in_flight.len() < policy.max_urls()
            {
                let Some(id) = frontier.pop() else {
                    break;
                };
                in_flight.push(self.visit(frontier.url(id).clone()));
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    report.aborted = true;
                    break;
                }
                _ = wait_for_deadline(deadline) => {
                    report.aborted = true;
                    break;
                }
                Some(visit) = in_flight.next() => {
                    self.record(visit, &mut frontier, &mut report);
                }
            }
        }

        if report.aborted {
            warn!(
                dropped = in_flight.len(),
                accepted = report.urls.len(),
                "crawl aborted, returning partial results"
            );
        }

        report.finished_at = Utc::now();
        info!(
            accepted = report.urls.len(),
            failed = report.failures.len(),
            discovered = frontier.visited_len(),
            unvisited = frontier.pending_len(),
            "crawl finished"
        );
        report
    }

    // Fetches one page (after waiting for the rate limiter) and pulls out
    // its links. Link extraction happens here so it runs per worker.
    async fn visit(&self, url: Url) -> Visit {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        debug!(url = %url, "fetching");

        // The client has its own timeout; this one also covers slow bodies
        let fetched = match tokio::time::timeout(self.policy.timeout(), self.fetcher.fetch(&url)).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        };

        // Links resolve against where the page was served from. A page that
        // ended up out of scope is not accepted under the URL we asked for.
        let links = fetched.and_then(|page| {
            if !should_include(&normalize(&page.final_url), self.policy) {
                return Err(FetchError::RedirectOutOfScope {
                    location: page.final_url.to_string(),
                });
            }
            Ok(extract_links(&page.body, &page.final_url))
        });
        Visit { url, links }
    }

    fn record(&self, visit: Visit, frontier: &mut Frontier, report: &mut CrawlReport) {
        let links = match visit.links {
            Ok(links) => links,
            Err(error) => {
                warn!(url = %visit.url, %error, "failed to fetch page");
                report.failures.push(FetchFailure {
                    url: visit.url.to_string(),
                    error,
                });
                return;
            }
        };

        if report.urls.len() >= self.policy.max_urls() {
            debug!(url = %visit.url, "result set full, discarding page");
            return;
        }
        report.urls.push(visit.url.to_string());

        let mut queued = 0;
        for link in links {
            let link = normalize(&link);
            if should_include(&link, self.policy) && frontier.discover(link) {
                queued += 1;
            }
        }

        debug!(url = %visit.url, queued, "page accepted");
    }
}

/// Crawls the site described by `policy` over HTTP.
///
/// Only configuration problems are errors; everything that goes wrong
/// with individual pages ends up in the report.
pub async fn crawl(policy: &CrawlPolicy) -> Result<CrawlReport, ConfigError> {
    let crawler = Crawler::new(policy)?;
    Ok(crawler.run().await)
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why FuturesUnordered instead of tokio::spawn?
//    - Spawned tasks would each need their own handle on the frontier
//      (Arc<Mutex<...>>) and every check-then-insert would need the lock
//    - FuturesUnordered polls all in-flight fetches from this one task, so
//      the frontier and report stay plain `&mut` values
//    - Network I/O still overlaps; only the bookkeeping is sequential
//
// 2. What does `biased;` do in select!?
//    - Branches are polled top to bottom instead of randomly
//    - Cancellation and the deadline are checked before a finished fetch
//      is recorded, so nothing new is accepted after an abort
//
// 3. What happens to fetches that are in flight when we abort?
//    - Dropping a future cancels it in Rust. `in_flight` is dropped when
//      run() returns, which closes those connections
// -----------------------------------------------------------------------------
