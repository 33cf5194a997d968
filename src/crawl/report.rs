// src/crawl/report.rs
// =============================================================================
// What a crawl hands back to its caller.
//
// The report is plain data: accepted URLs, the pages that failed and why,
// and whether the crawl was cut short. It serializes to JSON for `--json`.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use crate::error::FetchError;

/// A page that could not be fetched. The crawl carried on without it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub url: String,
    /// Merged into the failure object, e.g. `"kind": "status", "code": 404`
    #[serde(flatten)]
    pub error: FetchError,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Normalized seed URL; the sitemap's "home" page
    pub seed: String,
    /// Accepted pages, in the order their fetches completed
    pub urls: Vec<String>,
    pub failures: Vec<FetchFailure>,
    /// True if the crawl was cancelled or ran out of time
    pub aborted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub(crate) fn new(seed: &Url) -> Self {
        let now = Utc::now();
        Self {
            seed: seed.to_string(),
            urls: Vec::new(),
            failures: Vec::new(),
            aborted: false,
            started_at: now,
            finished_at: now,
        }
    }

    /// True when every discovered page was fetched without error and the
    /// crawl ran to its natural end.
    pub fn is_complete(&self) -> bool {
        !self.aborted && self.failures.is_empty()
    }

    /// Accepted URLs in lexicographic order.
    pub fn sorted_urls(&self) -> Vec<String> {
        let mut urls = self.urls.clone();
        urls.sort();
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serializes_flat() {
        let failure = FetchFailure {
            url: "https://example.com/missing".to_string(),
            error: FetchError::Status { code: 404 },
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["url"], "https://example.com/missing");
        assert_eq!(json["kind"], "status");
        assert_eq!(json["code"], 404);
    }

    #[test]
    fn test_is_complete() {
        let mut report = CrawlReport::new(&Url::parse("https://example.com").unwrap());
        assert!(report.is_complete());

        report.failures.push(FetchFailure {
            url: "https://example.com/slow".to_string(),
            error: FetchError::Timeout,
        });
        assert!(!report.is_complete());
    }
}
