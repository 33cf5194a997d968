// src/config.rs
// =============================================================================
// Crawl configuration.
//
// A CrawlPolicy is built once from the seed URL, tuned with the builder-style
// `with_*` methods, checked with `validate()` and then only ever borrowed by
// the crawl engine. Everything the scope predicate needs (origin, excluded
// paths, skipped extensions) is stored already normalized so the hot path
// never lowercases or re-parses.
// =============================================================================

use std::time::Duration;

use url::{Origin, Url};

use crate::crawl::{normalize, should_include};
use crate::error::ConfigError;

/// Default ceiling on the number of pages accepted into the result set.
pub const DEFAULT_MAX_URLS: usize = 5000;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default spacing between two request starts, across all workers.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Default number of fetches allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

pub const DEFAULT_USER_AGENT: &str = "SitemapGenerator/1.0";

/// File types that are never crawled because they carry no links.
pub const DEFAULT_SKIPPED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "pdf", "zip"];

/// Immutable settings for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlPolicy {
    seed: Url,
    origin: Origin,
    excluded_paths: Vec<String>,
    skipped_extensions: Vec<String>,
    max_urls: usize,
    timeout: Duration,
    delay: Duration,
    user_agent: String,
    concurrency: usize,
    max_duration: Option<Duration>,
}

impl CrawlPolicy {
    /// Parses and normalizes the seed URL and fills in defaults.
    ///
    /// Fails for anything that is not an absolute http(s) URL with a host.
    pub fn new(seed: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(seed.trim()).map_err(|source| ConfigError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme {
                url: seed.to_string(),
            });
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost {
                url: seed.to_string(),
            });
        }

        let seed = normalize(&parsed);
        Ok(Self {
            origin: seed.origin(),
            seed,
            excluded_paths: Vec::new(),
            skipped_extensions: DEFAULT_SKIPPED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_urls: DEFAULT_MAX_URLS,
            timeout: DEFAULT_TIMEOUT,
            delay: DEFAULT_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            max_duration: None,
        })
    }

    /// Path substrings to stay out of. Matched against the lowercased path,
    /// so the patterns are lowercased here too. Blank entries are dropped.
    pub fn with_excluded_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_paths = paths
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Replaces the skipped extension list. Accepts "pdf" or ".pdf".
    pub fn with_skipped_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skipped_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn with_max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A zero delay disables rate limiting entirely.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Abort the crawl once this much wall-clock time has passed.
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Checks the invariants that the builder methods cannot enforce alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_urls == 0 {
            return Err(ConfigError::ZeroMaxUrls);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if !should_include(&self.seed, self) {
            return Err(ConfigError::SeedExcluded {
                url: self.seed.to_string(),
            });
        }
        Ok(())
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Scheme, host and port every crawled URL must share with the seed.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn excluded_paths(&self) -> &[String] {
        &self.excluded_paths
    }

    pub fn skipped_extensions(&self) -> &[String] {
        &self.skipped_extensions
    }

    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }
}
