// src/error.rs
// =============================================================================
// Typed errors for the crawler library.
//
// Three families, matching how far each one propagates:
// - ConfigError: bad policy, reported before any request is made (fatal)
// - FetchError: one page failed, recorded in the crawl report (recoverable)
// - SitemapError: a whole sitemap document could not be read or written
//
// The binary wraps all of these in anyhow; inside the library we keep
// concrete types so callers can match on them.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// Errors in the crawl configuration. Nothing is fetched when one occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL '{url}' must use http or https")]
    UnsupportedScheme { url: String },

    #[error("seed URL '{url}' has no host")]
    MissingHost { url: String },

    #[error("seed URL '{url}' is excluded by the crawl policy")]
    SeedExcluded { url: String },

    #[error("max_urls must be greater than zero")]
    ZeroMaxUrls,

    #[error("concurrency must be greater than zero")]
    ZeroConcurrency,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Why a single page could not be fetched.
///
/// Serialized with a `kind` tag so the JSON report reads like
/// `{"url": "...", "kind": "status", "code": 404}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {code}")]
    Status { code: u16 },

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("redirected out of scope to {location}")]
    RedirectOutOfScope { location: String },

    #[error("could not resolve hostname")]
    Dns,

    #[error("TLS error: {message}")]
    Tls { message: String },

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("{message}")]
    Other { message: String },
}

/// Errors reading or writing a sitemap document.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("malformed sitemap XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("sitemap document has no root element")]
    MissingRoot,

    #[error("sitemap document ended with unclosed element <{0}>")]
    Unclosed(String),

    #[error("failed to write sitemap XML: {0}")]
    Write(String),

    #[error("failed to load sitemap from {source_name}: {message}")]
    Load { source_name: String, message: String },
}
