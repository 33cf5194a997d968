// src/crawl/fetch.rs
// =============================================================================
// This module fetches pages over HTTP.
//
// The crawl engine only talks to the `Fetcher` trait, so tests can swap in an
// in-memory site. `HttpFetcher` is the real implementation on top of reqwest:
// - One shared Client (connection pooling), built from the crawl policy
// - Per-request timeout and user agent taken from the policy
// - Follows up to 5 redirects, but never out of the crawl's scope
// - Anything that is not a 2xx response becomes a FetchError
//
// A page is described by the URL it was actually served from, so relative
// links on a redirected page (`/docs` -> `/docs/`) resolve correctly.
//
// reqwest errors are sorted into FetchError variants so the crawl report can
// say *why* a page failed, not just that it did.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::scope::{normalize, should_include};
use crate::config::CrawlPolicy;
use crate::error::{ConfigError, FetchError};

const MAX_REDIRECTS: usize = 5;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Where the body came from, after redirects.
    pub final_url: Url,
    pub status: u16,
    pub body: String,
}

/// Anything that can turn a URL into a page body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Fetches pages with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        Self::build(timeout, user_agent, Policy::limited(MAX_REDIRECTS))
    }

    /// A fetcher for crawling: redirects are only followed while they stay
    /// inside the policy's scope. A redirect that leaves it is not requested.
    pub fn from_policy(policy: &CrawlPolicy) -> Result<Self, ConfigError> {
        let scope = policy.clone();
        let redirects = Policy::custom(move |attempt| {
            if attempt.previous().len() > MAX_REDIRECTS {
                attempt.error("too many redirects")
            } else if should_include(&normalize(attempt.url()), &scope) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        });

        Self::build(policy.timeout(), policy.user_agent(), redirects)
    }

    fn build(timeout: Duration, user_agent: &str, redirects: Policy) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .redirect(redirects)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();

        // A redirect we refused to follow
        if status.is_redirection() {
            if let Some(location) = response.headers().get(LOCATION) {
                let location = location.to_str().unwrap_or_default();
                let location = response
                    .url()
                    .join(location)
                    .map(|target| target.to_string())
                    .unwrap_or_else(|_| location.to_string());
                return Err(FetchError::RedirectOutOfScope { location });
            }
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(categorize_error)?;

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

// Sorts reqwest errors into the failure kinds we report.
//
// reqwest does not expose DNS or TLS failures as separate kinds, so those
// are recognized from the error chain's text, the same way a human would.
fn categorize_error(error: reqwest::Error) -> FetchError {
    let chain = error_chain(&error).to_lowercase();

    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if chain.contains("dns") || chain.contains("failed to lookup address") {
        FetchError::Dns
    } else if chain.contains("certificate") || chain.contains("tls") || chain.contains("ssl") {
        FetchError::Tls {
            message: error.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            message: error.to_string(),
        }
    } else {
        FetchError::Other {
            message: error.to_string(),
        }
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}
