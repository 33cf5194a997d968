// src/sitemap/entry.rs
// =============================================================================
// Per-URL sitemap metadata.
//
// We never fetch real modification times, so every entry is derived from the
// URL alone plus the date of the crawl:
// - lastmod: the crawl date (UTC, day granularity)
// - changefreq: "daily" for the seed, "weekly" for everything else
// - priority: 1.0 for the seed, otherwise 1.0 - 0.2 per path segment,
//   never below 0.1
// =============================================================================

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::crawl::path_depth;

/// The `<changefreq>` values allowed by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFreq {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(ChangeFreq::Always),
            "hourly" => Ok(ChangeFreq::Hourly),
            "daily" => Ok(ChangeFreq::Daily),
            "weekly" => Ok(ChangeFreq::Weekly),
            "monthly" => Ok(ChangeFreq::Monthly),
            "yearly" => Ok(ChangeFreq::Yearly),
            "never" => Ok(ChangeFreq::Never),
            other => Err(format!("unknown change frequency '{other}'")),
        }
    }
}

/// A sitemap priority between 0.1 and 1.0, kept in tenths so that
/// formatting never shows float noise like 0.19999999999999996.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(u8);

impl Priority {
    pub const MAX: Priority = Priority(10);
    pub const MIN: Priority = Priority(1);

    /// Priority for a non-seed page `depth` path segments deep.
    pub fn for_depth(depth: usize) -> Self {
        let tenths = 10usize.saturating_sub(depth.saturating_mul(2));
        Priority(tenths.max(Self::MIN.0 as usize) as u8)
    }

    pub fn value(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// One `<url>` element of a generated sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: Priority,
}

impl SitemapEntry {
    /// Derives the metadata for `loc`, given the crawl's seed URL.
    pub fn new(loc: &str, seed: &str, crawled_on: NaiveDate) -> Self {
        if loc == seed {
            return Self {
                loc: loc.to_string(),
                lastmod: crawled_on,
                changefreq: ChangeFreq::Daily,
                priority: Priority::MAX,
            };
        }

        let depth = Url::parse(loc).map(|url| path_depth(&url)).unwrap_or(0);
        Self {
            loc: loc.to_string(),
            lastmod: crawled_on,
            changefreq: ChangeFreq::Weekly,
            priority: Priority::for_depth(depth),
        }
    }
}

/// One entry per distinct URL, sorted lexicographically.
pub fn build_entries<S: AsRef<str>>(
    urls: &[S],
    seed: &str,
    crawled_on: NaiveDate,
) -> Vec<SitemapEntry> {
    let mut locs: Vec<&str> = urls.iter().map(AsRef::as_ref).collect();
    locs.sort_unstable();
    locs.dedup();

    locs.into_iter()
        .map(|loc| SitemapEntry::new(loc, seed, crawled_on))
        .collect()
}
