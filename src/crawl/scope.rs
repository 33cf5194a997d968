// src/crawl/scope.rs
// =============================================================================
// This module decides which URLs belong to the crawl.
//
// Every scope decision goes through `should_include`, and every dedup check
// goes through `normalize`, so both are pure functions with no I/O:
// - should_include: same origin, not an excluded path, not a skipped file type
// - normalize: drop the query string and the fragment
// - resolve_link: turn an href into an absolute URL, using the page it was
//   found on as the base
//
// Rust concepts:
// - Url::origin(): scheme + host + port as one comparable value
// - Borrowing: the predicate only reads the policy, it never owns it
// =============================================================================

use url::Url;

use crate::config::CrawlPolicy;

/// Returns true if `url` is inside the crawl scope described by `policy`.
///
/// A URL is out of scope when:
/// - its scheme is not http/https
/// - its origin (scheme, host, port) differs from the seed's
/// - its lowercased path contains any excluded path substring
/// - its lowercased path ends with a skipped file extension
pub fn should_include(url: &Url, policy: &CrawlPolicy) -> bool {
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    if url.origin() != *policy.origin() {
        return false;
    }

    let path = url.path().to_lowercase();

    if policy
        .excluded_paths()
        .iter()
        .any(|excluded| path.contains(excluded.as_str()))
    {
        return false;
    }

    !policy
        .skipped_extensions()
        .iter()
        .any(|ext| has_extension(&path, ext))
}

/// Strips the query and fragment, so `/page#x` and `/page?y=1` both
/// collapse to `/page`. Applying it twice gives the same result as once.
pub fn normalize(url: &Url) -> Url {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.set_fragment(None);
    clean
}

/// Resolves a (possibly relative) href against the page it appeared on.
///
/// Returns None for in-page anchors, non-navigational schemes and hrefs
/// that do not form a valid URL.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    base.join(href).ok()
}

/// Number of non-empty path segments: "/" is 0, "/a/b/" is 2.
pub fn path_depth(url: &Url) -> usize {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).count())
        .unwrap_or(0)
}

fn has_extension(path: &str, ext: &str) -> bool {
    path.len() > ext.len()
        && path.ends_with(ext)
        && path.as_bytes()[path.len() - ext.len() - 1] == b'.'
}
