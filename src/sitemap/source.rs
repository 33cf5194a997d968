// src/sitemap/source.rs
// =============================================================================
// Loads an existing sitemap document for inspection.
//
// The source is either an http(s) URL, fetched through the same Fetcher the
// crawler uses, or a path to a local file.
// =============================================================================

use url::Url;

use crate::crawl::Fetcher;
use crate::error::SitemapError;

/// Where a sitemap document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapSource {
    Remote(Url),
    File(std::path::PathBuf),
}

impl SitemapSource {
    /// Anything that parses as an http(s) URL is remote, everything else
    /// is treated as a file path.
    pub fn parse(source: &str) -> Self {
        match Url::parse(source.trim()) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Self::Remote(url),
            _ => Self::File(source.trim().into()),
        }
    }

    /// Reads the raw document text.
    pub async fn load(&self, fetcher: &dyn Fetcher) -> Result<String, SitemapError> {
        match self {
            Self::Remote(url) => fetcher
                .fetch(url)
                .await
                .map(|page| page.body)
                .map_err(|e| SitemapError::Load {
                    source_name: url.to_string(),
                    message: e.to_string(),
                }),
            Self::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| SitemapError::Load {
                        source_name: path.display().to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::HttpFetcher;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_parse_source() {
        assert!(matches!(
            SitemapSource::parse("https://example.com/sitemap.xml"),
            SitemapSource::Remote(_)
        ));
        assert_eq!(
            SitemapSource::parse("out/sitemap.xml"),
            SitemapSource::File("out/sitemap.xml".into())
        );
        // Windows-style drive letters parse as a URL scheme but are files
        assert!(matches!(
            SitemapSource::parse("C:\\sitemaps\\site.xml"),
            SitemapSource::File(_)
        ));
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<urlset></urlset>").unwrap();

        let fetcher = HttpFetcher::new(Duration::from_secs(1), "test").unwrap();
        let source = SitemapSource::parse(file.path().to_str().unwrap());
        let text = source.load(&fetcher).await.unwrap();
        assert_eq!(text, "<urlset></urlset>");
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1), "test").unwrap();
        let source = SitemapSource::parse("/definitely/not/here/sitemap.xml");
        assert!(matches!(
            source.load(&fetcher).await,
            Err(SitemapError::Load { .. })
        ));
    }
}
