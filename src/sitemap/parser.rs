// src/sitemap/parser.rs
// =============================================================================
// Reads sitemap documents, ours or anyone else's.
//
// Real-world sitemaps come in a few shapes:
// - <urlset xmlns="...">         default namespace, plain tag names
// - <sm:urlset xmlns:sm="...">   prefixed tag names
// - <urlset>                     no namespace at all
//
// So parsing runs in two passes over the same string:
// 1. Look at the root element and remember its prefix ("" or "sm:")
// 2. Walk the document matching the fixed names url/loc/lastmod/changefreq/
//    priority with that prefix in front
//
// Every field is kept as the raw text; missing optional fields become "".
// A document that isn't well-formed XML is an error: we never return a
// partial list for a broken file.
// =============================================================================

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::error::SitemapError;

/// One `<url>` entry as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: String,
    pub priority: String,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Loc,
    Lastmod,
    Changefreq,
    Priority,
}

// Fully qualified tag names for one document's prefix
struct TagNames {
    url: String,
    loc: String,
    lastmod: String,
    changefreq: String,
    priority: String,
}

impl TagNames {
    fn with_prefix(prefix: &str) -> Self {
        Self {
            url: format!("{prefix}url"),
            loc: format!("{prefix}loc"),
            lastmod: format!("{prefix}lastmod"),
            changefreq: format!("{prefix}changefreq"),
            priority: format!("{prefix}priority"),
        }
    }

    fn field(&self, name: &str) -> Option<Field> {
        if name == self.loc {
            Some(Field::Loc)
        } else if name == self.lastmod {
            Some(Field::Lastmod)
        } else if name == self.changefreq {
            Some(Field::Changefreq)
        } else if name == self.priority {
            Some(Field::Priority)
        } else {
            None
        }
    }
}

impl ParsedEntry {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Loc => &mut self.loc,
            Field::Lastmod => &mut self.lastmod,
            Field::Changefreq => &mut self.changefreq,
            Field::Priority => &mut self.priority,
        }
    }
}

/// Parses a sitemap document into its `<url>` entries, in document order.
pub fn parse_sitemap(xml: &str) -> Result<Vec<ParsedEntry>, SitemapError> {
    let prefix = root_prefix(xml)?;
    let tags = TagNames::with_prefix(&prefix);

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    // Names of the currently open elements
    let mut open: Vec<String> = Vec::new();
    // The <url> being read and how deep it sits in `open`
    let mut current: Option<(ParsedEntry, usize)> = None;
    let mut field: Option<Field> = None;
    let mut root_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if root_closed {
                    return Err(xml_error(&reader, "element after the root element"));
                }
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match current.as_ref().map(|(_, depth)| *depth) {
                    None if name == tags.url => {
                        current = Some((ParsedEntry::default(), open.len() + 1));
                    }
                    Some(depth) if open.len() == depth => {
                        field = tags.field(&name);
                    }
                    _ => {}
                }
                open.push(name);
            }
            Ok(Event::Empty(e)) => {
                if root_closed {
                    return Err(xml_error(&reader, "element after the root element"));
                }
                if open.is_empty() {
                    // <urlset/>
                    root_closed = true;
                } else if current.is_none() && e.name().as_ref() == tags.url.as_bytes() {
                    // <url/> is an entry with nothing in it
                    entries.push(ParsedEntry::default());
                }
            }
            Ok(Event::End(_)) => {
                let name = open.pop().unwrap_or_default();
                if open.is_empty() {
                    root_closed = true;
                }
                if let Some(depth) = current.as_ref().map(|(_, depth)| *depth) {
                    if open.len() + 1 == depth && name == tags.url {
                        if let Some((entry, _)) = current.take() {
                            entries.push(entry);
                        }
                    } else if open.len() == depth {
                        field = None;
                    }
                }
            }
            Ok(Event::Text(text)) => {
                if open.is_empty() {
                    if text.iter().any(|b| !b.is_ascii_whitespace()) {
                        return Err(xml_error(&reader, "text outside the root element"));
                    }
                    continue;
                }
                // Only text directly inside the field, not inside its children
                if let (Some((entry, depth)), Some(f)) = (current.as_mut(), field) {
                    if open.len() == *depth + 1 {
                        let text = text.unescape().map_err(|e| xml_error(&reader, e))?;
                        entry.field_mut(f).push_str(text.trim());
                    }
                }
            }
            Ok(Event::CData(data)) => {
                if open.is_empty() {
                    return Err(xml_error(&reader, "CDATA outside the root element"));
                }
                if let (Some((entry, depth)), Some(f)) = (current.as_mut(), field) {
                    if open.len() == *depth + 1 {
                        let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        entry.field_mut(f).push_str(text.trim());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }

    if let Some(unclosed) = open.pop() {
        return Err(SitemapError::Unclosed(unclosed));
    }

    Ok(entries)
}

// First pass: the namespace prefix of the root element, with its colon
fn root_prefix(xml: &str) -> Result<String, SitemapError> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let prefix = e
                    .name()
                    .prefix()
                    .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())))
                    .unwrap_or_default();
                return Ok(prefix);
            }
            Ok(Event::Eof) => return Err(SitemapError::MissingRoot),
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, error: impl std::fmt::Display) -> SitemapError {
    SitemapError::Xml {
        position: reader.buffer_position() as u64,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_namespace() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url>
            <loc>https://example.com/</loc>
            <lastmod>2024-01-15</lastmod>
            <changefreq>daily</changefreq>
            <priority>1.0</priority>
          </url>
          <url>
            <loc>https://example.com/about</loc>
          </url>
        </urlset>"#;

        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            ParsedEntry {
                loc: "https://example.com/".to_string(),
                lastmod: "2024-01-15".to_string(),
                changefreq: "daily".to_string(),
                priority: "1.0".to_string(),
            }
        );
        assert_eq!(entries[1].loc, "https://example.com/about");
        assert_eq!(entries[1].lastmod, "");
        assert_eq!(entries[1].changefreq, "");
        assert_eq!(entries[1].priority, "");
    }

    #[test]
    fn test_parse_prefixed_namespace() {
        let xml = r#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sm:url><sm:loc>https://example.com/a</sm:loc><sm:priority>0.5</sm:priority></sm:url>
          <sm:url><sm:loc>https://example.com/b</sm:loc></sm:url>
        </sm:urlset>"#;

        let entries = parse_sitemap(xml).unwrap();
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, vec!["https://example.com/a", "https://example.com/b"]);
        assert_eq!(entries[0].priority, "0.5");
    }

    #[test]
    fn test_parse_without_namespace() {
        let xml = "<urlset><url><loc>https://example.com/</loc></url></urlset>";
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, "https://example.com/");
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = r#"<urlset>
          <url><loc>https://example.com/?a=1&amp;b=2</loc></url>
          <url><loc><![CDATA[https://example.com/cdata]]></loc></url>
        </urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries[0].loc, "https://example.com/?a=1&b=2");
        assert_eq!(entries[1].loc, "https://example.com/cdata");
    }

    #[test]
    fn test_unknown_children_are_ignored() {
        let xml = r#"<urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
          <url>
            <loc>https://example.com/</loc>
            <image:image><image:loc>https://example.com/logo.png</image:loc></image:image>
          </url>
        </urlset>"#;
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, "https://example.com/");
    }

    #[test]
    fn test_text_in_nested_elements_is_not_merged() {
        let xml = "<urlset><url><loc>https://example.com/a<b>x</b>c</loc></url></urlset>";
        let entries = parse_sitemap(xml).unwrap();
        assert_eq!(entries[0].loc, "https://example.com/ac");
    }

    #[test]
    fn test_whitespace_and_comments_after_root_are_fine() {
        let xml = "<urlset><url><loc>https://example.com/</loc></url></urlset>\n<!-- generated -->\n";
        assert_eq!(parse_sitemap(xml).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_url_element() {
        let entries = parse_sitemap("<urlset><url/></urlset>").unwrap();
        assert_eq!(entries, vec![ParsedEntry::default()]);
    }

    #[test]
    fn test_empty_urlset() {
        assert!(parse_sitemap("<urlset/>").unwrap().is_empty());
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(parse_sitemap(""), Err(SitemapError::MissingRoot)));
        assert!(matches!(
            parse_sitemap("not xml at all"),
            Err(SitemapError::MissingRoot)
        ));
    }

    #[test]
    fn test_malformed_documents_are_errors() {
        let broken = [
            "<urlset><url></urlset>",
            "<urlset><url><loc>https://example.com/</loc></url>",
            "<urlset><url><loc>https://example.com/</lo></url></urlset>",
            "<<<>>>",
            "<urlset><url><loc>https://a.com/</loc></url></urlset><urlset><url><loc>https://b.com/</loc></url></urlset>",
            "<urlset><url><loc>https://a.com/</loc></url></urlset>junk",
            "<urlset/><urlset/>",
        ];
        for xml in broken {
            assert!(parse_sitemap(xml).is_err(), "{xml} should not parse");
        }
    }
}
