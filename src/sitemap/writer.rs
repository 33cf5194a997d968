// src/sitemap/writer.rs
// =============================================================================
// Serializes sitemap entries to XML with quick-xml.
//
// Output shape (two-space indentation):
//
//   <?xml version="1.0" encoding="UTF-8"?>
//   <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//     <url>
//       <loc>https://example.com/</loc>
//       <lastmod>2024-03-09</lastmod>
//       <changefreq>daily</changefreq>
//       <priority>1.0</priority>
//     </url>
//   </urlset>
//
// Text content goes through BytesText, which escapes `&` and `<` in URLs.
// =============================================================================

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::entry::SitemapEntry;
use crate::error::SitemapError;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Renders `entries` as a complete sitemap document, in the order given.
pub fn to_xml(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    write(&mut writer, Event::Start(urlset))?;

    for entry in entries {
        write(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_element(&mut writer, "loc", &entry.loc)?;
        write_element(
            &mut writer,
            "lastmod",
            &entry.lastmod.format("%Y-%m-%d").to_string(),
        )?;
        write_element(&mut writer, "changefreq", entry.changefreq.as_str())?;
        write_element(&mut writer, "priority", &entry.priority.to_string())?;
        write(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::Write(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

// <name>text</name> on one line
fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), SitemapError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Write(e.to_string()))
}
