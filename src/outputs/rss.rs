//! RSS 2.0 feed generation.
//!
//! The document is rendered with `quick-xml` and pretty-printed with a
//! two-space indent:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
//!   <channel>
//!     <title>…</title>
//!     …
//!     <item>
//!       <title>…</title>
//!       <link>…</link>
//!       <description>…</description>
//!       <guid isPermaLink="true">…</guid>
//!       <pubDate>…</pubDate>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! Output depends only on the channel config and the articles: the same input
//! renders byte-identical XML. `lastBuildDate` is the newest article date
//! rather than the wall clock for that reason.

use crate::config::ChannelConfig;
use crate::error::FeedError;
use crate::models::Article;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::io::Write;
use tokio::fs;
use tracing::{info, instrument};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const RSS_DOCS: &str = "http://www.rssboard.org/rss-specification";

/// Render the feed document for `articles`, in the order given.
pub fn render_feed(channel: &ChannelConfig, articles: &[Article]) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0"), ("xmlns:atom", ATOM_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;
    text_element(&mut writer, "description", &channel.description)?;
    text_element(&mut writer, "atom:id", &channel.identifier())?;
    text_element(&mut writer, "docs", RSS_DOCS)?;
    text_element(
        &mut writer,
        "generator",
        concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
    )?;
    text_element(&mut writer, "language", &channel.language)?;
    if let Some(newest) = articles.iter().map(|a| a.publication_date).max() {
        text_element(&mut writer, "lastBuildDate", &newest.to_rfc2822())?;
    }

    for article in articles {
        write_item(&mut writer, article)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(String::from_utf8(xml)?)
}

/// The HTML body of an item: authors line, blank line, abstract.
pub fn item_description(article: &Article) -> String {
    format!(
        "<strong>Authors:</strong> {}<br><br><strong>Abstract:</strong> {}",
        article.authors, article.abstract_text
    )
}

fn write_item<W: Write>(writer: &mut Writer<W>, article: &Article) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;
    text_element(writer, "title", &article.title)?;
    text_element(writer, "link", &article.link)?;
    text_element(writer, "description", &item_description(article))?;

    write_text(
        writer,
        BytesStart::new("guid").with_attributes([("isPermaLink", "true")]),
        &article.link,
    )?;

    text_element(writer, "pubDate", &article.publication_date.to_rfc2822())?;
    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    write_text(writer, BytesStart::new(name), text)
}

fn write_text<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), FeedError> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&xml_chars_only(text))))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// Drop characters outside the XML 1.0 `Char` production.
///
/// Escaping handles markup characters but not control characters, which
/// scraped pages occasionally carry (e.g. `&#1;`).
pub fn xml_chars_only(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Write the rendered feed to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn write_feed(path: &str, xml: &str) -> Result<(), FeedError> {
    fs::write(path, xml).await?;
    info!(bytes = xml.len(), "Wrote RSS feed");
    Ok(())
}
