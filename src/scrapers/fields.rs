//! Field extraction for a single listing entry.
//!
//! On the table of contents, each entry's title block (`div.art_title`) is
//! followed, not wrapped, by its author list and publication date. Those two
//! are found with [`find_next`], a document-order search that starts inside
//! the entry and continues past it.

use super::Selectors;
use crate::models::ArticleDraft;
use crate::utils::{element_text, resolve_link};
use scraper::{ElementRef, Selector};
use thiserror::Error;
use url::Url;

/// Why a listing entry produced no article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Skip {
    #[error("entry has no hyperlink")]
    NoLink,
    #[error("entry hyperlink has no title text")]
    EmptyTitle,
}

/// Extract the draft fields of one listing entry.
///
/// Authors and date are optional. A missing hyperlink or title skips the entry.
pub fn extract_fields(
    entry: ElementRef<'_>,
    selectors: &Selectors,
    base: &Url,
) -> Result<ArticleDraft, Skip> {
    let anchor = entry.select(&selectors.link).next().ok_or(Skip::NoLink)?;

    let title = element_text(anchor);
    if title.is_empty() {
        return Err(Skip::EmptyTitle);
    }
    let link = resolve_link(base, anchor.value().attr("href").unwrap_or(""));

    Ok(ArticleDraft {
        title,
        link,
        authors: extract_authors(entry, selectors),
        raw_date: extract_raw_date(entry, selectors),
    })
}

fn extract_authors(entry: ElementRef<'_>, selectors: &Selectors) -> Vec<String> {
    let Some(container) = find_next(entry, &selectors.authors) else {
        return Vec::new();
    };
    container
        .select(&selectors.link)
        .map(element_text)
        .filter(|name| !name.is_empty())
        .collect()
}

fn extract_raw_date(entry: ElementRef<'_>, selectors: &Selectors) -> Option<String> {
    find_next(entry, &selectors.date).map(element_text)
}

/// Find the first element after `start` in document order that matches `selector`.
///
/// The search covers `start`'s own descendants, then everything that follows
/// it: later siblings and their subtrees, then the later siblings of each
/// ancestor. `start` itself is never returned.
pub fn find_next<'a>(start: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    let matches = |node| ElementRef::wrap(node).filter(|el| selector.matches(el));

    if let Some(found) = start.descendants().skip(1).find_map(matches) {
        return Some(found);
    }

    let mut current = Some(*start);
    while let Some(node) = current {
        for sibling in node.next_siblings() {
            if let Some(found) = sibling.descendants().find_map(matches) {
                return Some(found);
            }
        }
        current = node.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use scraper::Html;

    fn selectors() -> Selectors {
        Selectors::compile(&SelectorConfig::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://www.tandfonline.com").unwrap()
    }

    fn first_entry<'a>(doc: &'a Html, selectors: &Selectors) -> ElementRef<'a> {
        doc.select(&selectors.entry).next().unwrap()
    }

    const LISTING: &str = r#"
        <div class="issue-item">
          <div class="art_title"><a href="/doi/abs/10.1/123">  Deep Learning
            for GIS </a></div>
          <div class="art_authors">
            <a href="/author/smith">J. Smith</a>, <a href="/author/doe"> A. Doe </a>
          </div>
          <div class="art-pub-date"> 15 Mar 2024 </div>
        </div>
        <div class="issue-item">
          <div class="art_title"><a href="/doi/abs/10.1/456">Second</a></div>
        </div>
    "#;

    #[test]
    fn test_extracts_all_fields() {
        let doc = Html::parse_document(LISTING);
        let sel = selectors();
        let draft = extract_fields(first_entry(&doc, &sel), &sel, &base()).unwrap();

        assert_eq!(draft.title, "Deep Learning for GIS");
        assert_eq!(draft.link, "https://www.tandfonline.com/doi/abs/10.1/123");
        assert_eq!(draft.authors, vec!["J. Smith", "A. Doe"]);
        assert_eq!(draft.raw_date.as_deref(), Some("15 Mar 2024"));
    }

    #[test]
    fn test_missing_link_skips_entry() {
        let doc = Html::parse_document(r#"<div class="art_title">No link here</div>"#);
        let sel = selectors();
        assert_eq!(
            extract_fields(first_entry(&doc, &sel), &sel, &base()),
            Err(Skip::NoLink)
        );
    }

    #[test]
    fn test_blank_title_skips_entry() {
        let doc = Html::parse_document(r#"<div class="art_title"><a href="/doi/x">   </a></div>"#);
        let sel = selectors();
        assert_eq!(
            extract_fields(first_entry(&doc, &sel), &sel, &base()),
            Err(Skip::EmptyTitle)
        );
    }

    #[test]
    fn test_missing_href_yields_origin() {
        let doc = Html::parse_document(r#"<div class="art_title"><a>Untargeted</a></div>"#);
        let sel = selectors();
        let draft = extract_fields(first_entry(&doc, &sel), &sel, &base()).unwrap();
        assert_eq!(draft.link, "https://www.tandfonline.com");
    }

    #[test]
    fn test_missing_authors_and_date() {
        let doc =
            Html::parse_document(r#"<div class="art_title"><a href="/doi/x">Alone</a></div>"#);
        let sel = selectors();
        let draft = extract_fields(first_entry(&doc, &sel), &sel, &base()).unwrap();
        assert!(draft.authors.is_empty());
        assert!(draft.raw_date.is_none());
    }

    #[test]
    fn test_following_search_crosses_entry_boundary() {
        // The second entry has no authors of its own and none follow it.
        let doc = Html::parse_document(LISTING);
        let sel = selectors();
        let second = doc.select(&sel.entry).nth(1).unwrap();
        let draft = extract_fields(second, &sel, &base()).unwrap();
        assert_eq!(draft.title, "Second");
        assert!(draft.authors.is_empty());
        assert!(draft.raw_date.is_none());
    }

    #[test]
    fn test_find_next_skips_preceding_elements() {
        let doc = Html::parse_document(concat!(
            r#"<p class="x">before</p><div id="start"></div>"#,
            r#"<section><p class="x">after</p></section>"#,
        ));
        let start = doc.select(&Selector::parse("#start").unwrap()).next().unwrap();
        let found = find_next(start, &Selector::parse("p.x").unwrap()).unwrap();
        assert_eq!(element_text(found), "after");
    }

    #[test]
    fn test_find_next_searches_descendants_first() {
        let doc = Html::parse_document(
            r#"<div id="start"><p class="x">inside</p></div><p class="x">after</p>"#,
        );
        let start = doc.select(&Selector::parse("#start").unwrap()).next().unwrap();
        let found = find_next(start, &Selector::parse("p.x").unwrap()).unwrap();
        assert_eq!(element_text(found), "inside");
    }

    #[test]
    fn test_find_next_climbs_ancestors() {
        let doc = Html::parse_document(concat!(
            r#"<div><div><span id="start"></span></div></div>"#,
            r#"<footer><p class="x">far</p></footer>"#,
        ));
        let start = doc.select(&Selector::parse("#start").unwrap()).next().unwrap();
        let found = find_next(start, &Selector::parse("p.x").unwrap()).unwrap();
        assert_eq!(element_text(found), "far");
    }

    #[test]
    fn test_find_next_none() {
        let doc = Html::parse_document(r#"<div id="start"></div>"#);
        let start = doc.select(&Selector::parse("#start").unwrap()).next().unwrap();
        assert!(find_next(start, &Selector::parse("p.x").unwrap()).is_none());
    }
}
