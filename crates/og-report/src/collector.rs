// ABOUTME: Tag collector that walks a parsed document and gathers sharing-metadata tags.
// ABOUTME: Emits synthetic title and descriptionFallback entries followed by every named <meta>.

//! Tag collection.
//!
//! The collector reads a parsed document once and produces a [`TagSet`]:
//!
//! 1. a synthetic `title` entry holding the first `<title>` text,
//! 2. a synthetic `descriptionFallback` entry holding the longest `<p>`/`<h1>`..`<h6>`
//!    text, cut to [`FALLBACK_MAX_CHARS`] characters,
//! 3. one entry per `<meta>` carrying a `name` (preferred) or `property` attribute,
//!
//! then keeps only the sharing-metadata properties. Collection never fails.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::tags::{RawTag, TagSet, DESCRIPTION_FALLBACK, TITLE};

/// Maximum length, in characters, of the descriptionFallback text.
pub const FALLBACK_MAX_CHARS: usize = 155;

static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static TEXT_BLOCK_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, h1, h2, h3, h4, h5, h6").unwrap());
static META_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("meta").unwrap());

/// Collapses runs of whitespace into single spaces and trims the ends.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Cuts `s` to at most `max` characters without splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Text of the first `<title>` element, or an empty string.
fn document_title(doc: &Html) -> String {
    doc.select(&TITLE_SEL)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

/// Longest text block in document order; the first one wins ties.
fn longest_text_block(doc: &Html) -> String {
    let mut best = String::new();
    let mut best_len = 0;
    for el in doc.select(&TEXT_BLOCK_SEL) {
        let text = element_text(&el);
        let len = text.chars().count();
        if len > best_len {
            best_len = len;
            best = text;
        }
    }
    truncate_chars(&best, FALLBACK_MAX_CHARS)
}

/// Reads an attribute, treating an empty value as missing.
fn non_empty_attr<'a>(el: &'a ElementRef<'_>, name: &str) -> Option<&'a str> {
    el.value().attr(name).filter(|v| !v.is_empty())
}

/// One tag per `<meta>` with a `name` or `property` attribute, `name` first.
fn meta_tags(doc: &Html) -> impl Iterator<Item = RawTag> + '_ {
    doc.select(&META_SEL).filter_map(|el| {
        let property = non_empty_attr(&el, "name").or_else(|| non_empty_attr(&el, "property"))?;
        let content = el.value().attr("content").map(str::to_string);
        Some(RawTag::new(property, content))
    })
}

/// Collects the sharing-metadata tags of a parsed document.
pub fn collect(doc: &Html) -> TagSet {
    let synthetic = [
        RawTag::new(TITLE, Some(document_title(doc))),
        RawTag::new(DESCRIPTION_FALLBACK, Some(longest_text_block(doc))),
    ];
    TagSet::from_raw(synthetic.into_iter().chain(meta_tags(doc)))
}

/// Parses `html` as a full document and collects its tags.
pub fn collect_html(html: &str) -> TagSet {
    let doc = Html::parse_document(html);
    collect(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn props(set: &TagSet) -> Vec<&str> {
        set.iter().map(|t| t.property.as_str()).collect()
    }

    #[test]
    fn empty_document_yields_two_empty_synthetic_entries() {
        let set = collect_html("");
        assert_eq!(
            set.as_slice(),
            &[
                RawTag::new("title", Some(String::new())),
                RawTag::new("descriptionFallback", Some(String::new())),
            ]
        );
    }

    #[test]
    fn no_meta_no_title_yields_two_entries() {
        let set = collect_html("<html><body><div>just a div</div></body></html>");
        assert_eq!(set.len(), 2);
        assert_eq!(set.content("title"), Some(""));
        assert_eq!(set.content("descriptionFallback"), Some(""));
    }

    #[test]
    fn first_title_wins() {
        let set = collect_html(
            "<html><head><title> Example \n Site </title><title>Other</title></head></html>",
        );
        assert_eq!(set.content("title"), Some("Example Site"));
    }

    #[test]
    fn meta_prefers_name_over_property() {
        let set = collect_html(
            r#"<html><head>
                <meta name="twitter:title" property="og:title" content="Both">
            </head></html>"#,
        );
        assert_eq!(props(&set), vec!["title", "descriptionFallback", "twitter:title"]);
        assert_eq!(set.content("twitter:title"), Some("Both"));
    }

    #[test]
    fn meta_without_name_or_property_is_skipped() {
        let set = collect_html(
            r#"<html><head>
                <meta charset="utf-8">
                <meta http-equiv="refresh" content="5">
                <meta property="og:type" content="website">
            </head></html>"#,
        );
        assert_eq!(props(&set), vec!["title", "descriptionFallback", "og:type"]);
    }

    #[test]
    fn missing_content_attribute_is_preserved_as_none() {
        let set = collect_html(
            r#"<html><head>
                <meta property="og:image">
                <meta property="og:title" content="">
            </head></html>"#,
        );
        assert_eq!(set.get("og:image").unwrap().content, None);
        assert_eq!(set.get("og:title").unwrap().content.as_deref(), Some(""));
    }

    #[test]
    fn non_sharing_meta_is_filtered_out() {
        let set = collect_html(
            r#"<html><head>
                <meta name="viewport" content="width=device-width">
                <meta name="description" content="A page.">
                <meta property="fb:app_id" content="123">
                <meta name="robots" content="index">
            </head></html>"#,
        );
        assert_eq!(
            props(&set),
            vec!["title", "descriptionFallback", "description", "fb:app_id"]
        );
    }

    #[test]
    fn document_order_is_preserved() {
        let set = collect_html(
            r#"<html><head>
                <meta name="twitter:card" content="summary">
                <meta property="og:title" content="T">
                <meta property="og:url" content="https://example.com/">
                <meta name="twitter:site" content="@example">
            </head></html>"#,
        );
        assert_eq!(
            props(&set),
            vec![
                "title",
                "descriptionFallback",
                "twitter:card",
                "og:title",
                "og:url",
                "twitter:site"
            ]
        );
    }

    #[test]
    fn fallback_picks_longest_block_first_on_ties() {
        let set = collect_html(
            r#"<html><body>
                <h1>Short</h1>
                <p>aaaa bbbb</p>
                <h2>cccc dddd</h2>
                <div>this div is much longer but is not a text block</div>
            </body></html>"#,
        );
        assert_eq!(set.content("descriptionFallback"), Some("aaaa bbbb"));
    }

    #[test]
    fn fallback_of_exactly_155_chars_is_kept() {
        let text = "x".repeat(155);
        let set = collect_html(&format!("<html><body><p>{}</p></body></html>", text));
        assert_eq!(set.content("descriptionFallback"), Some(text.as_str()));
    }

    #[test]
    fn fallback_of_156_chars_is_truncated() {
        let text = "y".repeat(156);
        let set = collect_html(&format!("<html><body><p>{}</p></body></html>", text));
        assert_eq!(
            set.content("descriptionFallback").map(|s| s.chars().count()),
            Some(155)
        );
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let text = "é".repeat(200);
        let cut = truncate_chars(&text, FALLBACK_MAX_CHARS);
        assert_eq!(cut.chars().count(), 155);
        assert_eq!(truncate_chars("short", 155), "short");
    }
}
