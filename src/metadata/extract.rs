//! Open Graph / meta tag extraction from raw HTML
//!
//! The page is parsed into a DOM with `scraper`, so comments, raw-text
//! elements and character references behave as in a browser. Queries look
//! at `<meta>`, `<link>` and `<title>` anywhere in the document, first match
//! in document order.

use crate::metadata::types::{NO_DESCRIPTION, NO_TITLE, PageMetadata};
use scraper::node::Element;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid meta selector"));

static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link").expect("valid link selector"));

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

/// A parsed page, queried the way a preview card needs
#[derive(Debug, Clone)]
pub struct HeadDocument {
    html: Html,
}

impl HeadDocument {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// `content` of the first `meta[property=…]`
    pub fn meta_property(&self, property: &str) -> Option<&str> {
        self.first_attr(&META, "content", |el| el.attr("property") == Some(property))
    }

    /// `content` of the first `meta[name=…]`
    pub fn meta_name(&self, name: &str) -> Option<&str> {
        self.first_attr(&META, "content", |el| el.attr("name") == Some(name))
    }

    /// `href` of the first `link[rel=…]`; `rel` compares ASCII case-insensitively
    pub fn link_rel(&self, rel: &str) -> Option<&str> {
        self.first_attr(&LINK, "href", |el| {
            el.attr("rel").is_some_and(|value| value.eq_ignore_ascii_case(rel))
        })
    }

    /// Text of the first `<title>`
    pub fn title(&self) -> Option<String> {
        let title = self.html.select(&TITLE).next()?;
        non_empty(Some(title.text().collect::<String>()))
    }

    fn first_attr(
        &self,
        selector: &Selector,
        attr: &str,
        matches: impl Fn(&Element) -> bool,
    ) -> Option<&str> {
        let element = self
            .html
            .select(selector)
            .find(|el| matches(el.value()))?;
        non_empty(element.value().attr(attr))
    }
}

/// Extract preview metadata, falling back per field
pub fn extract_metadata(html: &str) -> PageMetadata {
    let doc = HeadDocument::parse(html);

    let title = doc
        .meta_property("og:title")
        .map(str::to_string)
        .or_else(|| doc.title())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let description = doc
        .meta_property("og:description")
        .or_else(|| doc.meta_name("description"))
        .unwrap_or(NO_DESCRIPTION);

    let image = doc
        .meta_property("og:image")
        .or_else(|| doc.link_rel("icon"))
        .map(str::to_string);

    PageMetadata::new(title, description, image)
}

/// Only the empty string counts as missing; whitespace is kept as written
fn non_empty<T: AsRef<str>>(value: Option<T>) -> Option<T> {
    value.filter(|v| !v.as_ref().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_graph_tags() {
        let html = r#"<html><head>
            <meta property="og:title" content="A">
            <meta property="og:description" content="B">
            <meta property="og:image" content="C.png">
            <title>Ignored</title>
        </head></html>"#;

        assert_eq!(
            extract_metadata(html),
            PageMetadata::new("A", "B", Some("C.png".to_string()))
        );
    }

    #[test]
    fn test_fallback_tags() {
        let html = r#"<html><head>
            <title>Fallback</title>
            <meta name="description" content="D">
        </head><body></body></html>"#;

        assert_eq!(extract_metadata(html), PageMetadata::new("Fallback", "D", None));
    }

    #[test]
    fn test_no_tags_at_all() {
        assert_eq!(
            extract_metadata("<html><body><p>hello</p></body></html>"),
            PageMetadata::new("No Title Available", "No Description Available", None)
        );
        assert_eq!(extract_metadata(""), PageMetadata::empty());
    }

    #[test]
    fn test_icon_used_when_no_og_image() {
        let html = r#"<link rel="stylesheet" href="a.css"><link rel="icon" href="/favicon.ico">"#;
        assert_eq!(
            extract_metadata(html).image.as_deref(),
            Some("/favicon.ico")
        );
    }

    #[test]
    fn test_fields_fall_back_independently() {
        let html = r#"<meta property="og:description" content="only description">
            <link rel="ICON" href="icon.png">"#;
        let meta = extract_metadata(html);

        assert_eq!(meta.title, NO_TITLE);
        assert_eq!(meta.description, "only description");
        assert_eq!(meta.image.as_deref(), Some("icon.png"));
    }

    #[test]
    fn test_empty_content_falls_through() {
        let html = r#"<meta property="og:title" content="">
            <meta property="og:description" content="">
            <meta name="description" content="Real description">
            <title>Real title</title>"#;
        let meta = extract_metadata(html);

        assert_eq!(meta.title, "Real title");
        assert_eq!(meta.description, "Real description");
    }

    #[test]
    fn test_whitespace_content_is_kept() {
        let html = r#"<meta property="og:description" content="   ">
            <meta name="description" content="Unused">
            <title>  Padded  </title>"#;
        let meta = extract_metadata(html);

        assert_eq!(meta.title, "  Padded  ");
        assert_eq!(meta.description, "   ");
    }

    #[test]
    fn test_first_matching_element_wins() {
        let html = r#"<meta property="og:title" content="First">
            <meta property="og:title" content="Second">"#;
        assert_eq!(extract_metadata(html).title, "First");
    }

    #[test]
    fn test_attribute_syntax_variants() {
        let html = "<META Content='Single quoted' PROPERTY='og:title' />\
                    <meta name=description content=unquoted>";
        let meta = extract_metadata(html);

        assert_eq!(meta.title, "Single quoted");
        assert_eq!(meta.description, "unquoted");
    }

    #[test]
    fn test_gt_inside_attribute_value() {
        let html = r#"<meta property="og:title" content="a > b">"#;
        assert_eq!(extract_metadata(html).title, "a > b");
    }

    #[test]
    fn test_comments_and_scripts_ignored() {
        let html = r#"<!-- <meta property="og:title" content="commented"> -->
            <script>var s = '<meta property="og:title" content="scripted">';</script>
            <style>/* <title>styled</title> */</style>
            <title>Visible</title>"#;
        assert_eq!(extract_metadata(html).title, "Visible");
    }

    #[test]
    fn test_comment_opener_inside_script() {
        let html = r#"<html><head>
            <script>var s = "<!--";</script>
            <meta property="og:title" content="Real">
        </head><body><p>text</p><!-- footer --></body></html>"#;
        assert_eq!(extract_metadata(html).title, "Real");
    }

    #[test]
    fn test_custom_elements_not_mistaken_for_meta() {
        let html = r#"<meta-data property="og:title" content="Bogus"><title>Right</title>"#;
        assert_eq!(extract_metadata(html).title, "Right");
    }

    #[test]
    fn test_entities_decoded() {
        let html = r#"<meta property="og:title" content="Tom &amp; Jerry&#39;s &#x201C;show&#x201D;">
            <meta property="og:description" content="&lt;b&gt;bold&lt;/b&gt;">"#;
        let meta = extract_metadata(html);

        assert_eq!(meta.title, "Tom & Jerry's \u{201c}show\u{201d}");
        assert_eq!(meta.description, "<b>bold</b>");
    }

    #[test]
    fn test_named_entities_in_title() {
        let html = "<title>Blog &raquo; &Eacute;t&eacute; &middot; News</title>";
        assert_eq!(extract_metadata(html).title, "Blog » Été · News");
    }

    #[test]
    fn test_head_document_queries() {
        let doc = HeadDocument::parse(
            r#"<meta name="twitter:card" content="summary"><link rel="icon" href="">"#,
        );

        assert_eq!(doc.meta_name("twitter:card"), Some("summary"));
        assert_eq!(doc.meta_property("twitter:card"), None);
        assert_eq!(doc.link_rel("icon"), None);
        assert_eq!(doc.title(), None);
    }
}
