// src/links/html.rs
// =============================================================================
// This module pulls hyperlink targets out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Unlike a link checker we do not resolve anything here: the raw attribute
// values are returned exactly as written in the markup. Turning "/app.js"
// into an absolute URL is the reconciler's job, because it needs the site
// origin of the whole batch, not just of one page.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;

// Any element carrying an href: <a>, <link>, <area>, <base>...
fn href_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("[href]").expect("static selector is valid"))
}

// Extracts every href attribute value found in the markup
//
// Example:
//   html = "<link href='/app.css'><a href='https://x.com/a.js'>a</a>"
//   result = {"/app.css", "https://x.com/a.js"}
pub fn extract_hrefs(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);

    document
        .select(href_selector())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_any_element() {
        let html = r#"
            <html><head>
                <link rel="preload" href="/static/app.js">
                <link rel="stylesheet" href="/static/site.css">
            </head><body>
                <a href="https://x.com/lib.js">lib</a>
                <area href="map.html">
            </body></html>
        "#;
        let links = extract_hrefs(html);
        assert_eq!(links.len(), 4);
        assert!(links.contains("/static/app.js"));
        assert!(links.contains("https://x.com/lib.js"));
        assert!(links.contains("map.html"));
    }

    #[test]
    fn test_values_are_not_normalized() {
        let html = r#"<a href="../up/one.js">x</a><a href="../up/one.js">y</a>"#;
        let links = extract_hrefs(html);
        assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["../up/one.js"]);
    }

    #[test]
    fn test_script_src_is_not_an_href() {
        let html = r#"<script src="/inline.js"></script>"#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_empty_body() {
        assert!(extract_hrefs("").is_empty());
    }
}
