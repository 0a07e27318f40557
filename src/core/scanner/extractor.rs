// src/core/scanner/extractor.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

use crate::core::models::{FaviconReference, PageSignals, ReferenceSource};

// Statically compiled selectors. Selector syntax is fixed at compile time,
// so parse failures here would be programmer errors.
static ICON_LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"link[rel*="icon"]"#).unwrap());
static APPLE_LINKS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"link[rel="apple-touch-icon"], link[rel="apple-touch-icon-precomposed"]"#)
        .unwrap()
});
static MS_TILE_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="msapplication-TileImage"]"#).unwrap());
static MS_TILE_CONFIG: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="msapplication-config"]"#).unwrap());
static MANIFEST_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel="manifest"]"#).unwrap());
static THEME_COLOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="theme-color"]"#).unwrap());

/// Collects every favicon reference a browser could act on: icon link
/// tags, apple-touch icons (deduplicated by resolved URL), the
/// msapplication tile meta, and the implicit `/favicon.ico` unless an
/// explicit link already resolves there. Output order is display order;
/// consumers must not rely on it when searching for a specific rel.
pub fn extract_references(document: &Html, base_url: &str) -> Vec<FaviconReference> {
    let mut refs: Vec<FaviconReference> = Vec::new();

    for el in document.select(&ICON_LINKS) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let url = resolve_href(href, base_url);
        if refs.iter().any(|r| r.url == url) {
            continue;
        }
        refs.push(FaviconReference {
            url,
            rel: el.value().attr("rel").unwrap_or("icon").to_string(),
            mime_type: el.value().attr("type").map(str::to_string),
            sizes: el.value().attr("sizes").map(str::to_string),
            source: ReferenceSource::Link,
        });
    }

    // Apple touch icons also match the substring selector above, so this
    // pass mostly confirms dedup; it still catches exotic markup where
    // the first selector missed them.
    for el in document.select(&APPLE_LINKS) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let url = resolve_href(href, base_url);
        if refs.iter().any(|r| r.url == url) {
            continue;
        }
        refs.push(FaviconReference {
            url,
            rel: el
                .value()
                .attr("rel")
                .unwrap_or("apple-touch-icon")
                .to_string(),
            mime_type: None,
            sizes: el.value().attr("sizes").map(str::to_string),
            source: ReferenceSource::Link,
        });
    }

    if let Some(content) = document
        .select(&MS_TILE_IMAGE)
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        let url = resolve_href(content, base_url);
        if !refs.iter().any(|r| r.url == url) {
            refs.push(FaviconReference {
                url,
                rel: "msapplication-TileImage".to_string(),
                mime_type: None,
                sizes: None,
                source: ReferenceSource::Meta,
            });
        }
    }

    // Browsers try /favicon.ico whether or not it is declared.
    let default_url = format!("{base_url}/favicon.ico");
    if !refs.iter().any(|r| r.url == default_url) {
        refs.push(FaviconReference {
            url: default_url,
            rel: "icon".to_string(),
            mime_type: None,
            sizes: None,
            source: ReferenceSource::Default,
        });
    }

    debug!(count = refs.len(), "Extracted favicon references.");
    refs
}

/// Resolves an href against the page's base origin. Deliberately simpler
/// than RFC 3986 resolution: relative paths are joined to the origin root,
/// which is what favicon declarations in the wild overwhelmingly mean.
pub fn resolve_href(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}

/// Lifts the platform signals the analyzers need out of the DOM.
pub fn page_signals(document: &Html) -> PageSignals {
    PageSignals {
        ms_tile_config: document.select(&MS_TILE_CONFIG).next().is_some(),
        manifest_href: document
            .select(&MANIFEST_LINK)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(str::to_string),
        theme_color: document
            .select(&THEME_COLOR)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com";

    fn extract(html: &str) -> Vec<FaviconReference> {
        extract_references(&Html::parse_document(html), BASE)
    }

    #[test]
    fn href_resolution_rules() {
        assert_eq!(resolve_href("https://cdn.io/f.png", BASE), "https://cdn.io/f.png");
        assert_eq!(resolve_href("http://cdn.io/f.png", BASE), "http://cdn.io/f.png");
        assert_eq!(resolve_href("//cdn.io/f.png", BASE), "https://cdn.io/f.png");
        assert_eq!(resolve_href("/f.png", BASE), "https://example.com/f.png");
        assert_eq!(resolve_href("f.png", BASE), "https://example.com/f.png");
    }

    #[test]
    fn implicit_default_appended() {
        let refs = extract("<html><head></head></html>");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].url, "https://example.com/favicon.ico");
        assert_eq!(refs[0].source, ReferenceSource::Default);
    }

    #[test]
    fn implicit_default_suppressed_by_explicit_link() {
        let refs = extract(r#"<head><link rel="icon" href="/favicon.ico"></head>"#);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].source, ReferenceSource::Link);
    }

    #[test]
    fn link_attributes_are_captured() {
        let refs = extract(
            r#"<head><link rel="shortcut icon" href="/fav.ico" type="image/x-icon" sizes="32x32"></head>"#,
        );
        let link = &refs[0];
        assert_eq!(link.rel, "shortcut icon");
        assert_eq!(link.mime_type.as_deref(), Some("image/x-icon"));
        assert_eq!(link.sizes.as_deref(), Some("32x32"));
    }

    #[test]
    fn apple_touch_deduplicated_by_url() {
        let refs = extract(
            r#"<head>
                 <link rel="icon" href="/apple-touch-icon.png">
                 <link rel="apple-touch-icon" href="/apple-touch-icon.png">
               </head>"#,
        );
        let apple_count = refs
            .iter()
            .filter(|r| r.url == "https://example.com/apple-touch-icon.png")
            .count();
        assert_eq!(apple_count, 1);
    }

    #[test]
    fn no_duplicate_urls_from_any_path() {
        let refs = extract(
            r#"<head>
                 <link rel="icon" href="/favicon.ico">
                 <link rel="apple-touch-icon" href="/touch.png" sizes="180x180">
                 <link rel="apple-touch-icon-precomposed" href="/touch.png">
                 <meta name="msapplication-TileImage" content="/tile.png">
               </head>"#,
        );
        let mut urls: Vec<_> = refs.iter().map(|r| r.url.clone()).collect();
        let total = urls.len();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), total);
        assert!(refs.iter().any(|r| r.rel == "msapplication-TileImage"
            && r.source == ReferenceSource::Meta));
    }

    #[test]
    fn signals_capture_platform_metadata() {
        let html = Html::parse_document(
            r##"<head>
                 <meta name="msapplication-config" content="/browserconfig.xml">
                 <link rel="manifest" href="/site.webmanifest">
                 <meta name="theme-color" content="#102030">
               </head>"##,
        );
        let signals = page_signals(&html);
        assert!(signals.ms_tile_config);
        assert_eq!(signals.manifest_href.as_deref(), Some("/site.webmanifest"));
        assert_eq!(signals.theme_color.as_deref(), Some("#102030"));

        let empty = page_signals(&Html::parse_document("<head></head>"));
        assert!(!empty.ms_tile_config);
        assert!(empty.manifest_href.is_none());
        assert!(empty.theme_color.is_none());
    }
}
