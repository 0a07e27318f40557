// src/core/scanner/basic.rs

use crate::core::knowledge_base::{CheckCategory, CheckId};
use crate::core::models::{
    CategoryResult, CheckStatus, FaviconCheck, FaviconReference, FaviconResult, ReferenceSource,
};
use crate::core::normalize::{format_bytes, short_path};
use crate::core::scoring;

/// The baseline checks: does the classic `/favicon.ico` exist, are any
/// link tags declared and working, and can a browser load anything at all.
pub fn analyze_basic(references: &[FaviconReference], results: &[FaviconResult]) -> CategoryResult {
    let mut checks = Vec::new();

    let default_favicon = results.iter().find(|r| r.url.ends_with("/favicon.ico"));
    match default_favicon {
        Some(result) if result.accessible => {
            let size_info = result
                .size
                .map(|s| format!(" ({})", format_bytes(s)))
                .unwrap_or_default();
            checks.push(
                FaviconCheck::new(
                    CheckId::FaviconIco,
                    "favicon.ico exists",
                    "The standard /favicon.ico file is accessible",
                    CheckStatus::Pass,
                )
                .with_details(format!("/favicon.ico{size_info}")),
            );
        }
        other => {
            let details = match other.and_then(|r| r.http_status) {
                Some(status) => format!("Returned HTTP {status}"),
                None => "Connection failed, the file may not exist".to_string(),
            };
            checks.push(
                FaviconCheck::new(
                    CheckId::FaviconIco,
                    "favicon.ico missing",
                    "The standard /favicon.ico file is not accessible",
                    CheckStatus::Fail,
                )
                .with_details(details)
                .with_recommendation("Add a favicon.ico file to your website root directory"),
            );
        }
    }

    let link_refs: Vec<&FaviconReference> = references
        .iter()
        .filter(|r| r.source == ReferenceSource::Link)
        .collect();
    if link_refs.is_empty() {
        checks.push(
            FaviconCheck::new(
                CheckId::LinkTags,
                "No link tags",
                "No favicon link tags found in HTML",
                CheckStatus::Warning,
            )
            .with_details("No <link rel=\"icon\"> or similar tags detected in HTML head")
            .with_recommendation("Add explicit favicon link tags for better browser support"),
        );
    } else {
        let accessible_links: Vec<&FaviconResult> = results
            .iter()
            .filter(|r| r.accessible && link_refs.iter().any(|l| l.url == r.url))
            .collect();
        if accessible_links.is_empty() {
            let details: Vec<String> = link_refs
                .iter()
                .map(|l| format!("✗ {}", short_path(&l.url)))
                .collect();
            checks.push(
                FaviconCheck::new(
                    CheckId::LinkTags,
                    "Link tags inaccessible",
                    "Favicon link tags found but resources are not accessible",
                    CheckStatus::Warning,
                )
                .with_details(details.join("\n"))
                .with_recommendation("Check that your favicon files are properly deployed"),
            );
        } else {
            let details: Vec<String> = accessible_links
                .iter()
                .map(|r| {
                    let sizes = link_refs
                        .iter()
                        .find(|l| l.url == r.url)
                        .and_then(|l| l.sizes.as_deref())
                        .map(|s| format!(" [{s}]"))
                        .unwrap_or_default();
                    format!("✓ {}{sizes}", short_path(&r.url))
                })
                .collect();
            checks.push(
                FaviconCheck::new(
                    CheckId::LinkTags,
                    "Link tags present",
                    "Favicon declared using <link> tags in HTML",
                    CheckStatus::Pass,
                )
                .with_details(details.join("\n")),
            );
        }
    }

    let accessible_count = results.iter().filter(|r| r.accessible).count();
    if accessible_count > 0 {
        checks.push(
            FaviconCheck::new(
                CheckId::AnyFavicon,
                "Favicon available",
                "At least one favicon is accessible",
                CheckStatus::Pass,
            )
            .with_details(format!("{accessible_count} favicon(s) can be loaded by browsers")),
        );
    } else {
        checks.push(
            FaviconCheck::new(
                CheckId::AnyFavicon,
                "No accessible favicon",
                "No favicon could be loaded",
                CheckStatus::Fail,
            )
            .with_details("Browsers will show a generic icon or blank tab")
            .with_recommendation("Ensure at least one favicon file is accessible"),
        );
    }

    CategoryResult {
        name: CheckCategory::Basic.to_string(),
        score: scoring::score(&checks),
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_ref(url: &str, sizes: Option<&str>) -> FaviconReference {
        FaviconReference {
            url: url.to_string(),
            rel: "icon".to_string(),
            mime_type: None,
            sizes: sizes.map(str::to_string),
            source: ReferenceSource::Link,
        }
    }

    fn default_ref(url: &str) -> FaviconReference {
        FaviconReference {
            url: url.to_string(),
            rel: "icon".to_string(),
            mime_type: None,
            sizes: None,
            source: ReferenceSource::Default,
        }
    }

    fn ok(url: &str, size: u64) -> FaviconResult {
        FaviconResult {
            url: url.to_string(),
            accessible: true,
            http_status: Some(200),
            size: Some(size),
            format: None,
            dimensions: None,
        }
    }

    fn missing(url: &str, status: Option<u16>) -> FaviconResult {
        FaviconResult {
            http_status: status,
            ..FaviconResult::unreachable(url)
        }
    }

    fn status_of(category: &CategoryResult, id: CheckId) -> CheckStatus {
        category
            .checks
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.status)
            .unwrap()
    }

    #[test]
    fn everything_working_scores_perfect() {
        let ico = "https://example.com/favicon.ico";
        let refs = vec![link_ref(ico, Some("32x32"))];
        let results = vec![ok(ico, 2048)];
        let category = analyze_basic(&refs, &results);
        assert_eq!(status_of(&category, CheckId::FaviconIco), CheckStatus::Pass);
        assert_eq!(status_of(&category, CheckId::LinkTags), CheckStatus::Pass);
        assert_eq!(status_of(&category, CheckId::AnyFavicon), CheckStatus::Pass);
        assert_eq!(category.score, 100);
    }

    #[test]
    fn missing_ico_reports_http_status() {
        let ico = "https://example.com/favicon.ico";
        let png = "https://example.com/icon.png";
        let refs = vec![link_ref(png, None), default_ref(ico)];
        let results = vec![ok(png, 900), missing(ico, Some(404))];
        let category = analyze_basic(&refs, &results);
        assert_eq!(status_of(&category, CheckId::FaviconIco), CheckStatus::Fail);
        let check = category.checks.iter().find(|c| c.id == CheckId::FaviconIco).unwrap();
        assert_eq!(check.details.as_deref(), Some("Returned HTTP 404"));
        assert_eq!(status_of(&category, CheckId::AnyFavicon), CheckStatus::Pass);
    }

    #[test]
    fn declared_but_broken_links_warn() {
        let ico = "https://example.com/favicon.ico";
        let png = "https://example.com/gone.png";
        let refs = vec![link_ref(png, None), default_ref(ico)];
        let results = vec![missing(png, Some(404)), ok(ico, 500)];
        let category = analyze_basic(&refs, &results);
        assert_eq!(status_of(&category, CheckId::LinkTags), CheckStatus::Warning);
        assert_eq!(status_of(&category, CheckId::AnyFavicon), CheckStatus::Pass);
    }

    #[test]
    fn nothing_accessible_fails_hard() {
        let ico = "https://example.com/favicon.ico";
        let refs = vec![default_ref(ico)];
        let results = vec![missing(ico, None)];
        let category = analyze_basic(&refs, &results);
        assert_eq!(status_of(&category, CheckId::FaviconIco), CheckStatus::Fail);
        assert_eq!(status_of(&category, CheckId::LinkTags), CheckStatus::Warning);
        assert_eq!(status_of(&category, CheckId::AnyFavicon), CheckStatus::Fail);
    }
}
