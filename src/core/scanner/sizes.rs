// src/core/scanner/sizes.rs

use crate::core::knowledge_base::{CheckCategory, CheckId};
use crate::core::models::{CategoryResult, CheckStatus, FaviconCheck, FaviconResult, IconFormat};
use crate::core::normalize::{format_bytes, short_path};
use crate::core::scoring;

/// Files above this are flagged as oversized for an icon.
pub const MAX_ICON_BYTES: u64 = 100_000;

/// Size and format hygiene. Short-circuits to a single failing check when
/// nothing is accessible: there is nothing to measure.
pub fn analyze_sizes(results: &[FaviconResult]) -> CategoryResult {
    let accessible: Vec<&FaviconResult> = results.iter().filter(|r| r.accessible).collect();

    if accessible.is_empty() {
        let checks = vec![
            FaviconCheck::new(
                CheckId::NoFavicons,
                "No favicons to analyze",
                "Cannot check sizes without accessible favicons",
                CheckStatus::Fail,
            )
            .with_details("Fix accessibility issues first to enable size analysis"),
        ];
        return CategoryResult {
            name: CheckCategory::Sizes.to_string(),
            score: scoring::score(&checks),
            checks,
        };
    }

    let mut checks = Vec::new();

    let with_size: Vec<&&FaviconResult> = accessible.iter().filter(|r| r.size.is_some()).collect();
    let large: Vec<_> = with_size
        .iter()
        .filter(|r| r.size.is_some_and(|s| s > MAX_ICON_BYTES))
        .collect();
    if !large.is_empty() {
        let mut details: Vec<String> = large
            .iter()
            .map(|r| {
                format!(
                    "✗ {}: {} (over 100KB)",
                    short_path(&r.url),
                    format_bytes(r.size.unwrap_or(0))
                )
            })
            .collect();
        details.extend(
            with_size
                .iter()
                .filter(|r| r.size.is_some_and(|s| s <= MAX_ICON_BYTES))
                .map(|r| format!("✓ {}: {}", short_path(&r.url), format_bytes(r.size.unwrap_or(0)))),
        );
        checks.push(
            FaviconCheck::new(
                CheckId::FileSize,
                "Large favicon files",
                "Some favicon files are larger than recommended",
                CheckStatus::Warning,
            )
            .with_details(details.join("\n"))
            .with_recommendation("Optimize favicon files to be under 100KB for faster loading"),
        );
    } else if !with_size.is_empty() {
        let details: Vec<String> = with_size
            .iter()
            .map(|r| format!("✓ {}: {}", short_path(&r.url), format_bytes(r.size.unwrap_or(0))))
            .collect();
        checks.push(
            FaviconCheck::new(
                CheckId::FileSize,
                "File sizes OK",
                "All favicon files are reasonably sized",
                CheckStatus::Pass,
            )
            .with_details(details.join("\n")),
        );
    }
    // No content-length anywhere: no size verdict at all.

    // Group accessible favicons by format, preserving first-seen order.
    let mut by_format: Vec<(IconFormat, Vec<&FaviconResult>)> = Vec::new();
    for result in accessible.iter().copied() {
        let format = result.format.unwrap_or(IconFormat::Unknown);
        match by_format.iter_mut().find(|(f, _)| *f == format) {
            Some((_, group)) => group.push(result),
            None => by_format.push((format, vec![result])),
        }
    }

    let has = |format: IconFormat| by_format.iter().any(|(f, _)| *f == format);
    let has_png = has(IconFormat::Png);
    let has_svg = has(IconFormat::Svg);
    let has_ico = has(IconFormat::Ico);

    if has_png || has_svg {
        let details: Vec<String> = by_format
            .iter()
            .map(|(format, group)| {
                let paths: Vec<String> = group.iter().map(|r| short_path(&r.url)).collect();
                format!("{}: {}", format.label(), paths.join(", "))
            })
            .collect();
        checks.push(
            FaviconCheck::new(
                CheckId::ModernFormat,
                "Modern format available",
                "PNG or SVG favicon is available",
                CheckStatus::Pass,
            )
            .with_details(details.join("\n")),
        );
    } else if has_ico {
        checks.push(
            FaviconCheck::new(
                CheckId::ModernFormat,
                "Only ICO format",
                "Consider adding PNG favicon for better quality",
                CheckStatus::Info,
            )
            .with_details("ICO works but PNG/SVG provide better quality on high-DPI screens")
            .with_recommendation("Add a PNG favicon for modern browsers"),
        );
    }

    if has_svg {
        let svg_paths: Vec<String> = by_format
            .iter()
            .find(|(f, _)| *f == IconFormat::Svg)
            .map(|(_, group)| group.iter().map(|r| short_path(&r.url)).collect())
            .unwrap_or_default();
        checks.push(
            FaviconCheck::new(
                CheckId::SvgFavicon,
                "SVG favicon available",
                "Vector favicon provides perfect scaling",
                CheckStatus::Pass,
            )
            .with_details(svg_paths.join("\n")),
        );
    }

    CategoryResult {
        name: CheckCategory::Sizes.to_string(),
        score: scoring::score(&checks),
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(url: &str, size: Option<u64>, format: IconFormat) -> FaviconResult {
        FaviconResult {
            url: url.to_string(),
            accessible: true,
            http_status: Some(200),
            size,
            format: Some(format),
            dimensions: None,
        }
    }

    #[test]
    fn no_accessible_favicons_short_circuits() {
        let results = vec![
            FaviconResult::unreachable("https://a/favicon.ico"),
            FaviconResult::unreachable("https://a/icon.png"),
            FaviconResult::unreachable("https://a/tile.png"),
        ];
        let category = analyze_sizes(&results);
        assert_eq!(category.score, 0);
        assert_eq!(category.checks.len(), 1);
        assert_eq!(category.checks[0].id, CheckId::NoFavicons);
        assert_eq!(category.checks[0].status, CheckStatus::Fail);
    }

    #[test]
    fn oversized_files_bundle_into_one_warning() {
        let results = vec![
            icon("https://a/huge.png", Some(250_000), IconFormat::Png),
            icon("https://a/ok.png", Some(4_000), IconFormat::Png),
        ];
        let category = analyze_sizes(&results);
        let check = category.checks.iter().find(|c| c.id == CheckId::FileSize).unwrap();
        assert_eq!(check.status, CheckStatus::Warning);
        let details = check.details.as_deref().unwrap();
        assert!(details.contains("✗ /huge.png"));
        assert!(details.contains("✓ /ok.png"));
    }

    #[test]
    fn ico_only_is_informational() {
        let results = vec![icon("https://a/favicon.ico", Some(2_048), IconFormat::Ico)];
        let category = analyze_sizes(&results);
        let modern = category.checks.iter().find(|c| c.id == CheckId::ModernFormat).unwrap();
        assert_eq!(modern.status, CheckStatus::Info);
        assert!(category.checks.iter().all(|c| c.id != CheckId::SvgFavicon));
        // file-size pass + modern-format info
        assert_eq!(category.score, 90);
    }

    #[test]
    fn svg_presence_adds_its_own_pass() {
        let results = vec![
            icon("https://a/favicon.ico", Some(2_048), IconFormat::Ico),
            icon("https://a/icon.svg", Some(1_000), IconFormat::Svg),
        ];
        let category = analyze_sizes(&results);
        let modern = category.checks.iter().find(|c| c.id == CheckId::ModernFormat).unwrap();
        assert_eq!(modern.status, CheckStatus::Pass);
        let svg = category.checks.iter().find(|c| c.id == CheckId::SvgFavicon).unwrap();
        assert_eq!(svg.status, CheckStatus::Pass);
        assert_eq!(svg.details.as_deref(), Some("/icon.svg"));
    }

    #[test]
    fn missing_content_length_emits_no_size_check() {
        let results = vec![icon("https://a/icon.png", None, IconFormat::Png)];
        let category = analyze_sizes(&results);
        assert!(category.checks.iter().all(|c| c.id != CheckId::FileSize));
        assert!(category.checks.iter().any(|c| c.id == CheckId::ModernFormat));
    }
}
