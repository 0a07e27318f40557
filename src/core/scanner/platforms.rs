// src/core/scanner/platforms.rs

use crate::core::knowledge_base::{CheckCategory, CheckId};
use crate::core::models::{
    CategoryResult, CheckStatus, FaviconCheck, FaviconReference, FaviconResult, PageSignals,
};
use crate::core::scoring;

/// Per-platform coverage: iOS home screen, Windows tiles, PWA manifest,
/// and the optional theme-color hint.
pub fn analyze_platforms(
    references: &[FaviconReference],
    results: &[FaviconResult],
    signals: &PageSignals,
) -> CategoryResult {
    let mut checks = Vec::new();

    let apple_touch = references.iter().find(|r| r.rel.contains("apple-touch-icon"));
    match apple_touch {
        Some(reference) => {
            let accessible = results
                .iter()
                .find(|r| r.url == reference.url)
                .is_some_and(|r| r.accessible);
            if accessible {
                checks.push(
                    FaviconCheck::new(
                        CheckId::AppleTouch,
                        "Apple Touch Icon",
                        "Icon for iOS home screen",
                        CheckStatus::Pass,
                    )
                    .with_details(match reference.sizes.as_deref() {
                        Some(sizes) => format!("Size: {sizes}"),
                        None => "Found".to_string(),
                    }),
                );
            } else {
                checks.push(
                    FaviconCheck::new(
                        CheckId::AppleTouch,
                        "Apple Touch Icon inaccessible",
                        "Apple Touch Icon declared but not accessible",
                        CheckStatus::Warning,
                    )
                    .with_recommendation("Ensure the apple-touch-icon file is accessible"),
                );
            }
        }
        None => {
            checks.push(
                FaviconCheck::new(
                    CheckId::AppleTouch,
                    "No Apple Touch Icon",
                    "Missing icon for iOS devices",
                    CheckStatus::Warning,
                )
                .with_recommendation(
                    r#"Add <link rel="apple-touch-icon" href="/apple-touch-icon.png">"#,
                ),
            );
        }
    }

    let has_ms_tile = references.iter().any(|r| r.rel == "msapplication-TileImage");
    if has_ms_tile || signals.ms_tile_config {
        checks.push(FaviconCheck::new(
            CheckId::MsTiles,
            "Microsoft Tiles",
            "Windows tile icons configured",
            CheckStatus::Pass,
        ));
    } else {
        checks.push(
            FaviconCheck::new(
                CheckId::MsTiles,
                "No Microsoft Tiles",
                "Missing Windows tile configuration",
                CheckStatus::Info,
            )
            .with_recommendation("Add msapplication meta tags for Windows tiles"),
        );
    }

    if signals.manifest_href.is_some() {
        checks.push(FaviconCheck::new(
            CheckId::WebManifest,
            "Web App Manifest",
            "PWA manifest file linked",
            CheckStatus::Pass,
        ));
    } else {
        checks.push(
            FaviconCheck::new(
                CheckId::WebManifest,
                "No Web App Manifest",
                "Missing manifest.json for PWA support",
                CheckStatus::Info,
            )
            .with_recommendation("Add a web app manifest for PWA support"),
        );
    }

    // theme-color is optional: only its presence is worth a line.
    if let Some(color) = &signals.theme_color {
        checks.push(
            FaviconCheck::new(
                CheckId::ThemeColor,
                "Theme Color",
                "Browser theme color set",
                CheckStatus::Pass,
            )
            .with_details(format!("Color: {color}")),
        );
    }

    CategoryResult {
        name: CheckCategory::Platforms.to_string(),
        score: scoring::score(&checks),
        checks,
    }
}
