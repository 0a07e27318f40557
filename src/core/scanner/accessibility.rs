// src/core/scanner/accessibility.rs

use crate::core::knowledge_base::{CheckCategory, CheckId};
use crate::core::models::{CategoryResult, CheckStatus, FaviconCheck, FaviconResult, RobotsCheck};
use crate::core::normalize::short_path;
use crate::core::scoring;

/// Whether crawlers and browsers can actually reach the icons: robots.txt
/// rules, per-file reachability, and HTTPS delivery.
pub fn analyze_accessibility(results: &[FaviconResult], robots: &RobotsCheck) -> CategoryResult {
    let mut checks = Vec::new();

    if robots.blocks_favicon {
        checks.push(
            FaviconCheck::new(
                CheckId::RobotsTxt,
                "Robots.txt blocks favicon",
                "Search engines may not index your favicon",
                CheckStatus::Warning,
            )
            .with_recommendation("Review robots.txt rules for favicon paths"),
        );
    } else {
        checks.push(
            FaviconCheck::new(
                CheckId::RobotsTxt,
                "Robots.txt",
                "Favicon crawling allowed",
                CheckStatus::Pass,
            )
            .with_details("Not blocked by robots.txt"),
        );
    }

    let accessible: Vec<&FaviconResult> = results.iter().filter(|r| r.accessible).collect();
    let broken: Vec<&FaviconResult> = results.iter().filter(|r| !r.accessible).collect();

    if !results.is_empty() {
        if broken.is_empty() {
            let lines: Vec<String> = accessible
                .iter()
                .map(|r| format!("✓ {}", short_path(&r.url)))
                .collect();
            checks.push(
                FaviconCheck::new(
                    CheckId::AllAccessible,
                    "All favicons accessible",
                    "Every declared favicon loads successfully",
                    CheckStatus::Pass,
                )
                .with_details(lines.join("\n")),
            );
        } else if accessible.is_empty() {
            let lines: Vec<String> = broken
                .iter()
                .map(|r| format!("✗ {} {}", short_path(&r.url), failure_note(r)))
                .collect();
            checks.push(
                FaviconCheck::new(
                    CheckId::AllAccessible,
                    "No favicons accessible",
                    "None of the declared favicons load",
                    CheckStatus::Fail,
                )
                .with_details(lines.join("\n"))
                .with_recommendation("Check file paths and server configuration"),
            );
        } else {
            let mut lines: Vec<String> = accessible
                .iter()
                .map(|r| format!("✓ {}", short_path(&r.url)))
                .collect();
            lines.extend(
                broken
                    .iter()
                    .map(|r| format!("✗ {} {}", short_path(&r.url), failure_note(r))),
            );
            checks.push(
                FaviconCheck::new(
                    CheckId::AllAccessible,
                    "Some favicons inaccessible",
                    "One or more declared favicons fail to load",
                    CheckStatus::Warning,
                )
                .with_details(lines.join("\n"))
                .with_recommendation("Fix or remove broken favicon references"),
            );
        }
    }

    let insecure: Vec<&FaviconResult> = results
        .iter()
        .filter(|r| r.url.starts_with("http://"))
        .collect();
    if insecure.is_empty() {
        checks.push(FaviconCheck::new(
            CheckId::Https,
            "HTTPS delivery",
            "All favicons served over HTTPS",
            CheckStatus::Pass,
        ));
    } else {
        let lines: Vec<String> = insecure
            .iter()
            .map(|r| short_path(&r.url))
            .collect();
        checks.push(
            FaviconCheck::new(
                CheckId::Https,
                "Insecure favicon URLs",
                "Some favicons are served over plain HTTP",
                CheckStatus::Warning,
            )
            .with_details(lines.join("\n"))
            .with_recommendation("Use HTTPS for all favicon URLs"),
        );
    }

    CategoryResult {
        name: CheckCategory::Accessibility.to_string(),
        score: scoring::score(&checks),
        checks,
    }
}

fn failure_note(result: &FaviconResult) -> String {
    match result.http_status {
        Some(status) => format!("({status})"),
        None => "(failed to load)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(url: &str) -> FaviconResult {
        FaviconResult {
            url: url.to_string(),
            accessible: true,
            http_status: Some(200),
            size: None,
            format: None,
            dimensions: None,
        }
    }

    fn missing(url: &str, status: Option<u16>) -> FaviconResult {
        FaviconResult {
            url: url.to_string(),
            accessible: false,
            http_status: status,
            size: None,
            format: None,
            dimensions: None,
        }
    }

    fn check(category: &CategoryResult, id: CheckId) -> &FaviconCheck {
        category.checks.iter().find(|c| c.id == id).unwrap()
    }

    #[test]
    fn clean_site_passes_everything() {
        let results = vec![ok("https://a/favicon.ico"), ok("https://a/icon.png")];
        let robots = RobotsCheck {
            accessible: true,
            blocks_favicon: false,
        };
        let category = analyze_accessibility(&results, &robots);
        assert!(category.checks.iter().all(|c| c.status == CheckStatus::Pass));
        assert_eq!(category.score, 100);
    }

    #[test]
    fn robots_block_warns() {
        let robots = RobotsCheck {
            accessible: true,
            blocks_favicon: true,
        };
        let category = analyze_accessibility(&[], &robots);
        assert_eq!(check(&category, CheckId::RobotsTxt).status, CheckStatus::Warning);
    }

    #[test]
    fn mixed_accessibility_lists_both_sides() {
        let results = vec![ok("https://a/icon.png"), missing("https://a/favicon.ico", Some(404))];
        let robots = RobotsCheck {
            accessible: true,
            blocks_favicon: false,
        };
        let category = analyze_accessibility(&results, &robots);
        let all = check(&category, CheckId::AllAccessible);
        assert_eq!(all.status, CheckStatus::Warning);
        let details = all.details.as_deref().unwrap();
        assert!(details.contains("✓ /icon.png"));
        assert!(details.contains("✗ /favicon.ico (404)"));
    }

    #[test]
    fn all_broken_fails() {
        let results = vec![missing("https://a/favicon.ico", None)];
        let robots = RobotsCheck {
            accessible: false,
            blocks_favicon: false,
        };
        let category = analyze_accessibility(&results, &robots);
        let all = check(&category, CheckId::AllAccessible);
        assert_eq!(all.status, CheckStatus::Fail);
        assert!(all.details.as_deref().unwrap().contains("(failed to load)"));
    }

    #[test]
    fn plain_http_urls_are_flagged() {
        let results = vec![ok("http://a/favicon.ico"), ok("https://a/icon.png")];
        let robots = RobotsCheck {
            accessible: true,
            blocks_favicon: false,
        };
        let category = analyze_accessibility(&results, &robots);
        let https = check(&category, CheckId::Https);
        assert_eq!(https.status, CheckStatus::Warning);
        assert_eq!(https.details.as_deref(), Some("/favicon.ico"));
    }

    #[test]
    fn no_results_skips_reachability_check() {
        let robots = RobotsCheck {
            accessible: true,
            blocks_favicon: false,
        };
        let category = analyze_accessibility(&[], &robots);
        assert!(category.checks.iter().all(|c| c.id != CheckId::AllAccessible));
    }
}
