//! The static "brain" of the scanner: the closed set of check identifiers,
//! the category each belongs to, and a read-only database of fix guides
//! with concrete remediation steps. Keeping the ids a closed enum makes
//! the id-to-guide mapping exhaustive at compile time instead of an open
//! string lookup that can silently miss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The high-level categories a check can belong to, in scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckCategory {
    Basic,
    Sizes,
    Platforms,
    Accessibility,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Basic => write!(f, "Basic Checks"),
            CheckCategory::Sizes => write!(f, "Size & Format"),
            CheckCategory::Platforms => write!(f, "Platform Support"),
            CheckCategory::Accessibility => write!(f, "Accessibility"),
        }
    }
}

/// Every check id an analyzer can emit. Serializes to the stable
/// kebab-case keys used in persisted scan results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CheckId {
    FaviconIco,
    LinkTags,
    AnyFavicon,
    NoFavicons,
    FileSize,
    ModernFormat,
    SvgFavicon,
    AppleTouch,
    MsTiles,
    WebManifest,
    ThemeColor,
    RobotsTxt,
    AllAccessible,
    Https,
}

impl CheckId {
    /// The stable string key, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::FaviconIco => "favicon-ico",
            CheckId::LinkTags => "link-tags",
            CheckId::AnyFavicon => "any-favicon",
            CheckId::NoFavicons => "no-favicons",
            CheckId::FileSize => "file-size",
            CheckId::ModernFormat => "modern-format",
            CheckId::SvgFavicon => "svg-favicon",
            CheckId::AppleTouch => "apple-touch",
            CheckId::MsTiles => "ms-tiles",
            CheckId::WebManifest => "web-manifest",
            CheckId::ThemeColor => "theme-color",
            CheckId::RobotsTxt => "robots-txt",
            CheckId::AllAccessible => "all-accessible",
            CheckId::Https => "https",
        }
    }

    /// Which category an analyzer emits this check under.
    pub fn category(&self) -> CheckCategory {
        match self {
            CheckId::FaviconIco | CheckId::LinkTags | CheckId::AnyFavicon => CheckCategory::Basic,
            CheckId::NoFavicons | CheckId::FileSize | CheckId::ModernFormat | CheckId::SvgFavicon => {
                CheckCategory::Sizes
            }
            CheckId::AppleTouch | CheckId::MsTiles | CheckId::WebManifest | CheckId::ThemeColor => {
                CheckCategory::Platforms
            }
            CheckId::RobotsTxt | CheckId::AllAccessible | CheckId::Https => {
                CheckCategory::Accessibility
            }
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step-by-step remediation guide for one check id.
pub struct FixGuide {
    pub title: &'static str,
    pub steps: &'static [&'static str],
    pub code: Option<&'static str>,
}

/// Returns the fix guide for a check id. Advisory ids that never need
/// fixing (the pass-only and short-circuit checks) have no guide.
/// The match is exhaustive, so adding a `CheckId` variant without
/// deciding its guide is a compile error.
pub fn fix_guide(id: CheckId) -> Option<FixGuide> {
    match id {
        CheckId::FaviconIco => Some(FixGuide {
            title: "How to add favicon.ico",
            steps: &[
                "Create a 32x32 pixel ICO file (can include 16x16 embedded)",
                "Name it exactly \"favicon.ico\"",
                "Place it in your website's root directory",
                "Add the link tag to your HTML <head> for explicit declaration",
            ],
            code: Some(r#"<link rel="icon" href="/favicon.ico" sizes="32x32">"#),
        }),
        CheckId::LinkTags => Some(FixGuide {
            title: "How to add favicon link tags",
            steps: &[
                "Add link tags in your HTML <head> section",
                "Include multiple sizes for better browser support",
                "Use absolute paths starting with / for reliability",
            ],
            code: Some(
                r#"<link rel="icon" href="/favicon.ico" sizes="32x32">
<link rel="icon" href="/icon.svg" type="image/svg+xml">
<link rel="apple-touch-icon" href="/apple-touch-icon.png">"#,
            ),
        }),
        CheckId::AnyFavicon => Some(FixGuide {
            title: "How to fix missing favicon",
            steps: &[
                "Check that favicon files exist in your public/static folder",
                "Verify file permissions allow web server access",
                "Ensure your build process copies static assets",
                "Test the favicon URL directly in your browser",
            ],
            code: None,
        }),
        CheckId::FileSize => Some(FixGuide {
            title: "How to optimize favicon size",
            steps: &[
                "Use PNG for icons under 48x48, SVG for scalable icons",
                "Compress PNG files with tools like TinyPNG or ImageOptim",
                "Remove unnecessary metadata from image files",
                "Consider using ICO format only for legacy browser support",
            ],
            code: None,
        }),
        CheckId::ModernFormat => Some(FixGuide {
            title: "How to add modern favicon formats",
            steps: &[
                "Create an SVG version of your favicon for perfect scaling",
                "Add PNG versions at 192x192 and 512x512 for PWA support",
                "Keep ICO as fallback for older browsers",
            ],
            code: Some(
                r#"<link rel="icon" href="/favicon.ico" sizes="32x32">
<link rel="icon" href="/icon.svg" type="image/svg+xml">
<link rel="icon" href="/icon-192.png" type="image/png" sizes="192x192">"#,
            ),
        }),
        CheckId::AppleTouch => Some(FixGuide {
            title: "How to add an Apple Touch Icon",
            steps: &[
                "Create a 180x180 pixel PNG image",
                "Name it \"apple-touch-icon.png\"",
                "Place it in your root directory or specify the path",
                "No transparency: iOS will add rounded corners automatically",
            ],
            code: Some(r#"<link rel="apple-touch-icon" href="/apple-touch-icon.png">"#),
        }),
        CheckId::MsTiles => Some(FixGuide {
            title: "How to add Microsoft Tile icons",
            steps: &[
                "Create tile images at 150x150 (medium) and 310x310 (large)",
                "Add meta tags to your HTML <head>",
                "Optionally create a browserconfig.xml for more control",
            ],
            code: Some(
                r##"<meta name="msapplication-TileColor" content="#000000">
<meta name="msapplication-TileImage" content="/mstile-150x150.png">"##,
            ),
        }),
        CheckId::WebManifest => Some(FixGuide {
            title: "How to add a Web App Manifest",
            steps: &[
                "Create a manifest.json or site.webmanifest file",
                "Include an icons array with 192x192 and 512x512 PNG icons",
                "Add the manifest link to your HTML <head>",
                "Set name, short_name, and theme_color properties",
            ],
            code: Some(r#"<link rel="manifest" href="/site.webmanifest">"#),
        }),
        CheckId::RobotsTxt => Some(FixGuide {
            title: "How to fix robots.txt blocking",
            steps: &[
                "Open your robots.txt file",
                "Remove or modify rules blocking /favicon or icon paths",
                "Add explicit Allow rules for favicon files if needed",
                "Test with Google Search Console's robots.txt tester",
            ],
            code: Some(
                r#"User-agent: *
Allow: /favicon.ico
Allow: /*.png$
Allow: /*.svg$"#,
            ),
        }),
        CheckId::AllAccessible => Some(FixGuide {
            title: "How to fix inaccessible favicons",
            steps: &[
                "Check that all referenced files exist at the specified paths",
                "Verify file permissions (644 for files, 755 for directories)",
                "Ensure paths are correct (absolute vs relative)",
                "Check server logs for 404 or 403 errors",
                "Test each favicon URL directly in your browser",
            ],
            code: None,
        }),
        CheckId::Https => Some(FixGuide {
            title: "How to fix mixed content",
            steps: &[
                "Update all favicon URLs to use https:// or protocol-relative //",
                "Better yet, use root-relative paths starting with /",
                "Ensure your SSL certificate is valid and covers all assets",
            ],
            code: Some(
                r#"<!-- Use root-relative paths -->
<link rel="icon" href="/favicon.ico">"#,
            ),
        }),
        // Advisory checks: SVG presence and theme-color only ever pass,
        // and no-favicons points back at the accessibility fixes.
        CheckId::SvgFavicon | CheckId::ThemeColor | CheckId::NoFavicons => None,
    }
}
