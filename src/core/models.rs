// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::knowledge_base::CheckId;

/// Verdict of a single favicon check. The variants carry different weights
/// when a category (or the whole scan) is scored, see `core::scoring`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
    Info,
}

/// Image format of a probed favicon, inferred from HTTP metadata and the
/// URL suffix only. Pixel data is never decoded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IconFormat {
    Ico,
    Png,
    Svg,
    Gif,
    Jpeg,
    Webp,
    Unknown,
}

impl IconFormat {
    pub fn label(&self) -> &'static str {
        match self {
            IconFormat::Ico => "ICO",
            IconFormat::Png => "PNG",
            IconFormat::Svg => "SVG",
            IconFormat::Gif => "GIF",
            IconFormat::Jpeg => "JPEG",
            IconFormat::Webp => "WEBP",
            IconFormat::Unknown => "UNKNOWN",
        }
    }
}

/// Where a favicon reference was declared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSource {
    /// A `<link rel="...icon...">` tag.
    Link,
    /// A `<meta>` tag (msapplication-TileImage).
    Meta,
    /// The implicit `/favicon.ico` every browser tries.
    Default,
}

/// A declared or implied location where a browser might find a site icon.
/// Produced by the extractor, immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaviconReference {
    /// Absolute URL after resolution against the page's base origin.
    pub url: String,
    pub rel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Raw `sizes` attribute value, e.g. "32x32" or "any".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    pub source: ReferenceSource,
}

/// Declared pixel dimensions, parsed from a reference's `sizes` attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Outcome of probing one favicon reference over HTTP. 1:1 with a
/// `FaviconReference` by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaviconResult {
    pub url: String,
    pub accessible: bool,
    /// Absent when the probe failed at the network level (timeout, DNS).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// From the content-length header only; the body is never measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<IconFormat>,
    /// From the declared `sizes` attribute only; never decoded from pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl FaviconResult {
    /// An inaccessible result with no HTTP status, used for probes that
    /// failed before receiving a response.
    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accessible: false,
            http_status: None,
            size: None,
            format: None,
            dimensions: None,
        }
    }
}

/// One atomic verdict with a stable identifier. The id doubles as the key
/// into the fix-guide knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaviconCheck {
    pub id: CheckId,
    pub name: String,
    pub description: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl FaviconCheck {
    pub fn new(
        id: CheckId,
        name: impl Into<String>,
        description: impl Into<String>,
        status: CheckStatus,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            status,
            details: None,
            recommendation: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// A named grouping of related checks with its own 0-100 score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub name: String,
    pub score: u8,
    pub checks: Vec<FaviconCheck>,
}

/// The four fixed categories, in their canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanCategories {
    pub basic: CategoryResult,
    pub sizes: CategoryResult,
    pub platforms: CategoryResult,
    pub accessibility: CategoryResult,
}

impl ScanCategories {
    /// All checks flattened in category order basic, sizes, platforms,
    /// accessibility. The overall score is computed over this sequence,
    /// NOT as an average of the four category scores.
    pub fn iter_checks(&self) -> impl Iterator<Item = &FaviconCheck> {
        self.basic
            .checks
            .iter()
            .chain(self.sizes.checks.iter())
            .chain(self.platforms.checks.iter())
            .chain(self.accessibility.checks.iter())
    }
}

/// The terminal artifact of a scan. Immutable once produced; the cache
/// collaborator persists it verbatim keyed by domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub domain: String,
    pub scanned_at: DateTime<Utc>,
    pub overall_score: u8,
    pub categories: ScanCategories,
    pub favicons: Vec<FaviconResult>,
    pub from_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_expires_at: Option<DateTime<Utc>>,
}

/// Outcome of the robots.txt probe. A missing robots.txt is not a problem,
/// so fetch failures leave both flags false.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RobotsCheck {
    pub accessible: bool,
    pub blocks_favicon: bool,
}

/// Platform-related signals lifted from the HTML document by the extractor
/// so the analyzers never have to touch the DOM themselves.
#[derive(Debug, Clone, Default)]
pub struct PageSignals {
    /// A `<meta name="msapplication-config">` tag is present.
    pub ms_tile_config: bool,
    /// href of a `<link rel="manifest">` tag, if any.
    pub manifest_href: Option<String>,
    /// content of a `<meta name="theme-color">` tag, if any.
    pub theme_color: Option<String>,
}
