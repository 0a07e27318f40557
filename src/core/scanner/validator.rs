// src/core/scanner/validator.rs

use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;

use crate::core::models::{Dimensions, FaviconReference, FaviconResult, IconFormat, RobotsCheck};

/// Per-reference probe budget. A slow favicon classifies as inaccessible
/// instead of delaying the rest of the batch.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes one favicon reference with a GET (not HEAD: content-type and
/// content-length must come from a real response). Every failure mode
/// degrades into an inaccessible result; this function never errors.
pub async fn validate_favicon(client: &reqwest::Client, reference: &FaviconReference) -> FaviconResult {
    let response = match client
        .get(&reference.url)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            debug!(url = %reference.url, error = %err, "Favicon probe failed.");
            return FaviconResult::unreachable(&reference.url);
        }
    };

    let status = response.status();
    if !status.is_success() {
        debug!(url = %reference.url, status = %status, "Favicon probe got an error status.");
        return FaviconResult {
            http_status: Some(status.as_u16()),
            ..FaviconResult::unreachable(&reference.url)
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let size = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    FaviconResult {
        url: reference.url.clone(),
        accessible: true,
        http_status: Some(status.as_u16()),
        size,
        format: Some(infer_format(&content_type, &reference.url)),
        dimensions: declared_dimensions(reference.sizes.as_deref()),
    }
}

/// Infers the image format from the content-type header first, then the
/// URL suffix, in a fixed priority order. No pixel data is ever read.
pub fn infer_format(content_type: &str, url: &str) -> IconFormat {
    if content_type.contains("ico") || url.ends_with(".ico") {
        IconFormat::Ico
    } else if content_type.contains("png") || url.ends_with(".png") {
        IconFormat::Png
    } else if content_type.contains("svg") || url.ends_with(".svg") {
        IconFormat::Svg
    } else if content_type.contains("gif") || url.ends_with(".gif") {
        IconFormat::Gif
    } else if content_type.contains("jpeg")
        || content_type.contains("jpg")
        || url.ends_with(".jpg")
        || url.ends_with(".jpeg")
    {
        IconFormat::Jpeg
    } else if content_type.contains("webp") || url.ends_with(".webp") {
        IconFormat::Webp
    } else {
        IconFormat::Unknown
    }
}

/// Parses a declared `sizes` attribute ("32x32"). The literal "any" and
/// anything unparsable yield no dimensions.
pub fn declared_dimensions(sizes: Option<&str>) -> Option<Dimensions> {
    let sizes = sizes?;
    if sizes == "any" {
        return None;
    }
    let (width, height) = sizes.split_once('x')?;
    let width: u32 = width.trim().parse().ok()?;
    let height: u32 = height.trim().parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Dimensions { width, height })
}

/// Fetches `{base_url}/robots.txt` and looks for a literal
/// `disallow: /favicon` rule. Fails open: a missing or unreachable
/// robots.txt is not a problem.
pub async fn check_robots_txt(client: &reqwest::Client, base_url: &str) -> RobotsCheck {
    let url = format!("{base_url}/robots.txt");
    let response = match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) if response.status().is_success() => response,
        _ => {
            debug!(%url, "robots.txt not reachable, treating as non-blocking.");
            return RobotsCheck {
                accessible: false,
                blocks_favicon: false,
            };
        }
    };

    match response.text().await {
        Ok(body) => RobotsCheck {
            accessible: true,
            blocks_favicon: body.to_lowercase().contains("disallow: /favicon"),
        },
        Err(_) => RobotsCheck {
            accessible: false,
            blocks_favicon: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_priority_is_fixed_not_header_first() {
        // Each priority tier ORs content-type with URL suffix, so an ICO
        // suffix wins over a PNG header: ICO is checked first.
        assert_eq!(infer_format("image/png", "https://a/fav.ico"), IconFormat::Ico);
        assert_eq!(infer_format("image/x-icon", "https://a/fav.png"), IconFormat::Ico);
        // Within later tiers the header still decides when the suffix
        // matches nothing earlier.
        assert_eq!(infer_format("image/png", "https://a/fav.svg"), IconFormat::Png);
        assert_eq!(infer_format("image/svg+xml", "https://a/icon"), IconFormat::Svg);
    }

    #[test]
    fn url_suffix_is_the_fallback() {
        assert_eq!(infer_format("", "https://a/fav.ico"), IconFormat::Ico);
        assert_eq!(infer_format("application/octet-stream", "https://a/i.svg"), IconFormat::Svg);
        assert_eq!(infer_format("", "https://a/photo.jpeg"), IconFormat::Jpeg);
        assert_eq!(infer_format("", "https://a/i.webp"), IconFormat::Webp);
        assert_eq!(infer_format("", "https://a/anim.gif"), IconFormat::Gif);
    }

    #[test]
    fn unknown_when_nothing_matches() {
        assert_eq!(infer_format("text/html", "https://a/icon"), IconFormat::Unknown);
    }

    #[test]
    fn dimensions_from_declared_sizes_only() {
        assert_eq!(
            declared_dimensions(Some("32x32")),
            Some(Dimensions { width: 32, height: 32 })
        );
        assert_eq!(
            declared_dimensions(Some("180x120")),
            Some(Dimensions { width: 180, height: 120 })
        );
        assert_eq!(declared_dimensions(Some("any")), None);
        assert_eq!(declared_dimensions(Some("large")), None);
        assert_eq!(declared_dimensions(Some("0x0")), None);
        assert_eq!(declared_dimensions(None), None);
    }
}
