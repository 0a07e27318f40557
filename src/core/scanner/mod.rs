// src/core/scanner/mod.rs

pub mod accessibility;
pub mod basic;
pub mod extractor;
pub mod platforms;
pub mod sizes;
pub mod validator;

use std::time::Duration;

use chrono::Utc;
use scraper::Html;
use tracing::{info, instrument, warn};
use url::Url;

use crate::core::error::ScanError;
use crate::core::models::{ScanCategories, ScanResult};
use crate::core::normalize::{to_domain_key, to_fetchable_url};
use crate::core::scoring;

const SCAN_USER_AGENT: &str = "faviscan/0.1 (favicon health check)";
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the page, probes every discovered favicon concurrently and folds
/// the results into a scored [`ScanResult`].
#[instrument(skip_all, fields(url = %raw_url))]
pub async fn run_full_scan(raw_url: &str) -> Result<ScanResult, ScanError> {
    let fetch_url = to_fetchable_url(raw_url);
    let domain = to_domain_key(raw_url);
    Url::parse(&fetch_url).map_err(|_| ScanError::InvalidUrl)?;

    let client = reqwest::Client::builder()
        .user_agent(SCAN_USER_AGENT)
        .timeout(PAGE_TIMEOUT)
        .build()
        .map_err(|e| ScanError::Internal {
            reason: e.to_string(),
        })?;

    info!("fetching page");
    let response = client
        .get(&fetch_url)
        .send()
        .await
        .map_err(ScanError::from_fetch)?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "page returned error status");
        return Err(ScanError::SiteError {
            status: status.as_u16(),
        });
    }

    // Redirects may have moved us to another origin; favicon paths resolve
    // against where the page actually lives.
    let base_url = response.url().origin().ascii_serialization();
    let body = response.text().await.map_err(ScanError::from_fetch)?;

    // Html is not Send, so everything DOM-related happens in this block
    // and only owned data crosses the awaits below.
    let (references, signals) = {
        let document = Html::parse_document(&body);
        let references = extractor::extract_references(&document, &base_url);
        let signals = extractor::page_signals(&document);
        (references, signals)
    };
    info!(count = references.len(), "favicon references extracted");

    let probes = references
        .iter()
        .map(|reference| validator::validate_favicon(&client, reference));
    let (results, robots) = tokio::join!(
        futures::future::join_all(probes),
        validator::check_robots_txt(&client, &base_url),
    );

    let categories = ScanCategories {
        basic: basic::analyze_basic(&references, &results),
        sizes: sizes::analyze_sizes(&results),
        platforms: platforms::analyze_platforms(&references, &results, &signals),
        accessibility: accessibility::analyze_accessibility(&results, &robots),
    };
    let overall_score = scoring::score(categories.iter_checks());
    info!(score = overall_score, "scan complete");

    Ok(ScanResult {
        domain,
        scanned_at: Utc::now(),
        overall_score,
        categories,
        favicons: results,
        from_cache: false,
        cache_expires_at: None,
    })
}
