// src/service/mod.rs

pub mod cache;
pub mod monitors;
pub mod notify;
pub mod rate_limit;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::error::ScanError;
use crate::core::models::ScanResult;
use crate::core::normalize::{hash_identity, to_domain_key};
use crate::core::scanner::run_full_scan;
use crate::service::cache::{MemoryCache, ScanCache};
use crate::service::rate_limit::{MemoryRateLimiter, RateLimiter};

#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub url: String,
    pub bypass_cache: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitSnapshot {
    pub hourly_remaining: u32,
    pub daily_remaining: u32,
}

#[derive(Debug, Clone)]
pub struct ScanResponse {
    pub result: ScanResult,
    pub rate_limits: Option<RateLimitSnapshot>,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("a URL is required")]
    InvalidInput,

    #[error("rate limit exceeded")]
    RateLimited {
        retry_after_secs: Option<i64>,
        hourly_remaining: u32,
        daily_remaining: u32,
    },

    #[error("site unreachable")]
    SiteUnreachable,

    #[error("site returned HTTP {status}")]
    SiteError { status: u16 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Short actionable text suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::InvalidInput => "Please enter a valid domain or URL.".to_string(),
            ServiceError::RateLimited {
                retry_after_secs, ..
            } => match retry_after_secs {
                Some(secs) => format!(
                    "Too many scans. Please try again in about {} minute(s).",
                    (secs / 60 + 1).max(1)
                ),
                None => "Too many scans. Please try again later.".to_string(),
            },
            ServiceError::SiteUnreachable => {
                "We couldn't access your site. Please check if it's online.".to_string()
            }
            ServiceError::SiteError { status } => {
                format!("Your site responded with HTTP {status}. Fix that first, then rescan.")
            }
            ServiceError::Internal(_) => {
                "Something went wrong on our side. Please try again.".to_string()
            }
        }
    }
}

/// Scans are logged as anonymous analytics events, never the caller.
#[derive(Debug, Clone)]
pub struct AnalyticsEntry {
    pub domain: String,
    pub overall_score: u8,
    pub from_cache: bool,
    pub scanned_at: DateTime<Utc>,
}

pub trait AnalyticsSink: Send + Sync {
    fn record(&self, entry: &AnalyticsEntry);
}

pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn record(&self, entry: &AnalyticsEntry) {
        info!(
            domain = %entry.domain,
            score = entry.overall_score,
            cached = entry.from_cache,
            "scan recorded"
        );
    }
}

/// The request boundary: validation, rate limiting, caching and analytics
/// around a single call to the scan orchestrator.
pub struct ScanService {
    cache: Arc<dyn ScanCache>,
    limiter: Arc<dyn RateLimiter>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl ScanService {
    pub fn new(
        cache: Arc<dyn ScanCache>,
        limiter: Arc<dyn RateLimiter>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            cache,
            limiter,
            analytics,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryRateLimiter::new()),
            Arc::new(LogSink),
        )
    }

    pub async fn scan(
        &self,
        request: ScanRequest,
        caller_identity: &str,
    ) -> Result<ScanResponse, ServiceError> {
        if request.url.trim().is_empty() {
            return Err(ServiceError::InvalidInput);
        }

        // Limiter trouble must never block legitimate traffic.
        let rate_limits = match self.limiter.check(&hash_identity(caller_identity)).await {
            Ok(status) if !status.allowed => {
                return Err(ServiceError::RateLimited {
                    retry_after_secs: status.retry_after_secs,
                    hourly_remaining: status.hourly_remaining,
                    daily_remaining: status.daily_remaining,
                });
            }
            Ok(status) => Some(RateLimitSnapshot {
                hourly_remaining: status.hourly_remaining,
                daily_remaining: status.daily_remaining,
            }),
            Err(e) => {
                warn!(error = %e, "rate limiter unavailable, allowing request");
                None
            }
        };

        let domain = to_domain_key(&request.url);
        if !request.bypass_cache {
            match self.cache.get(&domain).await {
                Ok(Some(hit)) => {
                    let mut result = hit.result;
                    result.from_cache = true;
                    result.cache_expires_at = Some(hit.expires_at);
                    return Ok(ScanResponse {
                        result,
                        rate_limits,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "cache lookup failed"),
            }
        }

        let result = run_full_scan(&request.url)
            .await
            .map_err(map_scan_error)?;

        if let Err(e) = self.cache.put(&result).await {
            warn!(error = %e, "cache write failed");
        }
        self.analytics.record(&AnalyticsEntry {
            domain: result.domain.clone(),
            overall_score: result.overall_score,
            from_cache: false,
            scanned_at: result.scanned_at,
        });

        Ok(ScanResponse {
            result,
            rate_limits,
        })
    }
}

pub fn map_scan_error(err: ScanError) -> ServiceError {
    match err {
        ScanError::InvalidUrl => ServiceError::InvalidInput,
        ScanError::SiteUnreachable { .. } => ServiceError::SiteUnreachable,
        ScanError::SiteError { status } => ServiceError::SiteError { status },
        ScanError::Internal { reason } => ServiceError::Internal(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CategoryResult, ScanCategories};
    use crate::service::rate_limit::MemoryRateLimiter;

    fn sample(domain: &str, score: u8) -> ScanResult {
        let empty = |name: &str| CategoryResult {
            name: name.to_string(),
            score,
            checks: Vec::new(),
        };
        ScanResult {
            domain: domain.to_string(),
            scanned_at: Utc::now(),
            overall_score: score,
            categories: ScanCategories {
                basic: empty("Basic Checks"),
                sizes: empty("Size & Format"),
                platforms: empty("Platform Support"),
                accessibility: empty("Accessibility"),
            },
            favicons: Vec::new(),
            from_cache: false,
            cache_expires_at: None,
        }
    }

    #[tokio::test]
    async fn empty_url_is_rejected_before_anything_else() {
        let service = ScanService::in_memory();
        let err = service
            .scan(
                ScanRequest {
                    url: "   ".to_string(),
                    bypass_cache: false,
                },
                "caller",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput));
    }

    #[tokio::test]
    async fn denial_surfaces_rate_limited() {
        let service = ScanService::new(
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryRateLimiter::with_limits(0, 0)),
            Arc::new(LogSink),
        );
        let err = service
            .scan(
                ScanRequest {
                    url: "example.com".to_string(),
                    bypass_cache: false,
                },
                "caller",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn cache_hit_skips_the_network_entirely() {
        let cache = Arc::new(MemoryCache::new());
        cache.put(&sample("example.com", 85)).await.unwrap();
        let service = ScanService::new(
            Arc::clone(&cache) as Arc<dyn ScanCache>,
            Arc::new(MemoryRateLimiter::new()),
            Arc::new(LogSink),
        );
        let response = service
            .scan(
                ScanRequest {
                    url: "https://www.example.com".to_string(),
                    bypass_cache: false,
                },
                "caller",
            )
            .await
            .unwrap();
        assert!(response.result.from_cache);
        assert_eq!(response.result.overall_score, 85);
        assert!(response.result.cache_expires_at.is_some());
    }

    #[test]
    fn scan_errors_map_to_distinct_service_errors() {
        assert!(matches!(
            map_scan_error(ScanError::SiteError { status: 500 }),
            ServiceError::SiteError { status: 500 }
        ));
        assert!(matches!(
            map_scan_error(ScanError::SiteUnreachable {
                reason: "dns".to_string()
            }),
            ServiceError::SiteUnreachable
        ));
        assert!(matches!(
            map_scan_error(ScanError::InvalidUrl),
            ServiceError::InvalidInput
        ));
    }

    #[test]
    fn user_messages_are_actionable() {
        let msg = ServiceError::SiteUnreachable.user_message();
        assert!(msg.contains("couldn't access"));
        let msg = ServiceError::RateLimited {
            retry_after_secs: Some(120),
            hourly_remaining: 0,
            daily_remaining: 10,
        }
        .user_message();
        assert!(msg.contains("3 minute"));
    }
}
