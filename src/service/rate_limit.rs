// src/service/rate_limit.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

pub const HOURLY_LIMIT: u32 = 20;
pub const DAILY_LIMIT: u32 = 50;

/// Verdict for a single request. When `allowed` is false, `retry_after_secs`
/// says how long until the binding window has room again.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub hourly_remaining: u32,
    pub daily_remaining: u32,
    pub retry_after_secs: Option<i64>,
}

#[derive(Debug, Error)]
pub enum LimiterError {
    #[error("rate limiter backend failed: {0}")]
    Backend(String),
}

/// Sliding-window request accounting per caller identity. Callers are
/// identified by an opaque hashed string, never a raw address.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, identity: &str) -> Result<RateLimitStatus, LimiterError>;
}

pub struct MemoryRateLimiter {
    hourly_limit: u32,
    daily_limit: u32,
    requests: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl Default for MemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::with_limits(HOURLY_LIMIT, DAILY_LIMIT)
    }

    pub fn with_limits(hourly_limit: u32, daily_limit: u32) -> Self {
        Self {
            hourly_limit,
            daily_limit,
            requests: Mutex::new(HashMap::new()),
        }
    }

    async fn check_at(&self, identity: &str, now: DateTime<Utc>) -> RateLimitStatus {
        let mut requests = self.requests.lock().await;
        let history = requests.entry(identity.to_string()).or_default();
        let day_ago = now - Duration::hours(24);
        history.retain(|t| *t > day_ago);

        let hour_ago = now - Duration::hours(1);
        let hourly_used = history.iter().filter(|t| **t > hour_ago).count() as u32;
        let daily_used = history.len() as u32;

        if hourly_used >= self.hourly_limit || daily_used >= self.daily_limit {
            // Oldest request in the binding window decides when it reopens.
            let retry_after = if hourly_used >= self.hourly_limit {
                history
                    .iter()
                    .filter(|t| **t > hour_ago)
                    .min()
                    .map(|t| (*t + Duration::hours(1) - now).num_seconds().max(0))
            } else {
                history
                    .iter()
                    .min()
                    .map(|t| (*t + Duration::hours(24) - now).num_seconds().max(0))
            };
            return RateLimitStatus {
                allowed: false,
                hourly_remaining: self.hourly_limit.saturating_sub(hourly_used),
                daily_remaining: self.daily_limit.saturating_sub(daily_used),
                retry_after_secs: retry_after,
            };
        }

        history.push(now);
        RateLimitStatus {
            allowed: true,
            hourly_remaining: self.hourly_limit - hourly_used - 1,
            daily_remaining: self.daily_limit - daily_used - 1,
            retry_after_secs: None,
        }
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(&self, identity: &str) -> Result<RateLimitStatus, LimiterError> {
        Ok(self.check_at(identity, Utc::now()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_down_remaining() {
        let limiter = MemoryRateLimiter::with_limits(3, 10);
        let now = Utc::now();
        let first = limiter.check_at("a", now).await;
        assert!(first.allowed);
        assert_eq!(first.hourly_remaining, 2);
        assert_eq!(first.daily_remaining, 9);
    }

    #[tokio::test]
    async fn denies_past_hourly_limit_with_retry_hint() {
        let limiter = MemoryRateLimiter::with_limits(2, 10);
        let now = Utc::now();
        assert!(limiter.check_at("a", now).await.allowed);
        assert!(limiter.check_at("a", now).await.allowed);
        let denied = limiter.check_at("a", now).await;
        assert!(!denied.allowed);
        assert_eq!(denied.hourly_remaining, 0);
        let retry = denied.retry_after_secs.unwrap();
        assert!(retry > 0 && retry <= 3600);
    }

    #[tokio::test]
    async fn hourly_window_slides() {
        let limiter = MemoryRateLimiter::with_limits(1, 10);
        let now = Utc::now();
        assert!(limiter.check_at("a", now).await.allowed);
        assert!(!limiter.check_at("a", now).await.allowed);
        let later = now + Duration::minutes(61);
        assert!(limiter.check_at("a", later).await.allowed);
    }

    #[tokio::test]
    async fn daily_limit_binds_even_with_hourly_room() {
        let limiter = MemoryRateLimiter::with_limits(10, 2);
        let now = Utc::now();
        assert!(limiter.check_at("a", now - Duration::hours(5)).await.allowed);
        assert!(limiter.check_at("a", now - Duration::hours(3)).await.allowed);
        let denied = limiter.check_at("a", now).await;
        assert!(!denied.allowed);
        assert_eq!(denied.daily_remaining, 0);
    }

    #[tokio::test]
    async fn identities_are_independent() {
        let limiter = MemoryRateLimiter::with_limits(1, 1);
        let now = Utc::now();
        assert!(limiter.check_at("a", now).await.allowed);
        assert!(limiter.check_at("b", now).await.allowed);
    }
}
