// src/service/cache.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::models::ScanResult;

/// Results are reused for six hours before a domain is rescanned.
pub const CACHE_TTL_HOURS: i64 = 6;

#[derive(Debug, Clone)]
pub struct CachedScan {
    pub result: ScanResult,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend failed: {0}")]
    Backend(String),
}

/// Storage for recent scan results keyed by domain. The in-memory
/// implementation below is the default; a persistent backend only has
/// to provide these four operations.
#[async_trait]
pub trait ScanCache: Send + Sync {
    async fn get(&self, domain: &str) -> Result<Option<CachedScan>, CacheError>;
    async fn put(&self, result: &ScanResult) -> Result<(), CacheError>;
    async fn invalidate(&self, domain: &str) -> Result<(), CacheError>;
    async fn purge_expired(&self) -> Result<usize, CacheError>;
}

#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedScan>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScanCache for MemoryCache {
    async fn get(&self, domain: &str) -> Result<Option<CachedScan>, CacheError> {
        let entries = self.entries.lock().await;
        match entries.get(domain) {
            Some(entry) if entry.expires_at > Utc::now() => {
                debug!(domain, "cache hit");
                Ok(Some(entry.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn put(&self, result: &ScanResult) -> Result<(), CacheError> {
        let entry = CachedScan {
            result: result.clone(),
            expires_at: Utc::now() + Duration::hours(CACHE_TTL_HOURS),
        };
        self.entries
            .lock()
            .await
            .insert(result.domain.clone(), entry);
        Ok(())
    }

    async fn invalidate(&self, domain: &str) -> Result<(), CacheError> {
        self.entries.lock().await.remove(domain);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        let now = Utc::now();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }
}
