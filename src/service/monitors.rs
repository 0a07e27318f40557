// src/service/monitors.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::models::ScanResult;
use crate::core::normalize::hash_email;
use crate::service::notify::Mailer;

pub const MAX_MONITORS_PER_EMAIL: usize = 3;
pub const SCORE_CHANGE_THRESHOLD: i16 = 10;
pub const MIN_HOURS_BETWEEN_ALERTS: i64 = 24;
const VERIFICATION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn interval(&self) -> Duration {
        match self {
            Frequency::Daily => Duration::hours(24),
            Frequency::Weekly => Duration::hours(168),
        }
    }
}

/// One email watching one domain. `email` is kept for sending mail;
/// `email_hash` is what lookups and the per-email cap key on.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub domain: String,
    pub email: String,
    pub email_hash: String,
    pub frequency: Frequency,
    pub verified: bool,
    pub active: bool,
    pub verification_token: Option<String>,
    pub verification_expires_at: Option<DateTime<Utc>>,
    pub unsubscribe_token: String,
    pub last_score: Option<u8>,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_alerted: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("monitor store backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait MonitorStore: Send + Sync {
    async fn find(&self, domain: &str, email_hash: &str) -> Result<Option<Monitor>, StoreError>;
    async fn find_by_verification_token(&self, token: &str)
        -> Result<Option<Monitor>, StoreError>;
    async fn find_by_unsubscribe_token(&self, token: &str)
        -> Result<Option<Monitor>, StoreError>;
    async fn count_verified(&self, email_hash: &str) -> Result<usize, StoreError>;
    async fn upsert(&self, monitor: Monitor) -> Result<(), StoreError>;
    async fn active_verified(&self) -> Result<Vec<Monitor>, StoreError>;
}

#[derive(Default)]
pub struct MemoryMonitorStore {
    // keyed by (domain, email_hash)
    monitors: Mutex<HashMap<(String, String), Monitor>>,
}

impl MemoryMonitorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MonitorStore for MemoryMonitorStore {
    async fn find(&self, domain: &str, email_hash: &str) -> Result<Option<Monitor>, StoreError> {
        let monitors = self.monitors.lock().await;
        Ok(monitors
            .get(&(domain.to_string(), email_hash.to_string()))
            .cloned())
    }

    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Monitor>, StoreError> {
        let monitors = self.monitors.lock().await;
        Ok(monitors
            .values()
            .find(|m| m.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_by_unsubscribe_token(
        &self,
        token: &str,
    ) -> Result<Option<Monitor>, StoreError> {
        let monitors = self.monitors.lock().await;
        Ok(monitors
            .values()
            .find(|m| m.unsubscribe_token == token)
            .cloned())
    }

    async fn count_verified(&self, email_hash: &str) -> Result<usize, StoreError> {
        let monitors = self.monitors.lock().await;
        Ok(monitors
            .values()
            .filter(|m| m.email_hash == email_hash && m.verified && m.active)
            .count())
    }

    async fn upsert(&self, monitor: Monitor) -> Result<(), StoreError> {
        let key = (monitor.domain.clone(), monitor.email_hash.clone());
        self.monitors.lock().await.insert(key, monitor);
        Ok(())
    }

    async fn active_verified(&self) -> Result<Vec<Monitor>, StoreError> {
        let monitors = self.monitors.lock().await;
        Ok(monitors
            .values()
            .filter(|m| m.verified && m.active)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("this email already monitors {MAX_MONITORS_PER_EMAIL} domains")]
    LimitReached,

    #[error("no monitor matches that token")]
    NotFound,

    #[error("the verification link has expired, please subscribe again")]
    TokenExpired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubscribeOutcome {
    VerificationSent,
    PreferencesUpdated,
}

/// Subscription lifecycle and the periodic check loop. Scanning itself is
/// injected into `run_due_checks` so the loop stays testable offline.
pub struct MonitorService {
    store: Arc<dyn MonitorStore>,
    mailer: Arc<dyn Mailer>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckRunSummary {
    pub checked: usize,
    pub alerts_sent: usize,
    pub errors: usize,
}

impl MonitorService {
    pub fn new(store: Arc<dyn MonitorStore>, mailer: Arc<dyn Mailer>) -> Self {
        Self { store, mailer }
    }

    pub async fn subscribe(
        &self,
        domain: &str,
        email: &str,
        frequency: Frequency,
    ) -> Result<SubscribeOutcome, MonitorError> {
        let email_hash = hash_email(email);

        if let Some(mut existing) = self.store.find(domain, &email_hash).await? {
            if existing.verified && existing.active {
                existing.frequency = frequency;
                self.store.upsert(existing).await?;
                return Ok(SubscribeOutcome::PreferencesUpdated);
            }
            // Unverified or unsubscribed: rotate the token and try again.
            let token = Uuid::new_v4().to_string();
            existing.frequency = frequency;
            existing.active = true;
            existing.verified = false;
            existing.verification_token = Some(token.clone());
            existing.verification_expires_at =
                Some(Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS));
            self.store.upsert(existing).await?;
            self.send_verification(email, domain, &token);
            return Ok(SubscribeOutcome::VerificationSent);
        }

        if self.store.count_verified(&email_hash).await? >= MAX_MONITORS_PER_EMAIL {
            return Err(MonitorError::LimitReached);
        }

        let token = Uuid::new_v4().to_string();
        let monitor = Monitor {
            domain: domain.to_string(),
            email: email.to_string(),
            email_hash,
            frequency,
            verified: false,
            active: true,
            verification_token: Some(token.clone()),
            verification_expires_at: Some(Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS)),
            unsubscribe_token: Uuid::new_v4().to_string(),
            last_score: None,
            last_checked: None,
            last_alerted: None,
        };
        self.store.upsert(monitor).await?;
        self.send_verification(email, domain, &token);
        Ok(SubscribeOutcome::VerificationSent)
    }

    fn send_verification(&self, email: &str, domain: &str, token: &str) {
        let mailer = Arc::clone(&self.mailer);
        let (email, domain, token) = (email.to_string(), domain.to_string(), token.to_string());
        tokio::spawn(async move {
            if let Err(e) = mailer.send_verification(&email, &domain, &token).await {
                warn!(domain, error = %e, "verification mail failed");
            }
        });
    }

    pub async fn verify(&self, token: &str) -> Result<(), MonitorError> {
        let Some(mut monitor) = self.store.find_by_verification_token(token).await? else {
            return Err(MonitorError::NotFound);
        };
        if monitor.verified {
            return Ok(());
        }
        match monitor.verification_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(MonitorError::TokenExpired),
        }
        monitor.verified = true;
        monitor.verification_token = None;
        monitor.verification_expires_at = None;
        info!(domain = %monitor.domain, "monitor verified");
        self.store.upsert(monitor).await?;
        Ok(())
    }

    pub async fn unsubscribe(&self, token: &str) -> Result<(), MonitorError> {
        let Some(mut monitor) = self.store.find_by_unsubscribe_token(token).await? else {
            return Err(MonitorError::NotFound);
        };
        monitor.active = false;
        info!(domain = %monitor.domain, "monitor unsubscribed");
        self.store.upsert(monitor).await?;
        Ok(())
    }

    /// Rescans every due monitor and alerts on score swings of
    /// [`SCORE_CHANGE_THRESHOLD`] points or more, at most once per
    /// [`MIN_HOURS_BETWEEN_ALERTS`]. One bad monitor never stops the run.
    pub async fn run_due_checks<F, Fut>(&self, scan: F) -> Result<CheckRunSummary, MonitorError>
    where
        F: Fn(String) -> Fut,
        Fut: std::future::Future<Output = Result<ScanResult, crate::core::error::ScanError>>,
    {
        let now = Utc::now();
        let mut summary = CheckRunSummary::default();

        for mut monitor in self.store.active_verified().await? {
            let due = match monitor.last_checked {
                Some(last) => now - last >= monitor.frequency.interval(),
                None => true,
            };
            if !due {
                continue;
            }

            summary.checked += 1;
            let result = match scan(monitor.domain.clone()).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(domain = %monitor.domain, error = %e, "monitor check failed");
                    summary.errors += 1;
                    continue;
                }
            };

            let new_score = result.overall_score;
            let swing = monitor
                .last_score
                .map(|old| (new_score as i16 - old as i16).abs());
            let damper_open = match monitor.last_alerted {
                Some(last) => now - last >= Duration::hours(MIN_HOURS_BETWEEN_ALERTS),
                None => true,
            };

            if let (Some(swing), Some(old_score)) = (swing, monitor.last_score) {
                if swing >= SCORE_CHANGE_THRESHOLD && damper_open {
                    match self
                        .mailer
                        .send_alert(
                            &monitor.email,
                            &monitor.domain,
                            old_score,
                            new_score,
                            &monitor.unsubscribe_token,
                        )
                        .await
                    {
                        Ok(()) => {
                            monitor.last_alerted = Some(now);
                            summary.alerts_sent += 1;
                        }
                        Err(e) => {
                            warn!(domain = %monitor.domain, error = %e, "alert mail failed");
                            summary.errors += 1;
                        }
                    }
                }
            }

            monitor.last_score = Some(new_score);
            monitor.last_checked = Some(now);
            if let Err(e) = self.store.upsert(monitor).await {
                warn!(error = %e, "monitor update failed");
                summary.errors += 1;
            }
        }

        info!(
            checked = summary.checked,
            alerts = summary.alerts_sent,
            errors = summary.errors,
            "monitor run complete"
        );
        Ok(summary)
    }
}
