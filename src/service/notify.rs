// src/service/notify.rs

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Outbound email seam. The default implementation just logs; wiring a
/// real SMTP or API backend means implementing these two calls.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(
        &self,
        email: &str,
        domain: &str,
        token: &str,
    ) -> Result<(), MailError>;

    async fn send_alert(
        &self,
        email: &str,
        domain: &str,
        old_score: u8,
        new_score: u8,
        unsubscribe_token: &str,
    ) -> Result<(), MailError>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(
        &self,
        email: &str,
        domain: &str,
        token: &str,
    ) -> Result<(), MailError> {
        let subject = format!("Verify your favicon monitoring for {domain}");
        info!(email, %subject, token, "verification mail");
        Ok(())
    }

    async fn send_alert(
        &self,
        email: &str,
        domain: &str,
        old_score: u8,
        new_score: u8,
        unsubscribe_token: &str,
    ) -> Result<(), MailError> {
        let subject = if new_score > old_score {
            format!("Favicon score improved for {domain}")
        } else {
            format!("Favicon issues detected on {domain}")
        };
        info!(
            email,
            %subject,
            old_score,
            new_score,
            unsubscribe_token,
            "alert mail"
        );
        Ok(())
    }
}
