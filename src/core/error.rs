// src/core/error.rs

use thiserror::Error;

/// Failures that abort a whole scan. Per-reference probe failures are
/// deliberately NOT here: they degrade into `accessible: false` results
/// so one broken favicon never hides the rest of the report.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The input could not be parsed as a URL even after scheme prefixing.
    #[error("input is not a valid URL")]
    InvalidUrl,

    /// DNS, connection, or timeout failure fetching the main page.
    /// Distinct from `SiteError`: the site never answered.
    #[error("could not reach the site: {reason}")]
    SiteUnreachable { reason: String },

    /// The site answered the main-page fetch with a non-2xx status.
    #[error("the site returned HTTP {status}")]
    SiteError { status: u16 },

    #[error("scan failed internally: {reason}")]
    Internal { reason: String },
}

impl ScanError {
    /// Classifies a main-page fetch error: a status means the site spoke
    /// HTTP at us, anything else is a transport-level failure.
    pub fn from_fetch(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ScanError::SiteError {
                status: status.as_u16(),
            },
            None => ScanError::SiteUnreachable {
                reason: err.to_string(),
            },
        }
    }
}
