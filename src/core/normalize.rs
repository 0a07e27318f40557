// src/core/normalize.rs

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use url::Url;

/// Fallback stripper for inputs `Url::parse` rejects.
static SCHEME_AND_WWW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(https?://)?(www\.)?").unwrap());

/// Salt for identity hashing, overridable so deployments do not share
/// hash spaces.
static HASH_SALT: Lazy<String> =
    Lazy::new(|| std::env::var("FAVISCAN_HASH_SALT").unwrap_or_else(|_| "faviscan-dev-salt".into()));

/// Turns arbitrary user input into something fetchable: trims and prepends
/// `https://` when no http(s) scheme is present. No validation happens
/// here; a nonsense input simply fails at fetch time.
pub fn to_fetchable_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Canonical domain key for cache, rate-limit, monitor, and display use:
/// lowercased hostname with a leading `www.` stripped. Pure and total;
/// unparsable input falls back to a best-effort regex strip.
pub fn to_domain_key(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let with_scheme = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        lowered.clone()
    } else {
        format!("https://{lowered}")
    };

    if let Ok(url) = Url::parse(&with_scheme) {
        if let Some(host) = url.host_str() {
            return host.strip_prefix("www.").unwrap_or(host).to_string();
        }
    }

    SCHEME_AND_WWW
        .replace(&lowered, "")
        .split('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Path portion of a URL for compact display, falling back to the full
/// string when it does not parse.
pub fn short_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    }
}

/// Human-readable byte count: "2 KB", "1.37 MB". Trailing zeros after the
/// decimal point are dropped.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let formatted = format!("{value:.2}");
    let formatted = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", formatted, UNITS[exponent])
}

/// Salted SHA-256 of an opaque caller identity (IP, session id). Used as
/// the rate-limit key so raw identities are never stored.
pub fn hash_identity(identity: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    hasher.update(HASH_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

/// Like `hash_identity` but case-folds first, since email addresses are
/// compared case-insensitively.
pub fn hash_email(email: &str) -> String {
    hash_identity(&email.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_key_is_canonical() {
        assert_eq!(to_domain_key("https://WWW.Example.com/path"), "example.com");
        assert_eq!(to_domain_key("example.com"), "example.com");
        assert_eq!(to_domain_key("http://example.com"), "example.com");
    }

    #[test]
    fn domain_key_strips_www_and_path() {
        assert_eq!(to_domain_key("www.example.com/deep/path?q=1"), "example.com");
        assert_eq!(to_domain_key("  Example.COM  "), "example.com");
    }

    #[test]
    fn domain_key_never_panics_on_junk() {
        assert_eq!(to_domain_key("http://"), "");
        assert_eq!(to_domain_key("www.bad host/x"), "bad host");
        assert_eq!(to_domain_key(""), "");
    }

    #[test]
    fn fetchable_url_prepends_scheme() {
        assert_eq!(to_fetchable_url("example.com"), "https://example.com");
        assert_eq!(to_fetchable_url(" http://example.com "), "http://example.com");
        assert_eq!(to_fetchable_url("https://a.b/c"), "https://a.b/c");
    }

    #[test]
    fn short_path_extracts_pathname() {
        assert_eq!(short_path("https://example.com/icons/fav.png"), "/icons/fav.png");
        assert_eq!(short_path("not a url"), "not a url");
    }

    #[test]
    fn bytes_formatting() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(150_000), "146.48 KB");
    }

    #[test]
    fn email_hash_is_case_insensitive() {
        assert_eq!(hash_email("User@Example.com"), hash_email("user@example.com"));
        assert_ne!(hash_email("a@example.com"), hash_email("b@example.com"));
    }
}
