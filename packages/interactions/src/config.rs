use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use url::Url;

use crate::domains::interactions::{CookieOptions, InteractionsConfig};

/// Upper bound for `SHORT_COOKIE_MAX_AGE_MS` (one year)
pub const MAX_SHORT_COOKIE_MAX_AGE_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub issuer: Url,
    /// Lifetime of the interaction cookies and sessions, in milliseconds
    pub short_cookie_max_age_ms: u64,
    pub cookie_secure: bool,
    /// Registered client redirect URIs that may receive error redirects
    pub client_redirect_uris: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            issuer: env::var("ISSUER")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .parse()
                .context("ISSUER must be a valid URL")?,
            short_cookie_max_age_ms: parse_cookie_max_age(
                &env::var("SHORT_COOKIE_MAX_AGE_MS").unwrap_or_else(|_| "600000".to_string()),
            )?,
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            client_redirect_uris: env::var("CLIENT_REDIRECT_URIS")
                .map(|v| parse_redirect_uris(&v))
                .unwrap_or_default(),
        })
    }

    /// Interaction configuration with the default prompt policy
    pub fn interactions(&self) -> Result<InteractionsConfig> {
        let cookies = CookieOptions {
            max_age_ms: self.short_cookie_max_age_ms,
            secure: self.cookie_secure,
            ..CookieOptions::default()
        };

        Ok(InteractionsConfig::with_default_prompts()?.with_cookies(cookies))
    }
}

fn parse_cookie_max_age(raw: &str) -> Result<u64> {
    let max_age_ms: u64 = raw
        .trim()
        .parse()
        .context("SHORT_COOKIE_MAX_AGE_MS must be a valid number")?;
    if max_age_ms > MAX_SHORT_COOKIE_MAX_AGE_MS {
        bail!(
            "SHORT_COOKIE_MAX_AGE_MS must be at most {} (got {})",
            MAX_SHORT_COOKIE_MAX_AGE_MS,
            max_age_ms
        );
    }
    Ok(max_age_ms)
}

/// Comma-separated list, blanks dropped
fn parse_redirect_uris(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_max_age_bounds() {
        assert_eq!(parse_cookie_max_age("600000").unwrap(), 600000);
        assert_eq!(
            parse_cookie_max_age(&MAX_SHORT_COOKIE_MAX_AGE_MS.to_string()).unwrap(),
            MAX_SHORT_COOKIE_MAX_AGE_MS
        );
        assert!(parse_cookie_max_age(&(MAX_SHORT_COOKIE_MAX_AGE_MS + 1).to_string()).is_err());
        assert!(parse_cookie_max_age(&u64::MAX.to_string()).is_err());
        assert!(parse_cookie_max_age("ten minutes").is_err());
    }

    #[test]
    fn test_redirect_uri_list() {
        assert_eq!(
            parse_redirect_uris(" https://a.example.com/cb, ,https://b.example.com/cb "),
            vec!["https://a.example.com/cb", "https://b.example.com/cb"]
        );
        assert!(parse_redirect_uris("").is_empty());
    }
}
