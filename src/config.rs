use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Backend
    pub api_base_url: String,
    pub api_token: Option<String>,

    // Request handling
    pub request_timeout: Duration,
    pub load_retry_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_base_url: std::env::var("CONTACT_API_URL")
                .context("CONTACT_API_URL not set")?
                .trim_end_matches('/')
                .to_string(),
            api_token: std::env::var("CONTACT_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),

            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(15),
            ),
            load_retry_attempts: std::env::var("LOAD_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        })
    }
}
