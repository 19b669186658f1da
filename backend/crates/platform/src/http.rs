//! Outbound HTTP client
//!
//! One `reqwest::Client` per upstream provider, built with a bounded timeout.
//! Calls are never retried.

use reqwest::header::{CACHE_CONTROL, HeaderMap};
use std::time::Duration;

/// Default timeout for calls to external providers
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound HTTP client settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("auth-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Build the shared outbound client
pub fn build_client(config: &HttpClientConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}

/// Read `max-age` from a `Cache-Control` response header
///
/// Returns `None` when the header is absent, unparseable, or `no-store`.
pub fn cache_max_age(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;

    let mut max_age = None;
    for directive in value.split(',').map(str::trim) {
        if directive.eq_ignore_ascii_case("no-store") {
            return None;
        }
        if let Some(secs) = directive.strip_prefix("max-age=") {
            max_age = secs.trim_matches('"').parse::<u64>().ok();
        }
    }
    max_age.map(Duration::from_secs)
}
