//! Application Configuration
//!
//! Configuration for the CAPTCHA application layer.

use crate::domain::assessment::ScoreThreshold;

/// Default base URL of the risk assessment API
pub const DEFAULT_ENDPOINT: &str = "https://recaptchaenterprise.googleapis.com";

/// CAPTCHA application configuration
#[derive(Clone)]
pub struct CaptchaConfig {
    /// Cloud project that owns the site key
    pub project_id: String,
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Site key the browser tokens are minted with
    pub site_key: String,
    /// Scores below this are rejected
    pub score_threshold: ScoreThreshold,
    /// API base URL (overridden in tests)
    pub endpoint: String,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: String::new(),
            site_key: String::new(),
            score_threshold: ScoreThreshold::DEFAULT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl CaptchaConfig {
    pub fn new(
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        site_key: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
            site_key: site_key.into(),
            ..Default::default()
        }
    }

    pub fn with_threshold(mut self, threshold: ScoreThreshold) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Assessment URL without the key parameter (safe to log)
    pub fn assessments_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/assessments",
            self.endpoint.trim_end_matches('/'),
            self.project_id
        )
    }
}

// The API key never reaches log output
impl std::fmt::Debug for CaptchaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptchaConfig")
            .field("project_id", &self.project_id)
            .field("api_key", &"[REDACTED]")
            .field("site_key", &self.site_key)
            .field("score_threshold", &self.score_threshold)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
