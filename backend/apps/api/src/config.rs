//! Server settings from the environment

use anyhow::{Context, bail};
use captcha::models::ScoreThreshold;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

pub struct Settings {
    pub firebase_project_id: String,
    pub recaptcha_api_key: String,
    pub recaptcha_site_key: String,
    /// Identity provider web API key used by the login page
    pub firebase_api_key: Option<String>,
    /// Service-account JSON used for the admin API
    pub credentials_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub cookie_secure: bool,
    pub score_threshold: ScoreThreshold,
    pub frontend_origins: Vec<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("{key} must be set in environment"),
            }
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            None => true,
            Some(value) => parse_bool(&value).context("COOKIE_SECURE must be true or false")?,
        };

        let score_threshold = match lookup("RECAPTCHA_SCORE_THRESHOLD") {
            None => ScoreThreshold::DEFAULT,
            Some(value) => value
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(ScoreThreshold::new)
                .context("RECAPTCHA_SCORE_THRESHOLD must be a number between 0 and 1")?,
        };

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            firebase_project_id: required("FIREBASE_PROJECT_ID")?,
            recaptcha_api_key: required("RECAPTCHA_API_KEY")?,
            recaptcha_site_key: required("RECAPTCHA_SITE_KEY")?,
            firebase_api_key: lookup("FIREBASE_API_KEY").filter(|key| !key.trim().is_empty()),
            credentials_path: PathBuf::from(required("GOOGLE_APPLICATION_CREDENTIALS")?),
            bind_addr,
            cookie_secure,
            score_threshold,
            frontend_origins,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("FIREBASE_PROJECT_ID", "demo-project"),
            ("RECAPTCHA_API_KEY", "api-key"),
            ("RECAPTCHA_SITE_KEY", "site-key"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/etc/sa.json"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> anyhow::Result<Settings> {
        Settings::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let settings = load(&base()).unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert!(settings.cookie_secure);
        assert_eq!(settings.score_threshold, ScoreThreshold::DEFAULT);
        assert_eq!(settings.frontend_origins.len(), 2);
        assert_eq!(settings.credentials_path, PathBuf::from("/etc/sa.json"));
        assert_eq!(settings.firebase_api_key, None);
    }

    #[test]
    fn test_missing_required_key() {
        let mut vars = base();
        vars.remove("RECAPTCHA_SITE_KEY");

        let err = load(&vars).err().unwrap();
        assert!(err.to_string().contains("RECAPTCHA_SITE_KEY"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = base();
        vars.insert("COOKIE_SECURE", "false");
        vars.insert("RECAPTCHA_SCORE_THRESHOLD", "0.7");
        vars.insert("FRONTEND_ORIGINS", "https://app.example.com, ");
        vars.insert("BIND_ADDR", "127.0.0.1:8080");
        vars.insert("FIREBASE_API_KEY", "web-key");

        let settings = load(&vars).unwrap();

        assert!(!settings.cookie_secure);
        assert_eq!(settings.score_threshold.value(), 0.7);
        assert_eq!(settings.frontend_origins, vec!["https://app.example.com"]);
        assert_eq!(settings.bind_addr.port(), 8080);
        assert_eq!(settings.firebase_api_key.as_deref(), Some("web-key"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut vars = base();
        vars.insert("RECAPTCHA_SCORE_THRESHOLD", "1.5");

        assert!(load(&vars).is_err());
    }
}
