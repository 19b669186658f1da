//! Application Configuration
//!
//! Configuration for the Auth application layer.

use crate::domain::route::{self, GuardDecision, RouteClass};
use std::time::Duration;

/// Re-export cookie types from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Session cookie lifetime: 5 days
pub const SESSION_TTL: Duration = Duration::from_secs(5 * 24 * 3600);

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Identity provider project (session cookie audience)
    pub project_id: String,
    /// Session cookie attributes
    pub cookie: CookieConfig,
    /// Lifetime requested from the provider and sent as Max-Age
    pub session_ttl: Duration,
    /// Ask the provider about revoked/disabled users on every lookup
    pub check_revoked: bool,
    /// Page guard configuration
    pub guard: RouteGuardConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            cookie: CookieConfig {
                max_age_secs: Some(SESSION_TTL.as_secs()),
                ..CookieConfig::default()
            },
            session_ttl: SESSION_TTL,
            check_revoked: true,
            guard: RouteGuardConfig::default(),
        }
    }
}

impl AuthConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, plain-HTTP localhost)
    pub fn development(project_id: impl Into<String>) -> Self {
        let mut config = Self::new(project_id);
        config.cookie.secure = false;
        config
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.cookie.name
    }
}

/// Route guard configuration
///
/// Paths are compared exactly. Exclusions win over both lists.
#[derive(Debug, Clone)]
pub struct RouteGuardConfig {
    /// Pages that need a session cookie
    pub protected: Vec<String>,
    /// Pages only for anonymous visitors
    pub public: Vec<String>,
    /// Never guarded (API, static assets)
    pub skip_prefixes: Vec<String>,
    /// Never guarded (images)
    pub skip_suffixes: Vec<String>,
    pub login_path: String,
    pub home_path: String,
}

impl Default for RouteGuardConfig {
    fn default() -> Self {
        Self {
            protected: vec!["/".to_string(), "/dashboard".to_string()],
            public: vec!["/login".to_string()],
            skip_prefixes: vec![
                "/api".to_string(),
                "/static/".to_string(),
                "/image/".to_string(),
            ],
            skip_suffixes: vec![".png".to_string()],
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
        }
    }
}

impl RouteGuardConfig {
    pub fn classify(&self, path: &str) -> RouteClass {
        let skipped = self.skip_prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.skip_suffixes.iter().any(|s| path.ends_with(s.as_str()));

        if skipped {
            RouteClass::Unguarded
        } else if self.protected.iter().any(|p| p == path) {
            RouteClass::Protected
        } else if self.public.iter().any(|p| p == path) {
            RouteClass::Public
        } else {
            RouteClass::Unguarded
        }
    }

    pub fn decide(&self, path: &str, session_present: bool) -> GuardDecision {
        route::decide(
            self.classify(path),
            session_present,
            &self.login_path,
            &self.home_path,
        )
    }
}
