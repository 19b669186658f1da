//! Route Guard Middleware
//!
//! Redirects page requests based on whether a session cookie is present.
//! The cookie is not verified here.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::config::{AuthConfig, RouteGuardConfig};
use crate::domain::route::GuardDecision;

/// Middleware state
#[derive(Clone)]
pub struct RouteGuardState {
    pub guard: Arc<RouteGuardConfig>,
    pub cookie_name: Arc<str>,
}

impl RouteGuardState {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            guard: Arc::new(config.guard.clone()),
            cookie_name: Arc::from(config.session_cookie_name()),
        }
    }
}

/// Presence-only page guard
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn route_guard(
    State(state): State<RouteGuardState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let session_present = platform::cookie::extract_cookie(req.headers(), &state.cookie_name)
        .is_some_and(|value| !value.is_empty());

    match state.guard.decide(&path, session_present) {
        GuardDecision::Pass => next.run(req).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(from = %path, to = %to, session_present, "Route guard redirect");
            Redirect::temporary(&to).into_response()
        }
    }
}
