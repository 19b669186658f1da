//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionAuthority;
use crate::infra::identity_toolkit::FirebaseSessionAuthority;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router backed by the identity provider
pub fn auth_router(authority: FirebaseSessionAuthority, config: AuthConfig) -> Router {
    auth_router_generic(authority, config)
}

/// Create a generic Auth router for any session authority
pub fn auth_router_generic<A>(authority: A, config: AuthConfig) -> Router
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        authority: Arc::new(authority),
        config: Arc::new(config),
    };

    Router::new()
        .route("/log-in", post(handlers::log_in::<A>))
        .route("/sign-out", post(handlers::sign_out::<A>))
        .route("/me", get(handlers::me::<A>))
        .with_state(state)
}
