//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::{CurrentUserUseCase, IssueSessionUseCase};
use crate::domain::repository::SessionAuthority;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LogInRequest, MeResponse, MessageResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<A>
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    pub authority: Arc<A>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Log In
// ============================================================================

/// POST /api/log-in
///
/// The body is read as JSON whatever its `Content-Type`.
pub async fn log_in<A>(
    State(state): State<AuthAppState<A>>,
    body: Bytes,
) -> AuthResult<impl IntoResponse>
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let req = match serde_json::from_slice::<LogInRequest>(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable log-in body");
            LogInRequest::default()
        }
    };

    let use_case = IssueSessionUseCase::new(state.authority.clone(), state.config.clone());
    let output = use_case.execute(req.id_token).await?;

    Ok((
        [(header::SET_COOKIE, output.set_cookie)],
        Json(MessageResponse::new("Logged in")),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/sign-out
///
/// Always succeeds; the clearing header is the same on every call.
pub async fn sign_out<A>(State(state): State<AuthAppState<A>>) -> impl IntoResponse
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let cookie = state.config.cookie.build_delete_cookie();

    tracing::info!("Session cookie cleared");

    (
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out")),
    )
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/me
pub async fn me<A>(
    State(state): State<AuthAppState<A>>,
    headers: HeaderMap,
) -> AuthResult<Json<MeResponse>>
where
    A: SessionAuthority + Clone + Send + Sync + 'static,
{
    let cookie = extract_cookie(&headers, state.config.session_cookie_name());

    let use_case = CurrentUserUseCase::new(state.authority.clone(), state.config.clone());

    use_case
        .current_user(cookie.as_deref())
        .await
        .map(|claims| Json(MeResponse::from(claims)))
        .ok_or(AuthError::NotAuthenticated)
}
