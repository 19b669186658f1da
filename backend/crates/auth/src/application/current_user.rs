//! Current User Use Case
//!
//! Resolves the signed-in user from the session cookie, per request.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::session_claims::SessionClaims;
use crate::domain::repository::SessionAuthority;
use crate::domain::value_object::session_cookie::SessionCookie;

/// Current user use case
pub struct CurrentUserUseCase<A>
where
    A: SessionAuthority,
{
    authority: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> CurrentUserUseCase<A>
where
    A: SessionAuthority,
{
    pub fn new(authority: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self { authority, config }
    }

    /// Verified claims, or `None`
    ///
    /// An absent or empty cookie returns `None` without contacting the
    /// provider. Verification failures are logged and collapse to `None`.
    pub async fn current_user(&self, cookie: Option<&str>) -> Option<SessionClaims> {
        let cookie = SessionCookie::parse(cookie?)?;

        match self
            .authority
            .verify_session_cookie(&cookie, self.config.check_revoked)
            .await
        {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::warn!(error = %e, "Session cookie verification failed");
                None
            }
        }
    }
}
