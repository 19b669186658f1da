//! Issue Session Use Case
//!
//! Exchanges an identity token for a provider-minted session cookie.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionAuthority;
use crate::domain::value_object::id_token::IdToken;
use crate::error::{AuthError, AuthResult};

/// Issue session output
#[derive(Debug)]
pub struct IssueSessionOutput {
    /// Ready-to-send `Set-Cookie` value
    pub set_cookie: String,
}

/// Issue session use case
pub struct IssueSessionUseCase<A>
where
    A: SessionAuthority,
{
    authority: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> IssueSessionUseCase<A>
where
    A: SessionAuthority,
{
    pub fn new(authority: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self { authority, config }
    }

    /// Every call mints a fresh, independent cookie
    pub async fn execute(&self, id_token: Option<String>) -> AuthResult<IssueSessionOutput> {
        let id_token = IdToken::new(id_token.unwrap_or_default())?;

        let cookie = self
            .authority
            .create_session_cookie(&id_token, self.config.session_ttl)
            .await
            .map_err(|e| AuthError::SessionCreation(e.to_string()))?;

        tracing::info!(ttl_secs = self.config.session_ttl.as_secs(), "Session cookie issued");

        let set_cookie = self.config.cookie.build_set_cookie(cookie.as_str());
        Ok(IssueSessionOutput { set_cookie })
    }
}
