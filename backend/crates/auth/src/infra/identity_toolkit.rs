//! Identity provider admin backend
//!
//! Session cookies are minted by the provider (`createSessionCookie`) and
//! verified locally against its published keys. The revocation check asks
//! the provider for the account record.

use crate::domain::entity::session_claims::SessionClaims;
use crate::domain::repository::SessionAuthority;
use crate::domain::value_object::{id_token::IdToken, session_cookie::SessionCookie};
use crate::error::{AuthError, AuthResult, SessionRejection};
use crate::infra::jwt::verify_session_jwt;
use crate::infra::public_keys::PublicKeyCache;
use crate::infra::service_account::{AccessTokenSource, ServiceAccountKey};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const PUBLIC_KEYS_URL: &str =
    "https://www.googleapis.com/identitytoolkit/v3/relyingparty/publicKeys";

/// Provider base URLs (overridden in tests and emulators)
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub identity_toolkit: String,
    pub public_keys: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: IDENTITY_TOOLKIT_URL.to_string(),
            public_keys: PUBLIC_KEYS_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionCookieRequest<'a> {
    id_token: &'a str,
    /// Seconds, as a decimal string (int64 JSON mapping)
    valid_duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionCookieResponse {
    session_cookie: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    local_id: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountRecord>,
}

/// Account fields relevant to revocation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub local_id: String,
    #[serde(default)]
    pub disabled: bool,
    /// Unix seconds as a decimal string
    #[serde(default)]
    pub valid_since: Option<String>,
}

impl AccountRecord {
    pub fn valid_since(&self) -> Option<i64> {
        self.valid_since.as_deref().and_then(|s| s.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: String,
}

/// Session authority backed by the identity provider's admin API
#[derive(Clone)]
pub struct FirebaseSessionAuthority {
    http: reqwest::Client,
    project_id: String,
    endpoints: ProviderEndpoints,
    tokens: Arc<AccessTokenSource>,
    keys: Arc<PublicKeyCache>,
}

impl FirebaseSessionAuthority {
    pub fn new(
        http: reqwest::Client,
        project_id: impl Into<String>,
        credentials: ServiceAccountKey,
    ) -> AuthResult<Self> {
        Self::with_endpoints(http, project_id, credentials, ProviderEndpoints::default())
    }

    pub fn with_endpoints(
        http: reqwest::Client,
        project_id: impl Into<String>,
        credentials: ServiceAccountKey,
        endpoints: ProviderEndpoints,
    ) -> AuthResult<Self> {
        let tokens = AccessTokenSource::new(http.clone(), credentials)?;
        let keys = PublicKeyCache::new(http.clone(), endpoints.public_keys.clone());

        Ok(Self {
            http,
            project_id: project_id.into(),
            endpoints,
            tokens: Arc::new(tokens),
            keys: Arc::new(keys),
        })
    }

    fn admin_url(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}{}",
            self.endpoints.identity_toolkit.trim_end_matches('/'),
            self.project_id,
            method
        )
    }

    async fn post_admin<B, T>(&self, method: &str, body: &B) -> AuthResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .post(self.admin_url(method))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProviderErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_default();
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn lookup_account(&self, uid: &str) -> AuthResult<Option<AccountRecord>> {
        let response: LookupResponse = self
            .post_admin("/accounts:lookup", &LookupRequest { local_id: [uid] })
            .await?;
        Ok(response.users.into_iter().find(|u| u.local_id == uid))
    }
}

impl SessionAuthority for FirebaseSessionAuthority {
    async fn create_session_cookie(
        &self,
        id_token: &IdToken,
        valid_for: Duration,
    ) -> AuthResult<SessionCookie> {
        let request = CreateSessionCookieRequest {
            id_token: id_token.as_str(),
            valid_duration: valid_for.as_secs().to_string(),
        };

        let response: CreateSessionCookieResponse =
            self.post_admin(":createSessionCookie", &request).await?;

        SessionCookie::parse(response.session_cookie)
            .ok_or_else(|| AuthError::Internal("provider returned an empty session cookie".into()))
    }

    async fn verify_session_cookie(
        &self,
        cookie: &SessionCookie,
        check_revoked: bool,
    ) -> AuthResult<SessionClaims> {
        let keys = self.keys.keys().await?;
        let claims = verify_session_jwt(
            cookie.as_str(),
            &keys,
            &self.project_id,
            chrono::Utc::now().timestamp(),
        )?;

        if check_revoked {
            let account = self
                .lookup_account(&claims.uid)
                .await?
                .ok_or(SessionRejection::UserNotFound)?;
            claims.check_not_revoked(account.disabled, account.valid_since())?;
        }

        Ok(claims)
    }
}
