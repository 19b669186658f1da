//! Identity provider client API
//!
//! Email/password operations against the provider's public REST surface,
//! authenticated with the web API key.

use serde::Deserialize;
use serde_json::json;
use std::fmt;

use crate::error::{IdentityError, IdentityResult};
use crate::error_code::ProviderErrorCode;

/// Default provider base URL
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";

/// Signed-in provider user
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub id_token: String,
}

impl fmt::Debug for ProviderUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("email_verified", &self.email_verified)
            .field("id_token", &"[REDACTED]")
            .finish()
    }
}

/// Provider operations used by the auth flows
#[trait_variant::make(IdentityClient: Send)]
pub trait LocalIdentityClient {
    /// Create an account and sign it in
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<ProviderUser>;

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<ProviderUser>;

    /// Refresh profile fields such as `email_verified`
    async fn reload(&self, user: &ProviderUser) -> IdentityResult<ProviderUser>;

    async fn send_email_verification(&self, user: &ProviderUser) -> IdentityResult<()>;

    /// Current ID token for the user
    async fn id_token(&self, user: &ProviderUser) -> IdentityResult<String>;
}

// ============================================================================
// REST implementation
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// REST client keyed by the public web API key
#[derive(Clone)]
pub struct FirebaseIdentityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentityClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_IDENTITY_BASE_URL)
    }

    /// Point at another base URL, e.g. the local emulator
    pub fn with_base_url(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, method)
    }

    async fn call<T>(&self, method: &str, body: serde_json::Value) -> IdentityResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(provider_error(&text, status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| IdentityError::Unexpected(e.without_url().to_string()))
    }
}

/// Map a provider error body to an `IdentityError`
pub fn provider_error(body: &str, status: u16) -> IdentityError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => IdentityError::Provider(
            ProviderErrorCode::from_rest_message(&envelope.error.message),
        ),
        _ => IdentityError::Unexpected(format!("status {status}")),
    }
}

impl IdentityClient for FirebaseIdentityClient {
    async fn sign_up(&self, email: &str, password: &str) -> IdentityResult<ProviderUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let token: TokenResponse = self.call("signUp", body).await?;

        tracing::info!(uid = %token.local_id, "Account created");

        Ok(ProviderUser {
            uid: token.local_id,
            email: token.email,
            email_verified: false,
            id_token: token.id_token,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<ProviderUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let token: TokenResponse = self.call("signInWithPassword", body).await?;

        Ok(ProviderUser {
            uid: token.local_id,
            email: token.email,
            email_verified: false,
            id_token: token.id_token,
        })
    }

    async fn reload(&self, user: &ProviderUser) -> IdentityResult<ProviderUser> {
        let lookup: LookupResponse = self
            .call("lookup", json!({ "idToken": user.id_token }))
            .await?;

        let found = lookup
            .users
            .into_iter()
            .find(|u| u.local_id == user.uid)
            .ok_or_else(|| IdentityError::Provider(ProviderErrorCode::UserNotFound))?;

        Ok(ProviderUser {
            uid: found.local_id,
            email: found.email,
            email_verified: found.email_verified,
            id_token: user.id_token.clone(),
        })
    }

    async fn send_email_verification(&self, user: &ProviderUser) -> IdentityResult<()> {
        let body = json!({ "requestType": "VERIFY_EMAIL", "idToken": user.id_token });
        let _: serde_json::Value = self.call("sendOobCode", body).await?;

        tracing::info!(uid = %user.uid, "Verification email requested");
        Ok(())
    }

    async fn id_token(&self, user: &ProviderUser) -> IdentityResult<String> {
        Ok(user.id_token.clone())
    }
}
