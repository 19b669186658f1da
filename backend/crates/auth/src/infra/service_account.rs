//! Service account credentials and OAuth access tokens
//!
//! Admin calls to the identity provider carry a bearer token obtained with
//! the JWT-bearer grant: an RS256 assertion signed by the service account key
//! is exchanged at the token endpoint. Tokens are cached until shortly before
//! they expire.

use crate::error::{AuthError, AuthResult};
use crate::infra::jwt::sign_rs256;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const ADMIN_SCOPES: &str =
    "https://www.googleapis.com/auth/identitytoolkit https://www.googleapis.com/auth/cloud-platform";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime (the token endpoint's maximum)
const ASSERTION_TTL_SECS: i64 = 3600;

/// Refresh this long before the cached token expires
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Service account key file (the fields we use)
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> AuthResult<Self> {
        serde_json::from_str(json).map_err(|e| AuthError::Credentials(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AuthError::Credentials(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Parse the PEM private key (PKCS#8, or PKCS#1 as a fallback)
    pub fn signing_key(&self) -> AuthResult<SigningKey<Sha256>> {
        let key = RsaPrivateKey::from_pkcs8_pem(&self.private_key)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(&self.private_key))
            .map_err(|e| AuthError::Credentials(format!("unreadable private key: {e}")))?;
        Ok(SigningKey::<Sha256>::new(key))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[REDACTED]")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Claims of the JWT-bearer assertion
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Cached OAuth access tokens for one service account
pub struct AccessTokenSource {
    http: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: SigningKey<Sha256>,
    cached: Mutex<Option<CachedToken>>,
}

impl AccessTokenSource {
    pub fn new(http: reqwest::Client, key: ServiceAccountKey) -> AuthResult<Self> {
        let signing_key = key.signing_key()?;
        Ok(Self {
            http,
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    /// Signed assertion for the token endpoint
    pub fn assertion(&self, now: i64) -> AuthResult<String> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: ADMIN_SCOPES.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        sign_rs256(
            &self.signing_key,
            self.key.private_key_id.as_deref(),
            &claims,
        )
    }

    /// Bearer token for admin calls
    pub async fn access_token(&self) -> AuthResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + REFRESH_MARGIN < token.expires_at {
                return Ok(token.token.clone());
            }
        }

        let assertion = self.assertion(chrono::Utc::now().timestamp())?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await?;
        let ttl = Duration::from_secs(body.expires_in.unwrap_or(ASSERTION_TTL_SECS as u64));
        tracing::debug!(ttl_secs = ttl.as_secs(), "Obtained admin access token");

        *cached = Some(CachedToken {
            token: body.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(body.access_token)
    }
}
