//! Provider public keys
//!
//! Session cookies are signed with keys published as a JSON map of
//! `kid -> X.509 certificate (PEM)`. The map is cached for the `max-age` the
//! endpoint advertises.

use crate::error::{AuthError, AuthResult};
use platform::http::cache_max_age;
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use x509_cert::Certificate;
use x509_cert::der::{DecodePem, Encode};

/// Cache lifetime when the endpoint sends no usable `Cache-Control`
pub const FALLBACK_TTL: Duration = Duration::from_secs(3600);

/// Extract the RSA public key from a PEM certificate
pub fn public_key_from_certificate(pem: &str) -> AuthResult<RsaPublicKey> {
    let cert = Certificate::from_pem(pem.as_bytes())
        .map_err(|e| AuthError::Internal(format!("invalid certificate: {e}")))?;
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| AuthError::Internal(format!("invalid public key info: {e}")))?;

    RsaPublicKey::from_public_key_der(&spki)
        .map_err(|e| AuthError::Internal(format!("not an RSA public key: {e}")))
}

/// Public keys by key id
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: HashMap<String, RsaPublicKey>,
}

impl KeySet {
    /// Build from the provider's `kid -> certificate` map
    pub fn from_certificates(certificates: &HashMap<String, String>) -> AuthResult<Self> {
        let mut set = Self::default();
        for (kid, pem) in certificates {
            set.insert(kid.clone(), public_key_from_certificate(pem)?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, kid: impl Into<String>, key: RsaPublicKey) {
        self.keys.insert(kid.into(), key);
    }

    pub fn get(&self, kid: &str) -> Option<&RsaPublicKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

struct CachedKeys {
    keys: Arc<KeySet>,
    /// `None` never expires
    expires_at: Option<Instant>,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        self.expires_at.is_none_or(|at| Instant::now() < at)
    }
}

/// Read-mostly cache of the provider's signing keys
pub struct PublicKeyCache {
    http: reqwest::Client,
    url: String,
    state: RwLock<Option<CachedKeys>>,
}

impl PublicKeyCache {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            state: RwLock::new(None),
        }
    }

    /// Cache that always serves `keys` and never fetches
    pub fn preloaded(http: reqwest::Client, keys: KeySet) -> Self {
        Self {
            http,
            url: String::new(),
            state: RwLock::new(Some(CachedKeys {
                keys: Arc::new(keys),
                expires_at: None,
            })),
        }
    }

    /// Current key set, refreshed when stale
    pub async fn keys(&self) -> AuthResult<Arc<KeySet>> {
        if let Some(cached) = self.state.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.keys.clone());
            }
        }

        let mut state = self.state.write().await;
        // Another request may have refreshed while we waited
        if let Some(cached) = state.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.keys.clone());
            }
        }

        let (keys, ttl) = self.fetch().await?;
        let keys = Arc::new(keys);
        tracing::info!(count = keys.len(), ttl_secs = ttl.as_secs(), "Refreshed provider public keys");

        *state = Some(CachedKeys {
            keys: keys.clone(),
            expires_at: Instant::now().checked_add(ttl),
        });
        Ok(keys)
    }

    async fn fetch(&self) -> AuthResult<(KeySet, Duration)> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message: "public key fetch failed".to_string(),
            });
        }

        let ttl = cache_max_age(response.headers()).unwrap_or(FALLBACK_TTL);
        let certificates: HashMap<String, String> = response.json().await?;

        Ok((KeySet::from_certificates(&certificates)?, ttl))
    }
}
