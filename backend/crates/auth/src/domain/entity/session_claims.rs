//! Session Claims Entity
//!
//! Decoded, verified content of a session cookie.

use crate::error::SessionRejection;
use serde::Serialize;

/// Verified session cookie claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionClaims {
    /// Provider user id (`sub`)
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    /// When the user last signed in (unix seconds)
    pub auth_time: i64,
    pub issued_at: i64,
    pub expires_at: i64,
    pub issuer: String,
    pub audience: String,
    pub sign_in_provider: Option<String>,
}

impl SessionClaims {
    /// Compare against the provider's account record
    ///
    /// `valid_since` is the moment all earlier sessions were revoked
    /// (unix seconds); a session authenticated before it is dead.
    pub fn check_not_revoked(
        &self,
        disabled: bool,
        valid_since: Option<i64>,
    ) -> Result<(), SessionRejection> {
        if disabled {
            return Err(SessionRejection::UserDisabled);
        }
        match valid_since {
            Some(valid_since) if self.auth_time < valid_since => Err(SessionRejection::Revoked),
            _ => Ok(()),
        }
    }
}
