//! Identity Token Value Object
//!
//! Short-lived bearer credential returned by the identity provider after a
//! password sign-in. Exchanged exactly once for a session cookie.

use crate::error::{AuthError, AuthResult};
use std::fmt;

/// Provider-issued identity token
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken(String);

impl IdToken {
    /// Empty or whitespace-only input counts as missing
    pub fn new(token: impl Into<String>) -> AuthResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthError::MissingIdToken);
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdToken([REDACTED])")
    }
}
