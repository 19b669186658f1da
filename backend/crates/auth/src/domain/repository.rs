//! Session Authority Trait
//!
//! Interface to the identity provider's admin side. Implementation is in the
//! infrastructure layer.

use crate::domain::entity::session_claims::SessionClaims;
use crate::domain::value_object::{id_token::IdToken, session_cookie::SessionCookie};
use crate::error::AuthResult;
use std::time::Duration;

/// Mints and verifies session cookies
#[trait_variant::make(SessionAuthority: Send)]
pub trait LocalSessionAuthority {
    /// Exchange an identity token for a session cookie valid for `valid_for`
    async fn create_session_cookie(
        &self,
        id_token: &IdToken,
        valid_for: Duration,
    ) -> AuthResult<SessionCookie>;

    /// Verify signature and claims; with `check_revoked`, also ask the
    /// provider whether the user was disabled or signed out everywhere
    async fn verify_session_cookie(
        &self,
        cookie: &SessionCookie,
        check_revoked: bool,
    ) -> AuthResult<SessionClaims>;
}
