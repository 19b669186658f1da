//! Infrastructure Layer
//!
//! Identity provider admin API, public keys and RS256 handling.

pub mod identity_toolkit;
pub mod jwt;
pub mod public_keys;
pub mod service_account;
