//! Entity Module

pub mod session_claims;
