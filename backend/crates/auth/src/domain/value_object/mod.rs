//! Value Object Module

pub mod id_token;
pub mod session_cookie;
