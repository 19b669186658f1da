//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Base64url helpers for compact token segments
//! - Cookie management
//! - Client identification from request headers
//! - Outbound HTTP client construction
//! - Sign-up password policy

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod http;
pub mod password;
