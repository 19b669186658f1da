//! Infrastructure Layer
//!
//! External service implementations.

pub mod recaptcha;
