//! CAPTCHA (risk assessment) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Assessment model, verdict rules, assessor trait
//! - `application/` - Use case and configuration
//! - `infra/` - reCAPTCHA Enterprise REST client
//! - `presentation/` - HTTP handler, DTOs, router
//!
//! ## Security Model
//! - The browser obtains a token for a named action; this crate forwards it,
//!   unchanged, to the risk assessment API together with the site key
//! - The verdict is accept/reject only: invalid token, action mismatch and a
//!   score below the threshold are all client errors (400)
//! - Anything unexpected is logged and answered with a generic 500
//! - No retries, no rate limiting, no verdict caching

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::CaptchaConfig;
pub use error::{CaptchaError, CaptchaResult};
pub use infra::recaptcha::RecaptchaEnterpriseClient;
pub use presentation::router::{captcha_router, captcha_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

pub mod models {
    pub use crate::domain::assessment::*;
    pub use crate::presentation::dto::*;
}
