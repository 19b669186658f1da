//! Auth client
//!
//! What the login page does, as a library:
//! - `flow` - Sign-up, log-in and sign-out, step by step
//! - `identity` - Identity provider email/password REST calls
//! - `api` - Calls to the auth server (`/api/...`)
//! - `captcha` - CAPTCHA token source
//! - `error_code` - Provider error codes and their user-facing messages
//!
//! Password rules are checked locally before any request is made.

pub mod api;
pub mod captcha;
pub mod error;
pub mod error_code;
pub mod flow;
pub mod identity;

// Re-exports for convenience
pub use api::{HttpSessionApi, SessionApi};
pub use captcha::{CaptchaAction, CaptchaTokenSource, StaticCaptchaToken};
pub use error::{FlowError, FlowResult, IdentityError, IdentityResult};
pub use error_code::ProviderErrorCode;
pub use flow::{AuthFlow, FlowConfig, LogInForm, Navigation, SignUpForm};
pub use identity::{FirebaseIdentityClient, IdentityClient, ProviderUser};
