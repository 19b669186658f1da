//! CAPTCHA token acquisition
//!
//! A browser gets tokens from the reCAPTCHA widget. Headless clients are
//! handed one from outside, so the source is a trait.

use std::fmt;

use crate::error::FlowResult;

/// Action a token is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaAction {
    Login,
    SignUp,
}

impl CaptchaAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptchaAction::Login => "LOGIN",
            CaptchaAction::SignUp => "SIGN_UP",
        }
    }
}

impl fmt::Display for CaptchaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a CAPTCHA token for an action
#[trait_variant::make(CaptchaTokenSource: Send)]
pub trait LocalCaptchaTokenSource {
    async fn token(&self, action: CaptchaAction) -> FlowResult<String>;
}

/// Returns the same pre-obtained token for every action
#[derive(Clone)]
pub struct StaticCaptchaToken(String);

impl StaticCaptchaToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Debug for StaticCaptchaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticCaptchaToken([REDACTED])")
    }
}

impl CaptchaTokenSource for StaticCaptchaToken {
    async fn token(&self, _action: CaptchaAction) -> FlowResult<String> {
        Ok(self.0.clone())
    }
}
