//! Client Error Types
//!
//! `IdentityError` covers calls to the identity provider and the auth server.
//! `FlowError` is what a sign-up, log-in or sign-out attempt ends with; its
//! `user_message` is the text the user sees.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use thiserror::Error;

use crate::error_code::ProviderErrorCode;

pub type IdentityResult<T> = Result<T, IdentityError>;
pub type FlowResult<T> = Result<T, FlowError>;

/// Generic message for failures outside the known tables
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Shown when the CAPTCHA check fails during log-in without a server message
pub const CAPTCHA_LOGIN_FAILED: &str = "reCAPTCHA verification failed";

/// Shown when the CAPTCHA check fails during sign-up without a server message
pub const SIGN_UP_FAILED: &str = "Failed to sign up";

/// Shown when the session cookie exchange fails without a server message
pub const LOG_IN_FAILED: &str = "Failed to log in";

/// Shown when sign-out cannot reach the server
pub const SIGN_OUT_FAILED: &str = "Error logging out. Please try again.";

/// Shown when log-in is refused because the address is unconfirmed
pub const EMAIL_NOT_VERIFIED: &str = "Please verify your email before logging in.";

// ============================================================================
// Identity / transport errors
// ============================================================================

/// Failure talking to a remote service
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Provider refused the request with a known error code
    #[error("Identity provider error: {0}")]
    Provider(ProviderErrorCode),

    /// Request never completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response did not have the expected shape
    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        // Provider URLs carry the API key as a query parameter
        IdentityError::Transport(err.without_url().to_string())
    }
}

// ============================================================================
// Flow errors
// ============================================================================

/// Outcome of a failed client flow
#[derive(Debug, Error)]
pub enum FlowError {
    /// Local password checks failed; nothing was sent
    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// CAPTCHA check refused, carrying the message to show
    #[error("{0}")]
    CaptchaRejected(String),

    /// Log-in refused until the email address is confirmed
    #[error("{}", EMAIL_NOT_VERIFIED)]
    EmailNotVerified,

    /// Session cookie exchange refused, carrying the message to show
    #[error("{0}")]
    SessionRejected(String),

    /// Provider refused the operation
    #[error("{}", .0.friendly_message())]
    Provider(ProviderErrorCode),

    /// Sign-out request could not be sent
    #[error("{}", SIGN_OUT_FAILED)]
    SignOut { detail: String },

    /// Anything else; the detail is logged, never shown
    #[error("{}", UNKNOWN_ERROR)]
    Unknown { detail: String },
}

impl FlowError {
    /// Text shown to the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::PasswordPolicy(_) | FlowError::CaptchaRejected(_) => ErrorKind::BadRequest,
            FlowError::EmailNotVerified => ErrorKind::Forbidden,
            FlowError::SessionRejected(_) => ErrorKind::Unauthorized,
            FlowError::Provider(code) => match code {
                ProviderErrorCode::TooManyRequests => ErrorKind::TooManyRequests,
                ProviderErrorCode::InvalidCredential
                | ProviderErrorCode::WrongPassword
                | ProviderErrorCode::UserNotFound
                | ProviderErrorCode::UserDisabled => ErrorKind::Unauthorized,
                ProviderErrorCode::Other(_) => ErrorKind::BadGateway,
                _ => ErrorKind::BadRequest,
            },
            FlowError::SignOut { .. } => ErrorKind::ServiceUnavailable,
            FlowError::Unknown { .. } => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            FlowError::Provider(code) => {
                tracing::warn!(code = %code, "Identity provider refused the request");
            }
            FlowError::SignOut { detail } => {
                tracing::error!(detail = %detail, "Sign-out request failed");
            }
            FlowError::Unknown { detail } => {
                tracing::error!(detail = %detail, "Auth flow failed");
            }
            _ => {
                tracing::debug!(error = %self, "Auth flow rejected");
            }
        }
    }
}

impl From<IdentityError> for FlowError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Provider(code) => FlowError::Provider(code),
            other => FlowError::Unknown {
                detail: other.to_string(),
            },
        }
    }
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        AppError::new(err.kind(), err.user_message())
    }
}
