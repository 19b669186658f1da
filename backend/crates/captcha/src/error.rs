//! CAPTCHA Error Types
//!
//! This module provides CAPTCHA-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// CAPTCHA-specific result type alias
pub type CaptchaResult<T> = Result<T, CaptchaError>;

/// Message returned for every unexpected failure
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

/// CAPTCHA-specific error variants
///
/// The `Display` text of the client-side variants is exactly the message the
/// browser receives.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// No token in the request
    #[error("reCAPTCHA token is required")]
    MissingToken,

    /// Assessment says the token is not valid
    #[error("Invalid reCAPTCHA token")]
    InvalidToken { reason: Option<String> },

    /// Token was minted for another action
    #[error("reCAPTCHA action mismatch")]
    ActionMismatch {
        expected: String,
        actual: Option<String>,
    },

    /// Risk score below the configured threshold
    #[error("Low reCAPTCHA score, suspicious activity detected")]
    LowScore { score: f64, threshold: f64 },

    /// Assessment API answered with a non-success status or an unexpected body
    #[error("Risk assessment API error: {0}")]
    Upstream(String),

    /// Transport failure talking to the assessment API
    #[error("Risk assessment request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl CaptchaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CaptchaError::MissingToken
            | CaptchaError::InvalidToken { .. }
            | CaptchaError::ActionMismatch { .. }
            | CaptchaError::LowScore { .. } => StatusCode::BAD_REQUEST,
            CaptchaError::Upstream(_) | CaptchaError::Http(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptchaError::MissingToken
            | CaptchaError::InvalidToken { .. }
            | CaptchaError::ActionMismatch { .. }
            | CaptchaError::LowScore { .. } => ErrorKind::BadRequest,
            CaptchaError::Upstream(_) | CaptchaError::Http(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        if self.kind().is_server_error() {
            UNKNOWN_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            CaptchaError::Upstream(msg) => {
                tracing::error!(message = %msg, "Error verifying reCAPTCHA");
            }
            CaptchaError::Http(e) => {
                tracing::error!(error = %e, "Error verifying reCAPTCHA");
            }
            CaptchaError::InvalidToken { reason } => {
                tracing::warn!(reason = ?reason, "reCAPTCHA token rejected");
            }
            CaptchaError::ActionMismatch { expected, actual } => {
                tracing::warn!(expected = %expected, actual = ?actual, "reCAPTCHA action mismatch");
            }
            CaptchaError::LowScore { score, threshold } => {
                tracing::warn!(score, threshold, "Low reCAPTCHA score");
            }
            CaptchaError::MissingToken => {
                tracing::debug!(error = %self, "reCAPTCHA check rejected");
            }
        }
    }
}

impl From<CaptchaError> for AppError {
    fn from(err: CaptchaError) -> Self {
        AppError::new(err.kind(), err.public_message())
    }
}

impl IntoResponse for CaptchaError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
