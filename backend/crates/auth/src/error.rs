//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a session cookie was not accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionRejection {
    #[error("session cookie is not a well-formed JWT")]
    Malformed,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("no public key for kid {0}")]
    UnknownKeyId(String),

    #[error("signature does not verify")]
    InvalidSignature,

    #[error("unexpected audience: {0}")]
    InvalidAudience(String),

    #[error("unexpected issuer: {0}")]
    InvalidIssuer(String),

    #[error("subject is empty or longer than 128 characters")]
    InvalidSubject,

    #[error("issued in the future")]
    IssuedInFuture,

    #[error("authenticated in the future")]
    AuthenticatedInFuture,

    #[error("session cookie has expired")]
    Expired,

    #[error("session has been revoked")]
    Revoked,

    #[error("user account is disabled")]
    UserDisabled,

    #[error("user account no longer exists")]
    UserNotFound,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No identity token in the log-in request
    #[error("ID token is required")]
    MissingIdToken,

    /// No usable session (absent cookie or failed verification)
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Session cookie failed verification
    #[error("Session rejected: {0}")]
    SessionRejected(#[from] SessionRejection),

    /// Identity provider could not mint a session cookie
    #[error("Failed to create session cookie")]
    SessionCreation(String),

    /// Identity provider answered with an error
    #[error("Identity provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    /// Service account file or key is unusable
    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    /// Transport failure talking to the identity provider
    #[error("Identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingIdToken => StatusCode::BAD_REQUEST,
            AuthError::NotAuthenticated | AuthError::SessionRejected(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::SessionCreation(_)
            | AuthError::Provider { .. }
            | AuthError::Credentials(_)
            | AuthError::Http(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingIdToken => ErrorKind::BadRequest,
            AuthError::NotAuthenticated | AuthError::SessionRejected(_) => ErrorKind::Unauthorized,
            AuthError::SessionCreation(_)
            | AuthError::Provider { .. }
            | AuthError::Credentials(_)
            | AuthError::Http(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message safe to show to the client
    pub fn public_message(&self) -> String {
        match self {
            AuthError::MissingIdToken
            | AuthError::NotAuthenticated
            | AuthError::SessionCreation(_) => self.to_string(),
            AuthError::SessionRejected(_) => AuthError::NotAuthenticated.to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::SessionCreation(detail) => {
                tracing::error!(detail = %detail, "Error creating session cookie");
            }
            AuthError::Provider { status, message } => {
                tracing::error!(status, message = %message, "Identity provider error");
            }
            AuthError::Credentials(msg) => {
                tracing::error!(message = %msg, "Service account error");
            }
            AuthError::Http(e) => {
                tracing::error!(error = %e, "Identity provider unreachable");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::SessionRejected(reason) => {
                tracing::warn!(reason = %reason, "Session cookie rejected");
            }
            AuthError::MissingIdToken | AuthError::NotAuthenticated => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
