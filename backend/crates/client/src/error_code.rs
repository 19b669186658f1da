//! Identity provider error codes
//!
//! The provider reports failures either as `auth/...` codes (client SDKs) or
//! as upper-case REST messages (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`). Both
//! land in one closed enumeration with a fixed user-facing message table.

use std::fmt;

/// Provider error code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorCode {
    InvalidCredential,
    WrongPassword,
    UserNotFound,
    WeakPassword,
    EmailAlreadyInUse,
    InvalidEmail,
    TooManyRequests,
    UserDisabled,
    /// Anything not in the table, kept as its `auth/...` code
    Other(String),
}

/// Message for codes outside the table
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

impl ProviderErrorCode {
    /// Parse an `auth/...` code
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/invalid-credential" => Self::InvalidCredential,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/weak-password" => Self::WeakPassword,
            "auth/email-already-in-use" => Self::EmailAlreadyInUse,
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/too-many-requests" => Self::TooManyRequests,
            "auth/user-disabled" => Self::UserDisabled,
            other => Self::Other(other.to_string()),
        }
    }

    /// Parse a REST error message such as `WEAK_PASSWORD : Password should be ...`
    pub fn from_rest_message(message: &str) -> Self {
        let key = message.split(':').next().unwrap_or_default().trim();
        match key {
            "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredential,
            "INVALID_PASSWORD" => Self::WrongPassword,
            "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "USER_DISABLED" => Self::UserDisabled,
            other => Self::Other(format!(
                "auth/{}",
                other.to_ascii_lowercase().replace('_', "-")
            )),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::InvalidCredential => "auth/invalid-credential",
            Self::WrongPassword => "auth/wrong-password",
            Self::UserNotFound => "auth/user-not-found",
            Self::WeakPassword => "auth/weak-password",
            Self::EmailAlreadyInUse => "auth/email-already-in-use",
            Self::InvalidEmail => "auth/invalid-email",
            Self::TooManyRequests => "auth/too-many-requests",
            Self::UserDisabled => "auth/user-disabled",
            Self::Other(code) => code,
        }
    }

    /// Message shown to the user
    pub fn friendly_message(&self) -> &'static str {
        match self {
            Self::InvalidCredential | Self::WrongPassword => "Incorrect email or password.",
            Self::UserNotFound => "No account found with this email.",
            Self::WeakPassword => "Password should be at least 6 characters.",
            Self::EmailAlreadyInUse => "This email is already registered.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::TooManyRequests => {
                "Too many attempts. Please wait a few minutes before trying again."
            }
            Self::UserDisabled | Self::Other(_) => FALLBACK_MESSAGE,
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
