//! Sign-up Password Policy
//!
//! Checks run on the client before anything leaves the machine. Hashing and
//! storage belong to the identity provider; this module only decides whether
//! a new password is worth sending.

use thiserror::Error;

/// Minimum password length, in Unicode code points
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Password policy violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    Mismatch,

    /// Password is too short
    #[error("Password should be at least {min} characters.")]
    TooShort { min: usize, actual: usize },
}

/// Validate a new password against its confirmation
///
/// The confirmation is compared first, then the length.
///
/// ## Examples
/// ```rust
/// use platform::password::{check_new_password, PasswordPolicyError};
///
/// assert!(check_new_password("correct horse", "correct horse").is_ok());
/// assert_eq!(check_new_password("a", "b"), Err(PasswordPolicyError::Mismatch));
/// ```
pub fn check_new_password(password: &str, confirm: &str) -> Result<(), PasswordPolicyError> {
    if password != confirm {
        return Err(PasswordPolicyError::Mismatch);
    }

    let actual = password.chars().count();
    if actual < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual,
        });
    }

    Ok(())
}
