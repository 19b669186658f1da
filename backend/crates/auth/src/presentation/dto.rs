//! API DTOs (Data Transfer Objects)

use crate::domain::entity::session_claims::SessionClaims;
use serde::{Deserialize, Serialize};

// ============================================================================
// Log In
// ============================================================================

/// Log in request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInRequest {
    #[serde(default)]
    pub id_token: Option<String>,
}

// ============================================================================
// Common
// ============================================================================

/// `{"message": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Current User
// ============================================================================

/// Current user response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub auth_time: i64,
    pub expires_at: i64,
}

impl From<SessionClaims> for MeResponse {
    fn from(claims: SessionClaims) -> Self {
        Self {
            uid: claims.uid,
            email: claims.email,
            email_verified: claims.email_verified,
            auth_time: claims.auth_time,
            expires_at: claims.expires_at,
        }
    }
}
