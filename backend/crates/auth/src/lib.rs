//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session cookie/token value objects, claims, route classes, authority trait
//! - `application/` - Use cases and configuration
//! - `infra/` - Identity provider admin API, public keys, RS256 verification
//! - `presentation/` - HTTP handlers, route guard middleware, DTOs, router
//!
//! ## Features
//! - Exchange of a provider identity token for a 5-day session cookie
//! - Idempotent sign-out that clears the cookie
//! - Per-request current-user lookup (local RS256 verification + revocation check)
//! - Presence-only route guard for pages
//!
//! ## Security Model
//! - Passwords and identity tokens are handled by the identity provider
//! - The session cookie is HttpOnly, Secure (outside development) and SameSite=Lax
//! - The guard only checks that a cookie exists; pages that need the user
//!   verify it through `CurrentUserUseCase`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, RouteGuardConfig};
pub use application::current_user::CurrentUserUseCase;
pub use error::{AuthError, AuthResult};
pub use infra::identity_toolkit::FirebaseSessionAuthority;
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
