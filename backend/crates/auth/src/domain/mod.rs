//! Domain Layer
//!
//! Contains value objects, session claims, route classes and the session
//! authority trait.

pub mod entity;
pub mod repository;
pub mod route;
pub mod value_object;

// Re-exports
pub use entity::session_claims::SessionClaims;
pub use repository::SessionAuthority;
pub use value_object::{id_token::IdToken, session_cookie::SessionCookie};
