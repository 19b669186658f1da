//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod issue_session;

// Re-exports
pub use config::{AuthConfig, RouteGuardConfig};
pub use current_user::CurrentUserUseCase;
pub use issue_session::{IssueSessionOutput, IssueSessionUseCase};
