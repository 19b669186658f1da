//! Domain Layer - Assessment model and rules
//!
//! This layer contains:
//! - The assessment returned by the risk API and the verdict rules
//! - The score threshold value object
//! - The assessor trait (implemented in infra)

pub mod assessment;
pub mod repository;
