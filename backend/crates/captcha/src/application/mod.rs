//! Application Layer - Use Cases
//!
//! Orchestrates the assessor and the verdict rules.

pub mod config;
pub mod verify_captcha;
