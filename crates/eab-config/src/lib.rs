//! # EAB Config
//!
//! Configuration management for the EAB capability cache.
//! Supports layered configuration from files, environment variables,
//! and runtime refresh of the expiration settings.

mod app_config;
mod expiration;
mod loader;
mod validation;

pub use app_config::*;
pub use expiration::*;
pub use loader::*;
pub use validation::*;
