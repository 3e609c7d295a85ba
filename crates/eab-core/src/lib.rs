//! # EAB Core
//!
//! Core types, traits, and error definitions for the EAB capability cache.
//! This crate provides the capability records, their builders, the error
//! taxonomy, and the clock abstraction used by the expiration policy.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod time;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use time::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
