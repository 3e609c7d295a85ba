//! # Capability Domain
//!
//! Capability records, presence tuples, and the value objects that classify
//! them. Everything here is an immutable value assembled through builders.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
