//! # EAB Service
//!
//! The capability cache engine: ingests capability records, serves lookups,
//! and applies the expiration policy.

pub mod assembler;
pub mod di;
pub mod eab_controller;
pub mod r#impl;
pub mod metrics;
pub mod policy;

pub use assembler::*;
pub use di::*;
pub use eab_controller::*;
pub use r#impl::EabControllerImpl;
pub use metrics::{register_metrics, EabMetrics};
pub use policy::*;
