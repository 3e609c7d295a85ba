//! Controller implementations.
//!
//! Trait definitions live in the parent module (`eab_controller.rs`).

pub mod eab_controller_impl;

pub use eab_controller_impl::EabControllerImpl;
