//! # EAB Repository
//!
//! Collaborators of the capability cache engine:
//!
//! ```text
//! EabController
//!   ↓  Arc<dyn ContactDirectory>   uri → ContactKey
//!   ↓  Arc<dyn CapabilityStore>    ContactKey → ContactCapability
//! InMemory* / Sqlite*
//!   ↓  Arc<dyn DatabasePoolInterface>
//! SQLite
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   traits.rs                   ← ContactDirectory, CapabilityStore
//!   pool.rs                     ← DatabasePool (SQLite + migrations)
//!   memory/                     ← map-backed adapters
//!   sqlite/                     ← SQLx adapters
//! ```

pub mod memory;
pub mod pool;
pub mod sqlite;
pub mod traits;

pub use memory::{InMemoryCapabilityStore, InMemoryContactDirectory};
pub use pool::*;
pub use sqlite::{SqliteCapabilityStore, SqliteContactDirectory};
pub use traits::*;
