//! SQLite adapters over the shared [`DatabasePool`](crate::DatabasePool).

mod capability_store;
mod contact_directory;
mod rows;

pub use capability_store::SqliteCapabilityStore;
pub use contact_directory::SqliteContactDirectory;
