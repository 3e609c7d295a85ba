//! In-process adapters backed by locked hash maps.

mod capability_store;
mod contact_directory;

pub use capability_store::InMemoryCapabilityStore;
pub use contact_directory::InMemoryContactDirectory;
