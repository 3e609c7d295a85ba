//! Capability entities.

mod capability_result;
mod contact_capability;
mod presence_tuple;

pub use capability_result::*;
pub use contact_capability::*;
pub use presence_tuple::*;
