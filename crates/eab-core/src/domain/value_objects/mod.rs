//! Value objects.

mod capability_kind;
mod contact_uri;
mod query_status;

pub use capability_kind::*;
pub use contact_uri::*;
pub use query_status::*;
