//! In-memory session: the current bearer token and the profile it belongs to.

pub mod store;
pub mod token;

pub use store::{SessionRecord, SessionStore};
pub use token::{normalize_bearer, BEARER_PREFIX};
