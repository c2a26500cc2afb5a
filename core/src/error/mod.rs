pub mod api;
pub mod auth;
#[allow(clippy::module_inception)]
pub mod error;
pub mod session;

pub use api::{ApiError, ApiErrorKind};
pub use auth::AuthError;
pub use error::ClientError;
pub use session::SessionError;
