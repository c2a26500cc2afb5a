//! Stable surface for front ends and the plugin crate.

pub use crate::auth::{AuthService, ProfileService, RegisterForm};
pub use crate::config::{AppConfig, ProbeConfig};
pub use crate::context::{AppContext, Services, ServicesFactory};
pub use crate::error::{ApiError, ApiErrorKind, AuthError, ClientError, SessionError};
pub use crate::models::*;
pub use crate::probe::{ConnectivityProbe, ProbeFailure};
pub use crate::session::{normalize_bearer, SessionRecord, SessionStore};
pub use crate::state::{ConnectionState, ProbeEvent, Subscription};
pub use crate::transport::{AccountPlugin, BoardPlugin, LivenessPlugin};
