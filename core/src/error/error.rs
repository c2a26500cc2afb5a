use thiserror::Error;

use super::api::ApiError;
use super::auth::AuthError;
use super::session::SessionError;

/// Top-level error for binaries embedding the client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("config error: {0}")]
    Config(String),
    #[error("auth failed: {0}")]
    Auth(#[from] AuthError),
    #[error("session failed: {0}")]
    Session(#[from] SessionError),
    #[error("api call failed: {0}")]
    Api(#[from] ApiError),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
