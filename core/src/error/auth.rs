use thiserror::Error;

use super::api::ApiError;
use super::session::SessionError;
use crate::state::ConnectionState;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("backend is not ready (state: {0})")]
    NotReady(ConnectionState),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email is already registered")]
    EmailTaken,

    #[error("no active session")]
    NoActiveSession,

    #[error("request failed: {0}")]
    Api(#[from] ApiError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
