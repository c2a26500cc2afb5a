use thiserror::Error;

/// Failures of the session lifecycle. Surfaced to callers as values (or as
/// `on_error` text), never as panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("profile fetch failed with status {status}")]
    ProfileFetchFailed { status: u16 },

    #[error("network failure while fetching profile: {0}")]
    ProfileFetchNetworkError(String),

    #[error("profile response was empty or malformed")]
    MissingProfile,

    #[error("session was cleared or replaced before the profile arrived")]
    Superseded,

    #[error("no active session")]
    NoActiveSession,
}
