use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ApiError, ApiErrorKind};

/// Three-way split of a failed liveness call.
///
/// - `Timeout`: the backend is presumed dormant; retried automatically.
/// - `HostUnreachable`: the environment has no route to the backend; only a
///   user-triggered retry tries again.
/// - `ServerFault`: anything else (non-2xx, malformed body, request errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeFailure {
    Timeout,
    HostUnreachable,
    ServerFault,
}

impl ProbeFailure {
    pub fn classify(err: &ApiError) -> Self {
        match err.kind() {
            ApiErrorKind::Timeout => Self::Timeout,
            ApiErrorKind::Connect => Self::HostUnreachable,
            ApiErrorKind::Request
            | ApiErrorKind::Body
            | ApiErrorKind::Decode
            | ApiErrorKind::Status
            | ApiErrorKind::Unknown => Self::ServerFault,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::HostUnreachable => "host_unreachable",
            Self::ServerFault => "server_fault",
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            ProbeFailure::classify(&ApiError::timeout("t")),
            ProbeFailure::Timeout
        );
        assert_eq!(
            ProbeFailure::classify(&ApiError::connect("dns")),
            ProbeFailure::HostUnreachable
        );
        assert_eq!(
            ProbeFailure::classify(&ApiError::status_error(503, "u", "unavailable")),
            ProbeFailure::ServerFault
        );
        assert_eq!(
            ProbeFailure::classify(&ApiError::new(ApiErrorKind::Decode, "html")),
            ProbeFailure::ServerFault
        );
    }
}
