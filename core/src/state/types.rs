//! State type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::probe::ProbeFailure;

/// Backend reachability as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Initial state, before the first liveness check has resolved
    InitialLoading,
    /// The backend timed out and is being woken up by the retry loop
    WakingUp,
    /// The backend answered and accepts requests
    Ready,
    /// The host could not be reached (DNS or connect failure)
    NetworkError,
    /// The backend failed, or never woke up within the retry budget
    ServerError,
}

impl ConnectionState {
    pub fn is_error(self) -> bool {
        matches!(self, Self::NetworkError | Self::ServerError)
    }

    /// No automatic progress happens out of a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::NetworkError | Self::ServerError)
    }

    /// States in which the retry loop keeps issuing calls.
    pub fn is_probing(self) -> bool {
        matches!(self, Self::InitialLoading | Self::WakingUp)
    }

    /// Only a fully ready backend accepts form submissions.
    pub fn permits_submission(self) -> bool {
        self == Self::Ready
    }

    pub fn blocks_interaction(self) -> bool {
        self.is_error()
    }

    pub fn offers_retry(self) -> bool {
        self.is_error()
    }

    /// Non-blocking "please wait" indicator; retry is automatic here.
    pub fn shows_wait_indicator(self) -> bool {
        self == Self::WakingUp
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialLoading => "initial_loading",
            Self::WakingUp => "waking_up",
            Self::Ready => "ready",
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::InitialLoading => "checking backend",
            Self::WakingUp => "waking up backend, please wait",
            Self::Ready => "backend ready",
            Self::NetworkError => "no network connection",
            Self::ServerError => "backend unavailable",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe events, broadcast to observers in the order they happen.
#[derive(Debug, Clone, Serialize)]
pub enum ProbeEvent {
    /// A liveness call is about to be issued (`attempt == 0` is the initial check)
    AttemptStarted {
        attempt: u32,
        timestamp: DateTime<Utc>,
    },
    /// A liveness call failed
    AttemptFailed {
        attempt: u32,
        failure: ProbeFailure,
        timestamp: DateTime<Utc>,
    },
    /// The connection state changed
    StateChanged {
        from: ConnectionState,
        to: ConnectionState,
        timestamp: DateTime<Utc>,
    },
    /// The retry loop exited
    LoopFinished {
        attempts: u32,
        state: ConnectionState,
        timestamp: DateTime<Utc>,
    },
}

impl ProbeEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AttemptStarted { timestamp, .. } => *timestamp,
            Self::AttemptFailed { timestamp, .. } => *timestamp,
            Self::StateChanged { timestamp, .. } => *timestamp,
            Self::LoopFinished { timestamp, .. } => *timestamp,
        }
    }
}
