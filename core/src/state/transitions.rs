//! Connection state transition rules

use super::types::ConnectionState;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: ConnectionState,
        to: ConnectionState,
    },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: ConnectionState },
}

pub struct StateTransition;

impl StateTransition {
    /// Validate a transition of the connectivity state machine.
    pub fn validate(from: ConnectionState, to: ConnectionState) -> Result<(), TransitionError> {
        use ConnectionState::*;

        // Ready holds for the lifetime of the probe
        if from == Ready {
            return Err(TransitionError::FromTerminalState { state: from });
        }

        let is_valid = match (from, to) {
            // First check resolves to any of the four outcomes
            (InitialLoading, WakingUp | Ready | NetworkError | ServerError) => true,

            // Retry loop outcomes
            (WakingUp, Ready | NetworkError | ServerError) => true,

            // Manual retry, including one that lands while a loop is running
            (WakingUp, WakingUp) => true,
            (NetworkError | ServerError, WakingUp) => true,

            _ => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    pub fn is_terminal(state: ConnectionState) -> bool {
        state.is_terminal()
    }
}
