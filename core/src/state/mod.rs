//! # Connection state
//!
//! The connectivity state machine's value type, its transition table, and the
//! observable holder the probe publishes through.

pub mod observable;
pub mod transitions;
pub mod types;

pub use observable::{ObservableState, Subscription};
pub use transitions::{StateTransition, TransitionError};
pub use types::{ConnectionState, ProbeEvent};
