pub mod classify;
pub mod connectivity;

pub use classify::ProbeFailure;
pub use connectivity::ConnectivityProbe;
