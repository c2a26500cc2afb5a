//! Login/registration and profile flows layered on the probe and the session.

pub mod flow;
pub mod profile;
pub mod validation;

pub use flow::AuthService;
pub use profile::ProfileService;
pub use validation::RegisterForm;
