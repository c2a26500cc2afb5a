pub mod r#trait;

pub use r#trait::{AccountPlugin, BoardPlugin, LivenessPlugin};
