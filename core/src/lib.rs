//! Core of the Kanban board client: backend wake-up probing, the in-memory
//! session, and the login/profile flows built on top of them.
//!
//! Transport is abstracted behind the plugin traits in [`transport`]; the
//! `kanban-plugins` crate provides the HTTP implementation.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod probe;
pub mod session;
pub mod state;
pub mod transport;
