pub mod factory;
pub mod http;
pub mod service;
pub mod services;
