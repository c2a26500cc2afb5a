mod client;
mod error;

pub use client::HttpClient;
