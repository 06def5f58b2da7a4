//! Thin HTTP client for the Directus administrative and item APIs.

mod client;
mod error;

pub use client::DirectusClient;
pub use error::DirectusError;
