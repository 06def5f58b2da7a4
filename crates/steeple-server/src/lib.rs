//! The ingestion service: an axum HTTP server that accepts church task
//! payloads and writes submission records into Directus. Schema
//! provisioning is the job of `steeple sync`; this service assumes the
//! destination collection already exists.

pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use server::{build_app, run};
