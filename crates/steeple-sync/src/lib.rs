//! Schema reconciliation engine.
//!
//! Brings a Directus instance into conformance with the declared
//! [`steeple_core::Catalog`] without ever destroying or duplicating
//! existing structure. Convergence is strictly additive: collections and
//! fields are created when absent and never altered when present, so a
//! pass can be rerun after any partial failure and will only fill in
//! what is still missing.

pub mod error;
pub mod observe;
pub mod pass;
pub mod reconciler;
pub mod relations;

pub use error::SyncError;
pub use pass::run_pass;
pub use reconciler::{SyncReport, ensure_collection};
pub use relations::{ensure_relation, relation_matches};
