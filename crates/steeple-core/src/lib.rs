//! Schema model and the compiled-in catalog for the steeple provisioner.
//!
//! The catalog is pure data: an ordered description of the collections,
//! typed fields, and many-to-one relations that a Directus instance must
//! end up with. The convergence logic that applies it lives in
//! `steeple-sync`.

pub mod catalog;
pub mod schema;

pub use catalog::{Catalog, FILES_COLLECTION, PRIMARY_COLLECTION, SUBMISSION_COLLECTION, catalog};
pub use schema::{CollectionSpec, FieldSpec, FieldType, RelationSpec};
