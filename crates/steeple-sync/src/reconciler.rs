//! Per-collection convergence: create the collection if absent, then
//! append any declared fields the remote side is missing.

use std::ops::AddAssign;

use steeple_core::CollectionSpec;
use steeple_directus::DirectusClient;
use tracing::info;

use crate::error::SyncError;
use crate::observe;

/// Tallies of what a pass (or a single `ensure_*` step) did versus what
/// it found already in place. A second pass over unchanged remote state
/// reports `created` counts of zero everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub collections_created: usize,
    pub collections_existing: usize,
    pub fields_created: usize,
    pub fields_existing: usize,
    pub relations_created: usize,
    pub relations_existing: usize,
}

impl SyncReport {
    /// True when the pass performed no remote mutation.
    pub fn is_noop(&self) -> bool {
        self.collections_created == 0 && self.fields_created == 0 && self.relations_created == 0
    }
}

impl AddAssign for SyncReport {
    fn add_assign(&mut self, other: Self) {
        self.collections_created += other.collections_created;
        self.collections_existing += other.collections_existing;
        self.fields_created += other.fields_created;
        self.fields_existing += other.fields_existing;
        self.relations_created += other.relations_created;
        self.relations_existing += other.relations_existing;
    }
}

/// Converge one collection: create it when absent, then create each
/// declared field not present remotely, in declaration order.
///
/// Idempotent: calling this twice with no intervening external change
/// performs zero mutations on the second call. Fail-fast per collection:
/// a rejected create-collection call returns before any field work, and
/// a rejected create-field call returns before the remaining fields.
/// Nothing already created is rolled back.
pub async fn ensure_collection(
    client: &DirectusClient,
    spec: &CollectionSpec,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    let existing = observe::collection_names(client).await;
    let present = if existing.contains(&spec.name) {
        info!(collection = %spec.name, "collection already exists");
        report.collections_existing += 1;
        // Only an existing collection can have fields worth reading.
        observe::field_names(client, &spec.name).await
    } else {
        client
            .create_collection(&spec.create_payload())
            .await
            .map_err(|e| SyncError::create_collection(&spec.name, e))?;
        info!(collection = %spec.name, "created collection");
        report.collections_created += 1;
        Default::default()
    };

    for field in &spec.fields {
        if present.contains(&field.name) {
            report.fields_existing += 1;
            continue;
        }
        client
            .create_field(&spec.name, &field.create_payload())
            .await
            .map_err(|e| SyncError::create_field(&spec.name, &field.name, e))?;
        info!(collection = %spec.name, field = %field.name, "created field");
        report.fields_created += 1;
    }

    Ok(report)
}
