//! The full reconciliation pass.

use steeple_core::Catalog;
use steeple_directus::DirectusClient;
use tracing::info;

use crate::error::SyncError;
use crate::reconciler::{SyncReport, ensure_collection};
use crate::relations::ensure_relation;

/// Run one full convergence pass over the catalog, in dependency order:
///
/// 1. dictionary collections (no outbound relations)
/// 2. the primary entity collection
/// 3. relations from the primary entity outward
/// 4. extension collections
/// 5. relations from each extension back to the primary entity
///
/// Sequential by design: each remote call completes before the next is
/// issued, because the store's behavior under concurrent overlapping
/// schema writes is unverified. Fail-fast overall: the first fatal error
/// aborts the pass; a rerun resumes via the skip-if-exists checks, not
/// via any saved progress marker.
pub async fn run_pass(client: &DirectusClient, catalog: &Catalog) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    info!("step 1: dictionary collections");
    for spec in &catalog.dictionaries {
        report += ensure_collection(client, spec).await?;
    }

    info!(collection = %catalog.primary.name, "step 2: primary entity collection");
    report += ensure_collection(client, &catalog.primary).await?;

    info!("step 3: relations from the primary entity");
    for rel in &catalog.primary_relations {
        tally_relation(&mut report, ensure_relation(client, rel).await?);
    }

    info!("step 4: extension collections");
    for spec in &catalog.extensions {
        report += ensure_collection(client, spec).await?;
    }

    info!("step 5: relations back to the primary entity");
    for rel in &catalog.extension_relations {
        tally_relation(&mut report, ensure_relation(client, rel).await?);
    }

    info!(
        collections = report.collections_created,
        fields = report.fields_created,
        relations = report.relations_created,
        "reconciliation pass complete"
    );
    Ok(report)
}

fn tally_relation(report: &mut SyncReport, created: bool) {
    if created {
        report.relations_created += 1;
    } else {
        report.relations_existing += 1;
    }
}
