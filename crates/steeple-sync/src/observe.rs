//! Fail-open reads of the current remote schema state.
//!
//! Each function is a single round trip. A transport or remote error is
//! logged at `warn` and mapped to the empty result: the reconciler
//! treats an empty read identically to "nothing exists yet", and the
//! redundant creation attempts that can follow a spuriously-empty read
//! are themselves guarded remotely. The snapshot is stale the instant it
//! is returned; callers re-read per step and never cache it.

use std::collections::BTreeSet;

use serde_json::Value;
use steeple_directus::DirectusClient;
use tracing::warn;

/// Names of all collections currently on the remote store.
pub async fn collection_names(client: &DirectusClient) -> BTreeSet<String> {
    match client.list_collections().await {
        Ok(list) => list
            .iter()
            .filter_map(|c| c.get("collection").and_then(|v| v.as_str()))
            .map(str::to_string)
            .collect(),
        Err(error) => {
            warn!(%error, "collection listing failed, observing none");
            BTreeSet::new()
        }
    }
}

/// Names of the fields currently on `collection`.
pub async fn field_names(client: &DirectusClient, collection: &str) -> BTreeSet<String> {
    match client.list_fields(collection).await {
        Ok(list) => list
            .iter()
            .filter_map(|f| f.get("field").and_then(|v| v.as_str()))
            .map(str::to_string)
            .collect(),
        Err(error) => {
            warn!(collection, %error, "field listing failed, observing none");
            BTreeSet::new()
        }
    }
}

/// Relation records as the remote store reports them, raw. Attribute
/// naming varies across Directus versions; matching against the catalog
/// is the job of [`crate::relations::relation_matches`].
pub async fn relations(client: &DirectusClient) -> Vec<Value> {
    match client.list_relations().await {
        Ok(list) => list,
        Err(error) => {
            warn!(%error, "relation listing failed, observing none");
            Vec::new()
        }
    }
}
