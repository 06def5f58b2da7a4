//! Relation convergence against an API whose relation contract is not
//! uniform across its own versions.
//!
//! Reads report relations under several attribute-naming schemes, so
//! existence is decided by a tolerant matcher. Writes are negotiated:
//! the same semantic triple is encoded under each known wire dialect in
//! turn until one is accepted.

use serde_json::{Value, json};
use steeple_core::RelationSpec;
use steeple_directus::{DirectusClient, DirectusError};
use tracing::{debug, info};

use crate::error::SyncError;
use crate::observe;

/// Accepted attribute-name aliases, per logical attribute of the triple.
/// Top-level and `meta`-nested occurrences are both recognized.
const MANY_COLLECTION_ALIASES: [&str; 2] = ["many_collection", "collection"];
const ONE_COLLECTION_ALIASES: [&str; 2] = ["one_collection", "related_collection"];
const MANY_FIELD_ALIASES: [&str; 2] = ["many_field", "field"];

fn alias_agrees(observed: &Value, aliases: &[&str], expected: &str) -> bool {
    aliases.iter().any(|alias| {
        let direct = observed.get(alias).and_then(|v| v.as_str());
        let nested = observed
            .get("meta")
            .and_then(|m| m.get(alias))
            .and_then(|v| v.as_str());
        direct == Some(expected) || nested == Some(expected)
    })
}

/// Whether an observed relation record denotes the same many-to-one link
/// as `spec`, under any combination of the recognized attribute names.
/// Total and side-effect-free.
pub fn relation_matches(observed: &Value, spec: &RelationSpec) -> bool {
    alias_agrees(observed, &MANY_COLLECTION_ALIASES, &spec.many_collection)
        && alias_agrees(observed, &ONE_COLLECTION_ALIASES, &spec.one_collection)
        && alias_agrees(observed, &MANY_FIELD_ALIASES, &spec.many_field)
}

/// The candidate `POST /relations` bodies for one triple, oldest wire
/// dialect first, the current one last. Tried strictly in this order;
/// when all are rejected the *last* shape's error is the one surfaced.
pub fn candidate_bodies(spec: &RelationSpec) -> [Value; 3] {
    [
        // Flat legacy naming.
        json!({
            "collection_many": spec.many_collection,
            "collection_one": spec.one_collection,
            "field_many": spec.many_field,
            "field_one": null,
        }),
        // Transitional: deployments whose write API accepts the same
        // attribute names their read API emits.
        json!({
            "many_collection": spec.many_collection,
            "one_collection": spec.one_collection,
            "many_field": spec.many_field,
        }),
        // Current dialect.
        json!({
            "collection": spec.many_collection,
            "field": spec.many_field,
            "related_collection": spec.one_collection,
            "schema": {
                "table": spec.many_collection,
                "column": spec.many_field,
                "foreign_key_table": spec.one_collection,
                "foreign_key_column": "id",
            },
        }),
    ]
}

/// Converge one relation: a no-op when any observed relation matches the
/// triple, otherwise first-of-N creation over [`candidate_bodies`].
///
/// Returns whether a relation was created (`false`: it already existed).
pub async fn ensure_relation(
    client: &DirectusClient,
    spec: &RelationSpec,
) -> Result<bool, SyncError> {
    let observed = observe::relations(client).await;
    if observed.iter().any(|r| relation_matches(r, spec)) {
        info!(relation = %spec, "relation already exists");
        return Ok(false);
    }

    let mut last_err: Option<DirectusError> = None;
    for (attempt, body) in candidate_bodies(spec).iter().enumerate() {
        match client.create_relation(body).await {
            Ok(_) => {
                info!(relation = %spec, attempt = attempt + 1, "created relation");
                return Ok(true);
            }
            Err(error) => {
                debug!(relation = %spec, attempt = attempt + 1, %error, "relation payload rejected");
                last_err = Some(error);
            }
        }
    }

    // The candidate list is never empty, so an exhausted loop always
    // recorded an error.
    let source = last_err.expect("candidate body list is non-empty");
    Err(SyncError::RelationExhausted {
        many: spec.many_collection.clone(),
        one: spec.one_collection.clone(),
        field: spec.many_field.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> RelationSpec {
        RelationSpec::new("review", "catholic_church", "church_id")
    }

    #[test]
    fn matches_the_legacy_flat_scheme() {
        let observed = json!({
            "many_collection": "review",
            "one_collection": "catholic_church",
            "many_field": "church_id",
        });
        assert!(relation_matches(&observed, &spec()));
    }

    #[test]
    fn matches_the_current_read_scheme() {
        let observed = json!({
            "collection": "review",
            "related_collection": "catholic_church",
            "field": "church_id",
        });
        assert!(relation_matches(&observed, &spec()));
    }

    #[test]
    fn matches_meta_nested_attributes() {
        let observed = json!({
            "collection": "review",
            "field": "church_id",
            "meta": { "one_collection": "catholic_church" },
        });
        assert!(relation_matches(&observed, &spec()));
    }

    #[test]
    fn mixed_schemes_across_attributes_still_match() {
        let observed = json!({
            "many_collection": "review",
            "related_collection": "catholic_church",
            "meta": { "many_field": "church_id" },
        });
        assert!(relation_matches(&observed, &spec()));
    }

    #[test]
    fn any_disagreeing_attribute_rejects_the_match() {
        let wrong_field = json!({
            "collection": "review",
            "related_collection": "catholic_church",
            "field": "organization_id",
        });
        assert!(!relation_matches(&wrong_field, &spec()));

        let wrong_target = json!({
            "collection": "review",
            "related_collection": "event",
            "field": "church_id",
        });
        assert!(!relation_matches(&wrong_target, &spec()));
    }

    #[test]
    fn unrelated_records_do_not_match() {
        assert!(!relation_matches(&json!({}), &spec()));
        assert!(!relation_matches(&json!("review"), &spec()));
    }

    #[test]
    fn candidate_order_runs_legacy_to_current() {
        let bodies = candidate_bodies(&spec());
        assert!(bodies[0].get("collection_many").is_some());
        assert!(bodies[1].get("many_collection").is_some());
        assert_eq!(bodies[2]["related_collection"], "catholic_church");
        assert_eq!(bodies[2]["schema"]["foreign_key_column"], "id");
    }

    #[test]
    fn recognized_read_schemes_cover_the_write_echoes() {
        // Stores that echo a write body back on reads use the
        // transitional or current dialect; both must be re-recognized as
        // "already existing" on the next pass.
        let [_, transitional, current] = candidate_bodies(&spec());
        assert!(relation_matches(&transitional, &spec()));
        assert!(relation_matches(&current, &spec()));
    }
}
