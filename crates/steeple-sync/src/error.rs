use steeple_directus::DirectusError;
use thiserror::Error;

/// Fatal reconciliation errors. Remote *read* failures are never fatal —
/// they are absorbed by [`crate::observe`] — so every variant here marks
/// a creation call that the remote store rejected.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to create collection `{collection}`: {source}")]
    CreateCollection {
        collection: String,
        #[source]
        source: DirectusError,
    },

    #[error("failed to create field `{collection}.{field}`: {source}")]
    CreateField {
        collection: String,
        field: String,
        #[source]
        source: DirectusError,
    },

    /// Every candidate relation payload was rejected. Carries the error
    /// from the last shape attempted: the current wire dialect's
    /// diagnostic is the most actionable one.
    #[error("relation {many}.{field} -> {one}: all candidate payloads rejected: {source}")]
    RelationExhausted {
        many: String,
        one: String,
        field: String,
        #[source]
        source: DirectusError,
    },
}

impl SyncError {
    pub fn create_collection(collection: impl Into<String>, source: DirectusError) -> Self {
        Self::CreateCollection {
            collection: collection.into(),
            source,
        }
    }

    pub fn create_field(
        collection: impl Into<String>,
        field: impl Into<String>,
        source: DirectusError,
    ) -> Self {
        Self::CreateField {
            collection: collection.into(),
            field: field.into(),
            source,
        }
    }
}
