use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(String);

/// Directus field types used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "dateTime")]
    DateTime,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "geometry")]
    Geometry,
    #[serde(rename = "uuid")]
    Uuid,
    #[serde(rename = "json")]
    Json,
}

impl FieldType {
    /// The type name as the Directus fields API expects it.
    pub fn wire_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::DateTime => "dateTime",
            FieldType::Time => "time",
            FieldType::Geometry => "geometry",
            FieldType::Uuid => "uuid",
            FieldType::Json => "json",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "text" => Ok(FieldType::Text),
            "boolean" => Ok(FieldType::Boolean),
            "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "dateTime" => Ok(FieldType::DateTime),
            "time" => Ok(FieldType::Time),
            "geometry" => Ok(FieldType::Geometry),
            "uuid" => Ok(FieldType::Uuid),
            "json" => Ok(FieldType::Json),
            other => Err(UnknownFieldType(other.to_string())),
        }
    }
}

/// One declared field of a collection.
///
/// Field names are immutable once created remotely; the reconciler only
/// ever adds fields that are absent, it never renames or retypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub nullable: bool,
    pub unique: bool,
    /// Presentation hint for the Directus admin UI (`input`, `map`, ...).
    /// Not semantically load-bearing.
    pub interface: String,
    pub note: Option<String>,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
            unique: false,
            interface: interface.into(),
            note: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The request body for `POST /fields/{collection}`.
    pub fn create_payload(&self) -> Value {
        let mut schema = serde_json::Map::new();
        if self.nullable {
            schema.insert("is_nullable".into(), Value::Bool(true));
        }
        if self.unique {
            schema.insert("is_unique".into(), Value::Bool(true));
        }
        let mut meta = serde_json::Map::new();
        meta.insert("interface".into(), Value::String(self.interface.clone()));
        if let Some(note) = &self.note {
            meta.insert("note".into(), Value::String(note.clone()));
        }
        json!({
            "field": self.name,
            "type": self.field_type.wire_name(),
            "schema": Value::Object(schema),
            "meta": Value::Object(meta),
        })
    }
}

/// One declared collection: a name, cosmetic display metadata, and an
/// ordered field list. Display metadata is never diffed against the
/// remote state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub icon: String,
    pub note: String,
    pub fields: Vec<FieldSpec>,
}

impl CollectionSpec {
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        note: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            note: note.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The request body for `POST /collections`. The structural body is
    /// empty: the store assigns its own primary-key mechanics.
    pub fn create_payload(&self) -> Value {
        json!({
            "collection": self.name,
            "meta": { "icon": self.icon, "note": self.note },
            "schema": {},
        })
    }
}

/// A declared many-to-one link: `many_collection.many_field` references a
/// row of `one_collection`. Relations are only ever created, never
/// deleted or retargeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    pub many_collection: String,
    pub one_collection: String,
    pub many_field: String,
}

impl RelationSpec {
    pub fn new(
        many_collection: impl Into<String>,
        one_collection: impl Into<String>,
        many_field: impl Into<String>,
    ) -> Self {
        Self {
            many_collection: many_collection.into(),
            one_collection: one_collection.into(),
            many_field: many_field.into(),
        }
    }
}

impl fmt::Display for RelationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}",
            self.many_collection, self.many_field, self.one_collection
        )
    }
}
