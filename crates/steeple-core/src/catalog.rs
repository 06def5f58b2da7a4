//! The compiled-in target schema: schema.org/CatholicChurch (Place + Thing)
//! mapped onto Directus collections, plus the submission inbox the
//! ingestion service writes into.
//!
//! Schema.org expected type -> Directus type:
//!   Text / URL (short)          -> string
//!   Text (long, description)    -> text
//!   Boolean                     -> boolean
//!   Integer                     -> integer
//!   Number                      -> float
//!   GeoCoordinates / GeospatialGeometry -> geometry
//!   ImageObject / URL (file)    -> uuid + relation to directus_files
//!   Complex (Action, Place ref) -> json
//!   OpeningHoursSpecification   -> opening_hours (day_of_week, opens, closes)
//!   Event                       -> event (name, start_date, end_date)

use crate::schema::{CollectionSpec, FieldSpec, FieldType, RelationSpec};

/// The primary entity collection.
pub const PRIMARY_COLLECTION: &str = "catholic_church";
/// The Directus system collection backing uuid file fields.
pub const FILES_COLLECTION: &str = "directus_files";
/// Destination collection for ingested church submissions.
pub const SUBMISSION_COLLECTION: &str = "church_submission";

/// The full declared target state, grouped in the order the
/// reconciliation pass must apply it: a relation cannot be created
/// before both endpoint collections and the referencing field exist.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Collections with no outbound relations (pass step 1).
    pub dictionaries: Vec<CollectionSpec>,
    /// The primary entity collection (step 2).
    pub primary: CollectionSpec,
    /// Relations from the primary entity outward (step 3).
    pub primary_relations: Vec<RelationSpec>,
    /// Collections holding a many-to-one back-reference to the primary
    /// entity (step 4).
    pub extensions: Vec<CollectionSpec>,
    /// Relations from each extension back to the primary entity (step 5).
    pub extension_relations: Vec<RelationSpec>,
}

impl Catalog {
    /// All declared collections, in creation order.
    pub fn collections(&self) -> impl Iterator<Item = &CollectionSpec> {
        self.dictionaries
            .iter()
            .chain(std::iter::once(&self.primary))
            .chain(self.extensions.iter())
    }

    /// All declared relations, in creation order.
    pub fn relations(&self) -> impl Iterator<Item = &RelationSpec> {
        self.primary_relations
            .iter()
            .chain(self.extension_relations.iter())
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections().find(|c| c.name == name)
    }
}

fn string(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::String, "input")
}

fn multiline(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Text, "input-multiline")
}

fn boolean(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Boolean, "boolean")
}

fn geometry(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Geometry, "map")
}

fn json_field(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Json, "input-code")
}

fn file(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Uuid, "file-image")
}

fn foreign_key(name: &str) -> FieldSpec {
    FieldSpec::new(name, FieldType::Integer, "select-dropdown-m2o")
}

fn postal_address() -> CollectionSpec {
    CollectionSpec::new(
        "postal_address",
        "location_on",
        "PostalAddress (schema.org)",
        vec![
            string("street_address"),
            string("locality"),
            string("postal_code"),
            string("country"),
        ],
    )
}

fn organization() -> CollectionSpec {
    CollectionSpec::new(
        "organization",
        "business",
        "Organization (schema.org)",
        vec![
            string("name"),
            string("org_type"),
            string("telephone"),
            string("website"),
        ],
    )
}

fn aggregate_rating() -> CollectionSpec {
    CollectionSpec::new(
        "aggregate_rating",
        "star",
        "AggregateRating (schema.org)",
        vec![
            FieldSpec::new("rating_value", FieldType::Float, "input"),
            FieldSpec::new("review_count", FieldType::Integer, "input"),
        ],
    )
}

fn church_submission() -> CollectionSpec {
    CollectionSpec::new(
        SUBMISSION_COLLECTION,
        "inbox",
        "Inbound church submissions from the task pipeline",
        vec![
            string("name"),
            string("slug").unique(),
            FieldSpec::new("seo_description", FieldType::Text, "input-multiline"),
            json_field("people"),
            string("architectural_style"),
            string("full_address"),
            json_field("metadata"),
        ],
    )
}

fn catholic_church() -> CollectionSpec {
    CollectionSpec::new(
        PRIMARY_COLLECTION,
        "church",
        "CatholicChurch = Place + Thing (schema.org)",
        vec![
            // Thing
            string("name"),
            FieldSpec::new("description", FieldType::Text, "input-rich-text-html"),
            multiline("disambiguating_description"),
            string("identifier"),
            string("url"),
            json_field("potential_action"),
            multiline("alternate_name").with_note("One name per line (alternateName)"),
            multiline("additional_type").with_note("One type or URL per line (additionalType)"),
            string("main_entity_of_page"),
            multiline("same_as").with_note("One domain/URL per line (sameAs)"),
            json_field("subject_of"),
            // Place
            string("telephone"),
            string("fax_number"),
            string("slogan"),
            string("keywords"),
            FieldSpec::new("latitude", FieldType::Float, "input"),
            FieldSpec::new("longitude", FieldType::Float, "input"),
            string("opening_hours_summary"),
            string("map_url"),
            string("gs1_digital_link"),
            file("logo"),
            file("image"),
            file("photo"),
            // Many-to-one endpoints
            foreign_key("address_id"),
            foreign_key("organization_id"),
            foreign_key("aggregate_rating_id"),
        ],
    )
}

fn place_feature() -> CollectionSpec {
    CollectionSpec::new(
        "place_feature",
        "tune",
        "Place: amenityFeature / branchCode / capacity / tourBookingPage (schema.org)",
        vec![
            boolean("free_entry"),
            boolean("public_access"),
            boolean("smoking_allowed"),
            FieldSpec::new("maximum_capacity", FieldType::Integer, "input"),
            boolean("drive_through_service"),
            string("tour_booking_page"),
            string("branch_code"),
            string("global_location_number"),
            string("isic_v4"),
            foreign_key("church_id"),
        ],
    )
}

fn spatial_relation() -> CollectionSpec {
    CollectionSpec::new(
        "spatial_relation",
        "map",
        "Place: geo, containedInPlace, containsPlace, geo* (schema.org)",
        vec![
            geometry("geometry"),
            string("contained_in_place")
                .with_note("Name or URL of the enclosing place (containedInPlace)"),
            multiline("contains_place").with_note("One contained place per line (containsPlace)"),
            geometry("geo_contains"),
            geometry("geo_covered_by"),
            geometry("geo_covers"),
            geometry("geo_crosses"),
            geometry("geo_disjoint"),
            geometry("geo_equals"),
            geometry("geo_intersects"),
            geometry("geo_overlaps"),
            geometry("geo_touches"),
            geometry("geo_within"),
            foreign_key("church_id"),
        ],
    )
}

fn certification() -> CollectionSpec {
    CollectionSpec::new(
        "certification",
        "verified",
        "Certification (schema.org)",
        vec![string("name"), string("website"), foreign_key("church_id")],
    )
}

fn additional_property() -> CollectionSpec {
    CollectionSpec::new(
        "additional_property",
        "label",
        "PropertyValue / additionalProperty (schema.org)",
        vec![string("name"), string("value"), foreign_key("church_id")],
    )
}

fn review() -> CollectionSpec {
    CollectionSpec::new(
        "review",
        "rate_review",
        "Review (schema.org)",
        vec![
            string("author"),
            multiline("review_body"),
            FieldSpec::new("rating", FieldType::Integer, "input"),
            foreign_key("church_id"),
        ],
    )
}

fn event() -> CollectionSpec {
    CollectionSpec::new(
        "event",
        "event",
        "Event (schema.org)",
        vec![
            string("name"),
            FieldSpec::new("start_date", FieldType::DateTime, "datetime"),
            FieldSpec::new("end_date", FieldType::DateTime, "datetime"),
            foreign_key("church_id"),
        ],
    )
}

fn opening_hours() -> CollectionSpec {
    CollectionSpec::new(
        "opening_hours",
        "schedule",
        "OpeningHoursSpecification (schema.org)",
        vec![
            string("day_of_week"),
            FieldSpec::new("opens", FieldType::Time, "input"),
            FieldSpec::new("closes", FieldType::Time, "input"),
            boolean("special"),
            foreign_key("church_id"),
        ],
    )
}

/// Build the full declared catalog. Called once at startup; the result is
/// never mutated.
pub fn catalog() -> Catalog {
    let extensions = vec![
        place_feature(),
        spatial_relation(),
        certification(),
        additional_property(),
        review(),
        event(),
        opening_hours(),
    ];
    let extension_relations = extensions
        .iter()
        .map(|c| RelationSpec::new(&c.name, PRIMARY_COLLECTION, "church_id"))
        .collect();

    Catalog {
        dictionaries: vec![
            postal_address(),
            organization(),
            aggregate_rating(),
            church_submission(),
        ],
        primary: catholic_church(),
        primary_relations: vec![
            RelationSpec::new(PRIMARY_COLLECTION, "postal_address", "address_id"),
            RelationSpec::new(PRIMARY_COLLECTION, "organization", "organization_id"),
            RelationSpec::new(PRIMARY_COLLECTION, "aggregate_rating", "aggregate_rating_id"),
            RelationSpec::new(PRIMARY_COLLECTION, FILES_COLLECTION, "logo"),
            RelationSpec::new(PRIMARY_COLLECTION, FILES_COLLECTION, "image"),
            RelationSpec::new(PRIMARY_COLLECTION, FILES_COLLECTION, "photo"),
        ],
        extensions,
        extension_relations,
    }
}
