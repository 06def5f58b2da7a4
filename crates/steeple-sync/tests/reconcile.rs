use serde_json::{Value, json};
use steeple_core::{RelationSpec, catalog};
use steeple_directus::DirectusClient;
use steeple_sync::{SyncError, ensure_collection, ensure_relation, run_pass};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> DirectusClient {
    DirectusClient::new(&server.uri(), None).expect("client")
}

fn ok_empty_list() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"data": []}))
}

fn ok_data(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"data": data}))
}

fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({"errors": [{"message": message}]}))
}

#[tokio::test]
async fn empty_store_gets_the_full_catalog_in_order() {
    let cat = catalog();
    let total_collections = cat.collections().count();
    let total_fields: usize = cat.collections().map(|c| c.fields.len()).sum();
    let total_relations = cat.relations().count();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ok_empty_list())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/relations"))
        .respond_with(ok_empty_list())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(ok_data(json!({})))
        .expect(total_collections as u64)
        .mount(&server)
        .await;
    for spec in cat.collections() {
        Mock::given(method("POST"))
            .and(path(format!("/fields/{}", spec.name)))
            .respond_with(ok_data(json!({})))
            .expect(spec.fields.len() as u64)
            .mount(&server)
            .await;
    }
    // The first candidate shape is accepted, so one POST per relation.
    Mock::given(method("POST"))
        .and(path("/relations"))
        .respond_with(ok_data(json!({})))
        .expect(total_relations as u64)
        .mount(&server)
        .await;

    let report = run_pass(&client(&server), &cat).await.expect("pass");
    assert_eq!(report.collections_created, total_collections);
    assert_eq!(report.fields_created, total_fields);
    assert_eq!(report.relations_created, total_relations);
    assert_eq!(report.collections_existing, 0);
    assert_eq!(report.fields_existing, 0);
    assert_eq!(report.relations_existing, 0);
}

#[tokio::test]
async fn second_pass_over_converged_state_performs_zero_mutations() {
    let cat = catalog();

    let server = MockServer::start().await;
    let collections: Vec<Value> = cat
        .collections()
        .map(|c| json!({"collection": c.name}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ok_data(json!(collections)))
        .mount(&server)
        .await;
    for spec in cat.collections() {
        let fields: Vec<Value> = spec.fields.iter().map(|f| json!({"field": f.name})).collect();
        Mock::given(method("GET"))
            .and(path(format!("/fields/{}", spec.name)))
            .respond_with(ok_data(json!(fields)))
            .mount(&server)
            .await;
    }
    let relations: Vec<Value> = cat
        .relations()
        .map(|r| {
            json!({
                "collection": r.many_collection,
                "field": r.many_field,
                "related_collection": r.one_collection,
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/relations"))
        .respond_with(ok_data(json!(relations)))
        .mount(&server)
        .await;
    // No creation call of any kind may go out.
    Mock::given(method("POST"))
        .respond_with(rejected("mutation on second pass"))
        .expect(0)
        .mount(&server)
        .await;

    let report = run_pass(&client(&server), &cat).await.expect("pass");
    assert!(report.is_noop());
    assert_eq!(report.collections_existing, cat.collections().count());
    assert_eq!(
        report.fields_existing,
        cat.collections().map(|c| c.fields.len()).sum::<usize>()
    );
    assert_eq!(report.relations_existing, cat.relations().count());
}

#[tokio::test]
async fn only_the_missing_field_is_created_for_an_existing_collection() {
    let cat = catalog();
    let church = cat.collection("catholic_church").expect("primary").clone();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ok_data(json!([{"collection": "catholic_church"}])))
        .mount(&server)
        .await;
    let present: Vec<Value> = church
        .fields
        .iter()
        .filter(|f| f.name != "slogan")
        .map(|f| json!({"field": f.name}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/fields/catholic_church"))
        .respond_with(ok_data(json!(present)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fields/catholic_church"))
        .and(body_partial_json(json!({"field": "slogan"})))
        .respond_with(ok_data(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(rejected("unexpected mutation"))
        .expect(0)
        .mount(&server)
        .await;

    let report = ensure_collection(&client(&server), &church).await.expect("ensure");
    assert_eq!(report.collections_created, 0);
    assert_eq!(report.collections_existing, 1);
    assert_eq!(report.fields_created, 1);
    assert_eq!(report.fields_existing, church.fields.len() - 1);
}

#[tokio::test]
async fn negotiator_stops_at_the_first_accepted_shape() {
    let spec = RelationSpec::new("review", "catholic_church", "church_id");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/relations"))
        .respond_with(ok_empty_list())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/relations"))
        .and(body_partial_json(json!({"collection_many": "review"})))
        .respond_with(rejected("legacy dialect unsupported"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/relations"))
        .and(body_partial_json(json!({"many_collection": "review"})))
        .respond_with(rejected("transitional dialect unsupported"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/relations"))
        .and(body_partial_json(json!({"collection": "review"})))
        .respond_with(ok_data(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let created = ensure_relation(&client(&server), &spec).await.expect("relation");
    assert!(created);
}

#[tokio::test]
async fn exhausted_negotiation_reports_the_last_shapes_error() {
    let spec = RelationSpec::new("review", "catholic_church", "church_id");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/relations"))
        .respond_with(ok_empty_list())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/relations"))
        .and(body_partial_json(json!({"collection": "review"})))
        .respond_with(rejected("schema.foreign_key_table is invalid"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/relations"))
        .respond_with(rejected("older dialects rejected"))
        .expect(2)
        .mount(&server)
        .await;

    let err = ensure_relation(&client(&server), &spec).await.unwrap_err();
    match err {
        SyncError::RelationExhausted { many, one, field, source } => {
            assert_eq!(many, "review");
            assert_eq!(one, "catholic_church");
            assert_eq!(field, "church_id");
            assert!(source.to_string().contains("schema.foreign_key_table is invalid"));
        }
        other => panic!("expected RelationExhausted, got {other}"),
    }
}

#[tokio::test]
async fn a_relation_observed_under_an_alternate_scheme_is_not_recreated() {
    let spec = RelationSpec::new("event", "catholic_church", "church_id");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/relations"))
        .respond_with(ok_data(json!([
            {
                "collection": "event",
                "field": "church_id",
                "meta": { "one_collection": "catholic_church" },
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/relations"))
        .respond_with(rejected("duplicate relation"))
        .expect(0)
        .mount(&server)
        .await;

    let created = ensure_relation(&client(&server), &spec).await.expect("relation");
    assert!(!created);
}

#[tokio::test]
async fn failed_dictionary_creation_aborts_before_the_primary_entity() {
    let cat = catalog();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ok_empty_list())
        .mount(&server)
        .await;
    // `organization` is the second dictionary: `postal_address` before it
    // must succeed and remain, everything after it must never be tried.
    Mock::given(method("POST"))
        .and(path("/collections"))
        .and(body_partial_json(json!({"collection": "organization"})))
        .respond_with(rejected("insufficient permissions"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/collections"))
        .and(body_partial_json(json!({"collection": "catholic_church"})))
        .respond_with(ok_data(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(ok_data(json!({})))
        .expect(1) // postal_address only
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/fields/postal_address"))
        .respond_with(ok_data(json!({})))
        .mount(&server)
        .await;

    let err = run_pass(&client(&server), &cat).await.unwrap_err();
    match err {
        SyncError::CreateCollection { collection, source } => {
            assert_eq!(collection, "organization");
            assert!(source.to_string().contains("insufficient permissions"));
        }
        other => panic!("expected CreateCollection, got {other}"),
    }
}

#[tokio::test]
async fn read_failures_are_fail_open_and_lead_to_guarded_recreation() {
    let cat = catalog();
    let address = cat.collection("postal_address").expect("dictionary").clone();

    // The store errors on every read but the collection actually exists:
    // the reconciler observes "nothing", re-issues the create, and the
    // store's own guard rejects the duplicate.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/collections"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/collections"))
        .respond_with(rejected("Collection \"postal_address\" already exists."))
        .expect(1)
        .mount(&server)
        .await;

    let err = ensure_collection(&client(&server), &address).await.unwrap_err();
    match err {
        SyncError::CreateCollection { collection, .. } => {
            assert_eq!(collection, "postal_address")
        }
        other => panic!("expected CreateCollection, got {other}"),
    }
}
