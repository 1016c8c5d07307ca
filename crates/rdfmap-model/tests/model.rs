//! Tests for rdfmap-model collaborator types.

use rdfmap_model::{
    ColumnAnalysis, DataSource, InMemoryDataSource, InMemoryOntology, OntologyIndex,
    OntologyProperty, PropertyKind,
};

#[test]
fn ontology_index_round_trips_through_json() {
    let json = r#"{
        "namespaces": { "hr": "http://example.org/hr#" },
        "classes": [ { "uri": "http://example.org/hr#Employee", "label": "Employee" } ],
        "properties": [
            {
                "uri": "http://example.org/hr#firstName",
                "pref_label": "First Name",
                "domain": "http://example.org/hr#Employee",
                "range": "http://www.w3.org/2001/XMLSchema#string"
            },
            {
                "uri": "http://example.org/hr#worksIn",
                "kind": "object",
                "domain": "http://example.org/hr#Employee",
                "range": "http://example.org/hr#Department"
            }
        ]
    }"#;
    let onto: InMemoryOntology = serde_json::from_str(json).expect("parse ontology index");

    assert_eq!(onto.classes().len(), 1);
    let datatype = onto.get_datatype_properties("http://example.org/hr#Employee");
    assert_eq!(datatype.len(), 1);
    assert_eq!(datatype[0].pref_label.as_deref(), Some("First Name"));
    assert_eq!(datatype[0].kind, PropertyKind::Datatype);

    let object = onto.get_object_properties("http://example.org/hr#Employee");
    assert_eq!(object[0].local_name(), "worksIn");
}

#[test]
fn concept_labels_fall_back_to_local_name() {
    let onto = InMemoryOntology::new().with_property(
        OntologyProperty::new("http://example.org/hr#salary").with_label("annual salary"),
    );
    assert_eq!(
        onto.concept_labels("http://example.org/hr#salary"),
        vec!["annual salary".to_string(), "salary".to_string()]
    );
    assert_eq!(
        onto.concept_labels("http://example.org/hr#Unknown"),
        vec!["Unknown".to_string()]
    );
}

#[test]
fn data_source_keeps_declared_column_order() {
    let source = InMemoryDataSource::new(
        "employees",
        vec![
            ColumnAnalysis::new("zeta"),
            ColumnAnalysis::new("alpha"),
            ColumnAnalysis::new("emp_id").with_unique_ratio(1.0),
        ],
    )
    .expect("build source");

    assert_eq!(source.get_column_names(), vec!["zeta", "alpha", "emp_id"]);
    assert_eq!(source.suggest_iri_template_columns(), vec!["emp_id"]);
    assert!(source.get_analysis("missing").is_none());
}
