//! Integration tests for mapping generation.

use std::sync::Arc;

use rdfmap_core::{
    GeneratorConfig, GeneratorError, MappingConfig, MappingGenerator, REASON_BELOW_THRESHOLD,
    REASON_NO_MATCH, SuggestionType, auto_detect_class, resolve_class,
};
use rdfmap_match::{
    MatchHistory, MatchType, PipelineConfig, create_exact_only_pipeline, create_fast_pipeline,
};
use rdfmap_model::{
    ColumnAnalysis, DataSource, InMemoryDataSource, InMemoryOntology, OntologyClass,
    OntologyIndex, OntologyProperty, PropertyKind,
};

const HR: &str = "http://example.org/hr#";
const BASE: &str = "http://data.example.org/";

fn hr(local: &str) -> String {
    format!("{HR}{local}")
}

fn hr_ontology() -> InMemoryOntology {
    InMemoryOntology::new()
        .with_namespace("hr", HR)
        .with_class(OntologyClass::new(hr("Employee")).with_label("Employee"))
        .with_class(OntologyClass::new(hr("Department")).with_label("Department"))
        .with_property(
            OntologyProperty::new(hr("firstName"))
                .with_pref_label("First Name")
                .with_domain(hr("Employee"))
                .with_range("xsd:string"),
        )
        .with_property(
            OntologyProperty::new(hr("birthDate"))
                .with_label("birth date")
                .with_comment("Date the person was born")
                .with_domain(hr("Employee"))
                .with_range("xsd:date"),
        )
        .with_property(
            OntologyProperty::new(hr("worksIn"))
                .with_label("works in")
                .with_kind(PropertyKind::Object)
                .with_domain(hr("Employee"))
                .with_range(hr("Department")),
        )
        .with_property(
            OntologyProperty::new(hr("deptName"))
                .with_label("department name")
                .with_domain(hr("Department"))
                .with_range("xsd:string"),
        )
}

fn emp_id() -> ColumnAnalysis {
    ColumnAnalysis::new("emp_id")
        .with_samples(["1001", "1002", "1003"])
        .with_datatype("xsd:integer")
        .required(true)
        .with_unique_ratio(1.0)
}

fn first_name() -> ColumnAnalysis {
    ColumnAnalysis::new("First_Name")
        .with_samples(["Ada", "Grace", "Edsger"])
        .with_datatype("xsd:string")
        .required(true)
        .with_unique_ratio(1.0)
}

fn table(name: &str, columns: Vec<ColumnAnalysis>) -> Box<dyn DataSource> {
    Box::new(InMemoryDataSource::new(name, columns).unwrap())
}

fn config() -> GeneratorConfig {
    GeneratorConfig::new(BASE)
}

#[test]
fn default_pipeline_scenarios() {
    let data = table(
        "employees",
        vec![
            emp_id(),
            first_name(),
            ColumnAnalysis::new("DOB")
                .with_samples(["1815-12-10", "1906-12-09"])
                .with_datatype("xsd:date"),
        ],
    );
    let mut generator =
        MappingGenerator::new(Arc::new(hr_ontology()), data, config().with_relationships(false))
            .with_ontology_file("hr.json");

    let (mapping, report) = generator
        .generate_with_alignment_report(Some("Employee"), None)
        .unwrap();

    let sheet = &mapping.sheets[0];
    assert_eq!(sheet.row_resource.class, "hr:Employee");
    assert_eq!(sheet.row_resource.iri_template, "employee:{emp_id}");
    assert_eq!(
        sheet.columns.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["First_Name", "DOB"]
    );
    assert_eq!(sheet.columns["First_Name"].property, "hr:firstName");
    assert_eq!(sheet.columns["DOB"].property, "hr:birthDate");

    let accepted = generator.accepted_matches();
    assert_eq!(accepted[0].match_type, MatchType::ExactPrefLabel);
    assert_eq!(accepted[0].confidence, 1.0);
    assert_eq!(accepted[1].match_type, MatchType::SemanticSimilarity);
    assert_eq!(accepted[1].confidence, 1.0);

    assert_eq!(report.ontology_file, "hr.json");
    assert_eq!(report.target_class.label, "Employee");
    assert_eq!(report.statistics.total_columns, 3);
    assert_eq!(report.statistics.mapped_columns, 2);
    assert_eq!(report.statistics.high_confidence_matches, 2);
    assert!((report.statistics.mapping_success_rate - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.unmapped_columns.len(), 1);
    assert_eq!(report.unmapped_columns[0].column_name, "emp_id");
    assert_eq!(report.unmapped_columns[0].reason, REASON_NO_MATCH);
    assert_eq!(report.unmapped_columns[0].inferred_datatype.as_deref(), Some("xsd:integer"));
    assert!(report.weak_matches.is_empty());
    assert!(report.skos_suggestions.is_empty());
}

#[test]
fn mapping_configuration_snapshot() {
    let data = table(
        "employees",
        vec![
            emp_id(),
            first_name(),
            ColumnAnalysis::new("birth_date").with_datatype("xsd:date"),
            ColumnAnalysis::new("department_name").with_datatype("xsd:string"),
        ],
    );
    let pipeline = create_exact_only_pipeline(&PipelineConfig::default());
    let mut generator =
        MappingGenerator::with_pipeline(Arc::new(hr_ontology()), data, config(), pipeline);
    let mapping = generator.generate(None, None).unwrap();

    insta::assert_json_snapshot!(mapping, @r###"
    {
      "namespaces": {
        "hr": "http://example.org/hr#",
        "xsd": "http://www.w3.org/2001/XMLSchema#"
      },
      "defaults": {
        "base_iri": "http://data.example.org/"
      },
      "sheets": [
        {
          "name": "employees",
          "source": "employees",
          "row_resource": {
            "class": "hr:Employee",
            "iri_template": "employee:{emp_id}"
          },
          "columns": {
            "First_Name": {
              "as": "hr:firstName",
              "datatype": "xsd:string",
              "required": true
            },
            "birth_date": {
              "as": "hr:birthDate",
              "datatype": "xsd:date",
              "_comment": "Date the person was born"
            }
          },
          "objects": {
            "works in": {
              "predicate": "hr:worksIn",
              "class": "hr:Department",
              "iri_template": "department:{emp_id}",
              "properties": [
                {
                  "column": "department_name",
                  "as": "hr:deptName"
                }
              ]
            }
          }
        }
      ],
      "options": {
        "on_error": "report",
        "skip_empty_values": true
      }
    }
    "###);
}

#[test]
fn generation_is_repeatable_without_history() {
    let build = || {
        MappingGenerator::new(
            Arc::new(hr_ontology()),
            table("employees", vec![emp_id(), first_name()]),
            config(),
        )
    };
    let mut generator = build();
    let first = generator.generate(Some("Employee"), None).unwrap();
    let second = generator.generate(Some("Employee"), None).unwrap();
    let fresh = build().generate(Some("Employee"), None).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn rejected_candidates_are_reported_with_their_reason() {
    let pipeline = create_fast_pipeline(&PipelineConfig::default());
    let ontology = InMemoryOntology::new()
        .with_namespace("hr", HR)
        .with_class(OntologyClass::new(hr("Employee")).with_label("Employee"))
        .with_property(
            OntologyProperty::new(hr("lastName"))
                .with_label("last name")
                .with_domain(hr("Employee")),
        );
    let mut generator = MappingGenerator::with_pipeline(
        Arc::new(ontology),
        table("staff", vec![ColumnAnalysis::new("lst_name")]),
        config().with_min_confidence(0.9),
        pipeline,
    );
    let (mapping, report) = generator
        .generate_with_alignment_report(Some("Employee"), None)
        .unwrap();
    assert!(mapping.sheets[0].columns.is_empty());
    assert_eq!(mapping.sheets[0].row_resource.iri_template, "employee:{lst_name}");
    assert_eq!(report.unmapped_columns[0].reason, REASON_BELOW_THRESHOLD);
    assert_eq!(report.statistics.mapping_success_rate, 0.0);
}

#[test]
fn weak_fuzzy_match_yields_hidden_label_suggestion() {
    let ontology = InMemoryOntology::new()
        .with_namespace("hr", HR)
        .with_class(OntologyClass::new(hr("Employee")).with_label("Employee"))
        .with_property(
            OntologyProperty::new(hr("lastName"))
                .with_label("last name")
                .with_domain(hr("Employee")),
        );
    let mut generator = MappingGenerator::with_pipeline(
        Arc::new(ontology),
        table("staff", vec![ColumnAnalysis::new("last_nm").with_samples(["Hopper"])]),
        config(),
        create_fast_pipeline(&PipelineConfig::default()),
    );
    let (_, report) = generator
        .generate_with_alignment_report(Some("Employee"), None)
        .unwrap();

    assert_eq!(report.statistics.medium_confidence_matches, 1);
    let weak = &report.weak_matches[0];
    assert_eq!(weak.match_type, MatchType::Fuzzy);
    assert!(weak.confidence < 0.8);
    assert_eq!(weak.sample_values, vec!["Hopper".to_string()]);
    let suggestion = weak.suggestion.as_ref().expect("suggestion");
    assert_eq!(suggestion.suggestion_type, SuggestionType::HiddenLabel);
    assert_eq!(
        suggestion.turtle_snippet,
        "<http://example.org/hr#lastName> <http://www.w3.org/2004/02/skos/core#hiddenLabel> \"last_nm\" ."
    );
    assert_eq!(report.skos_suggestions, vec![suggestion.clone()]);
}

#[test]
fn class_without_properties_leaves_every_column_unmapped() {
    let ontology = hr_ontology().with_class(OntologyClass::new(hr("Project")).with_label("Project"));
    let mut generator = MappingGenerator::new(
        Arc::new(ontology),
        table("projects", vec![emp_id(), first_name()]),
        config(),
    );
    let (mapping, report) = generator
        .generate_with_alignment_report(Some("Project"), None)
        .unwrap();
    assert!(mapping.sheets[0].columns.is_empty());
    assert_eq!(report.statistics.unmapped_columns, 2);
    assert!(
        report
            .unmapped_columns
            .iter()
            .all(|c| c.reason == REASON_NO_MATCH)
    );
}

#[test]
fn class_resolution() {
    let onto = hr_ontology();
    let index: &dyn OntologyIndex = &onto;
    assert_eq!(resolve_class(index, "employee").unwrap().uri, hr("Employee"));
    assert_eq!(resolve_class(index, &hr("Department")).unwrap().uri, hr("Department"));
    assert_eq!(resolve_class(index, "Department").unwrap().uri, hr("Department"));
    assert!(matches!(
        resolve_class(index, "Spaceship"),
        Err(GeneratorError::ClassNotFound { .. })
    ));

    assert_eq!(auto_detect_class(index, "departments").unwrap().uri, hr("Department"));
    assert_eq!(auto_detect_class(index, "misc").unwrap().uri, hr("Employee"));
    let empty = InMemoryOntology::new();
    assert!(matches!(
        auto_detect_class(&empty, "misc"),
        Err(GeneratorError::NoTargetClass)
    ));
}

#[test]
fn empty_table_still_gets_a_report() {
    let mut generator =
        MappingGenerator::new(Arc::new(hr_ontology()), table("empty", Vec::new()), config());
    let (mapping, report) = generator
        .generate_with_alignment_report(Some("Employee"), None)
        .unwrap();

    let sheet = &mapping.sheets[0];
    assert_eq!(sheet.row_resource.class, "hr:Employee");
    assert_eq!(sheet.row_resource.iri_template, "employee:");
    assert!(sheet.columns.is_empty());
    assert!(sheet.objects.is_empty());

    assert_eq!(report.statistics.total_columns, 0);
    assert_eq!(report.statistics.mapped_columns, 0);
    assert_eq!(report.statistics.mapping_success_rate, 0.0);
    assert_eq!(report.statistics.average_confidence, 0.0);
    assert!(report.unmapped_columns.is_empty());
}

#[test]
fn match_log_covers_row_columns_only_and_resets_per_run() {
    let data = table(
        "employees",
        vec![
            emp_id(),
            first_name(),
            ColumnAnalysis::new("department_name").with_datatype("xsd:string"),
        ],
    );
    let pipeline = create_exact_only_pipeline(&PipelineConfig {
        enable_logging: true,
        ..PipelineConfig::default()
    });
    let mut generator =
        MappingGenerator::with_pipeline(Arc::new(hr_ontology()), data, config(), pipeline);

    let mut entries_per_run = Vec::new();
    for _ in 0..2 {
        let mapping = generator.generate(Some("Employee"), None).unwrap();
        assert_eq!(mapping.sheets[0].objects["works in"].properties[0].column, "department_name");

        let log = generator.pipeline().log().expect("logging enabled");
        assert!(!log.is_empty());
        assert!(log.entries().iter().all(|e| e.column == "First_Name"));
        assert_eq!(log.wins_by_matcher().values().sum::<usize>(), 1);
        entries_per_run.push(log.entries().len());
    }
    assert_eq!(entries_per_run[0], entries_per_run[1]);
}

#[test]
fn source_is_relative_to_the_output_and_yaml_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data").join("employees.csv");
    let output = dir.path().join("config").join("mapping.yaml");

    let data = InMemoryDataSource::new("employees", vec![emp_id(), first_name()])
        .unwrap()
        .with_path(&data_path);
    let mut generator = MappingGenerator::new(Arc::new(hr_ontology()), Box::new(data), config());
    let mapping = generator.generate(Some("Employee"), Some(&output)).unwrap();
    assert_eq!(
        std::path::Path::new(&mapping.sheets[0].source),
        std::path::Path::new("../data/employees.csv")
    );

    mapping.save_yaml(&output).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("as: hr:firstName"));
    let back: MappingConfig = serde_yaml::from_str(&text).unwrap();
    assert_eq!(back, mapping);

    let json = dir.path().join("mapping.json");
    mapping.save_json(&json).unwrap();
    let back: MappingConfig = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(back, mapping);
}

#[test]
fn accepted_matches_feed_the_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut generator = MappingGenerator::new(
        Arc::new(hr_ontology()),
        table("employees", vec![emp_id(), first_name()]),
        config(),
    );
    generator.generate(Some("Employee"), None).unwrap();

    let mut history = MatchHistory::load(&path).unwrap();
    assert_eq!(generator.record_history(&mut history), 1);
    history.save().unwrap();

    let reloaded = MatchHistory::load(&path).unwrap();
    assert_eq!(reloaded.len(), 1);
    let record = &reloaded.records()[0];
    assert_eq!(record.column_name, "First_Name");
    assert_eq!(record.property_uri, hr("firstName"));
    assert_eq!(record.match_type, MatchType::ExactPrefLabel);
}
