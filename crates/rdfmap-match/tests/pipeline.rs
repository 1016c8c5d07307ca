use std::sync::Arc;

use rdfmap_match::matchers::history::HistoryAwareMatcher;
use rdfmap_match::{
    MatchContext, MatchHistory, MatchType, PipelineConfig, PipelineResources,
    create_custom_pipeline, create_exact_only_pipeline, create_fast_pipeline,
    create_semantic_only_pipeline,
};
use rdfmap_model::{ColumnAnalysis, OntologyProperty};

const HR: &str = "http://example.org/hr#";

fn prop(local: &str) -> OntologyProperty {
    OntologyProperty::new(format!("{HR}{local}"))
}

#[test]
fn exact_only_pipeline_uses_alt_labels() {
    let email = prop("contactEmail").with_alt_label("Email Address");
    let phone = prop("phoneNumber").with_label("Phone Number");
    let mut pipeline = create_exact_only_pipeline(&PipelineConfig::default());

    let context = MatchContext::new(["email_address"]);
    let outcome = pipeline.match_column(
        &ColumnAnalysis::new("email_address"),
        &[&phone, &email],
        &context,
    );
    let winner = outcome.winner().expect("alt label winner");
    assert_eq!(winner.property.uri, email.uri);
    assert_eq!(winner.match_type, MatchType::ExactAltLabel);
    assert_eq!(winner.confidence, 0.9);
    assert_eq!(winner.calibrated_confidence, Some(0.9));
}

#[test]
fn raising_the_minimum_rejects_the_best_candidate() {
    let birth = prop("birthDate");
    let config = PipelineConfig {
        min_confidence: 0.95,
        ..PipelineConfig::default()
    };
    let mut pipeline = create_fast_pipeline(&config);

    let outcome = pipeline.match_column(
        &ColumnAnalysis::new("birthDate"),
        &[&birth],
        &MatchContext::new(["birthDate"]),
    );
    assert!(outcome.winner().is_none());
    assert!(outcome.was_rejected());
    let best = outcome.best_candidate().expect("best candidate");
    assert_eq!(best.match_type, MatchType::ExactLocalName);
    assert_eq!(best.confidence, 0.8);
}

#[test]
fn logging_marks_exactly_one_selected_candidate() {
    let first = prop("firstName").with_pref_label("First Name");
    let config = PipelineConfig {
        enable_logging: true,
        ..PipelineConfig::default()
    };
    let mut pipeline = create_fast_pipeline(&config);
    let outcome = pipeline.match_column(
        &ColumnAnalysis::new("first_name"),
        &[&first],
        &MatchContext::new(["first_name"]),
    );
    assert_eq!(
        outcome.winner().map(|w| w.match_type),
        Some(MatchType::ExactPrefLabel)
    );

    let log = pipeline.take_log().expect("logging enabled");
    assert!(log.entries().len() >= 2);
    let wins = log.wins_by_matcher();
    assert_eq!(wins.len(), 1);
    assert_eq!(wins.get("ExactPrefLabelMatcher"), Some(&1));
}

#[test]
fn semantic_only_pipeline_expands_abbreviations() {
    let birth = prop("birthDate");
    let email = prop("email");
    let config = PipelineConfig {
        use_embeddings: false,
        ..PipelineConfig::default()
    };
    let mut pipeline = create_semantic_only_pipeline(&config, &PipelineResources::new());

    let winner = pipeline
        .find_best_match(
            &ColumnAnalysis::new("dob"),
            &[&email, &birth],
            &MatchContext::new(["dob"]),
        )
        .expect("semantic winner");
    assert_eq!(winner.property.uri, birth.uri);
    assert_eq!(winner.match_type, MatchType::SemanticSimilarity);
    assert_eq!(winner.confidence, 1.0);
    assert!((winner.effective_confidence() - 0.95).abs() < 1e-9);
}

#[test]
fn saved_history_drives_a_custom_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history").join("matches.json");

    let mut history = MatchHistory::new();
    history.record("employee_number", &format!("{HR}staffCode"), MatchType::ExactLabel, 0.95);
    history.save_to(&path).unwrap();

    let loaded = MatchHistory::load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.path(), Some(path.as_path()));

    let staff = prop("staffCode");
    let matcher = HistoryAwareMatcher::default().with_history(Arc::new(loaded));
    let mut pipeline = create_custom_pipeline(vec![Box::new(matcher)], &PipelineConfig::default());
    let context = MatchContext::new(["employee_number", "salary"]);

    let winner = pipeline
        .find_best_match(&ColumnAnalysis::new("employee_number"), &[&staff], &context)
        .expect("history winner");
    assert_eq!(winner.match_type, MatchType::HistoryAware);
    assert!((winner.confidence - 0.95).abs() < 1e-9);

    let none = pipeline.match_column(&ColumnAnalysis::new("salary"), &[&staff], &context);
    assert!(none.candidates.is_empty());
}

#[test]
fn missing_history_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let history = MatchHistory::load(dir.path().join("absent.json")).unwrap();
    assert!(history.is_empty());
}
