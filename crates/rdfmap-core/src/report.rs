//! Alignment report: how well a table lines up with the ontology.
//!
//! The report is fully owned data (no borrows into the ontology) so it can
//! be written to JSON, read back, and aggregated across runs.

use std::fs;
use std::path::Path;

use rdfmap_match::{ConfidenceLevel, ConfidenceThresholds, MatchType};
use rdfmap_model::SKOS_NAMESPACE;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};
use crate::mapping::write_file;

/// Samples kept per column in the report.
pub const REPORT_SAMPLE_LIMIT: usize = 5;

pub const REASON_NO_MATCH: &str = "No matching property found in ontology";
pub const REASON_BELOW_THRESHOLD: &str = "Best candidate below confidence threshold";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetClass {
    pub uri: String,
    pub label: String,
}

/// Aggregate counts. Buckets partition the mapped columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentStatistics {
    pub total_columns: usize,
    pub mapped_columns: usize,
    pub unmapped_columns: usize,
    pub high_confidence_matches: usize,
    pub medium_confidence_matches: usize,
    pub low_confidence_matches: usize,
    pub very_low_confidence_matches: usize,
    /// Mean confidence of mapped columns, 0.0 when nothing mapped.
    pub average_confidence: f64,
    /// `mapped / total`, 0.0 for an empty table.
    pub mapping_success_rate: f64,
}

impl AlignmentStatistics {
    pub fn compute(confidences: &[f64], unmapped: usize, thresholds: &ConfidenceThresholds) -> Self {
        let mapped = confidences.len();
        let total = mapped + unmapped;
        let mut stats = Self {
            total_columns: total,
            mapped_columns: mapped,
            unmapped_columns: unmapped,
            ..Self::default()
        };
        for &confidence in confidences {
            match thresholds.categorize(confidence) {
                ConfidenceLevel::High => stats.high_confidence_matches += 1,
                ConfidenceLevel::Medium => stats.medium_confidence_matches += 1,
                ConfidenceLevel::Low => stats.low_confidence_matches += 1,
                ConfidenceLevel::VeryLow => stats.very_low_confidence_matches += 1,
            }
        }
        if mapped > 0 {
            stats.average_confidence = confidences.iter().sum::<f64>() / mapped as f64;
        }
        if total > 0 {
            stats.mapping_success_rate = mapped as f64 / total as f64;
        }
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmappedColumn {
    pub column_name: String,
    pub sample_values: Vec<String>,
    pub inferred_datatype: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionType {
    HiddenLabel,
    AltLabel,
}

impl SuggestionType {
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::HiddenLabel => "hiddenLabel",
            Self::AltLabel => "altLabel",
        }
    }

    pub fn predicate_iri(&self) -> String {
        format!("{SKOS_NAMESPACE}{}", self.local_name())
    }
}

/// A label to add to the ontology so the column matches exactly next time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkosSuggestion {
    pub property_uri: String,
    pub property_label: String,
    pub suggestion_type: SuggestionType,
    pub suggested_label_value: String,
    /// Confidence of the match that prompted the suggestion.
    pub confidence: f64,
    pub justification: String,
    /// One N-Triples statement with full IRIs.
    pub turtle_snippet: String,
}

/// An accepted match below the high-confidence boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakMatch {
    pub column_name: String,
    pub property_uri: String,
    pub property_label: String,
    pub match_type: MatchType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibrated_confidence: Option<f64>,
    pub confidence_level: ConfidenceLevel,
    pub matched_via: String,
    pub sample_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<SkosSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub ontology_file: String,
    pub data_file: String,
    pub target_class: TargetClass,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub statistics: AlignmentStatistics,
    pub unmapped_columns: Vec<UnmappedColumn>,
    pub weak_matches: Vec<WeakMatch>,
    pub skos_suggestions: Vec<SkosSuggestion>,
}

impl AlignmentReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_json()?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| GeneratorError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| GeneratorError::ReportParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// An accepted match, detached from the ontology it was made against.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub column_name: String,
    pub property_uri: String,
    pub property_label: String,
    /// The property declares a skos:prefLabel or rdfs:label.
    pub property_has_label: bool,
    pub match_type: MatchType,
    pub confidence: f64,
    pub calibrated_confidence: Option<f64>,
    pub matched_via: String,
    pub sample_values: Vec<String>,
}

/// Proposes a SKOS label for an accepted match, if one would help.
///
/// Partial and fuzzy matches get a `skos:hiddenLabel` with the column name.
/// Local-name matches on properties without any label get a `skos:altLabel`.
/// Nothing is proposed at or above the `high` threshold.
pub fn suggest_label(record: &MatchRecord, thresholds: &ConfidenceThresholds) -> Option<SkosSuggestion> {
    if record.confidence >= thresholds.high {
        return None;
    }
    let (suggestion_type, justification) = match record.match_type {
        MatchType::Partial | MatchType::Fuzzy => (
            SuggestionType::HiddenLabel,
            format!(
                "column '{}' only reached {} via a {} match ({:.2})",
                record.column_name, record.property_label, record.match_type, record.confidence
            ),
        ),
        MatchType::ExactLocalName if !record.property_has_label => (
            SuggestionType::AltLabel,
            format!(
                "{} has no label; column '{}' matched its local name",
                record.property_uri, record.column_name
            ),
        ),
        _ => return None,
    };
    Some(SkosSuggestion {
        property_uri: record.property_uri.clone(),
        property_label: record.property_label.clone(),
        suggestion_type,
        suggested_label_value: record.column_name.clone(),
        confidence: record.confidence,
        justification,
        turtle_snippet: ntriple(
            &record.property_uri,
            &suggestion_type.predicate_iri(),
            &record.column_name,
        ),
    })
}

/// `<s> <p> "literal" .`
pub fn ntriple(subject: &str, predicate: &str, literal: &str) -> String {
    format!("<{subject}> <{predicate}> \"{}\" .", escape_literal(literal))
}

pub(crate) fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Collects match outcomes for one table and turns them into a report.
#[derive(Debug, Clone)]
pub struct AlignmentReportBuilder {
    ontology_file: String,
    data_file: String,
    target_class: TargetClass,
    thresholds: ConfidenceThresholds,
    generated_at: Option<String>,
    matches: Vec<MatchRecord>,
    unmapped: Vec<UnmappedColumn>,
}

impl AlignmentReportBuilder {
    pub fn new(
        ontology_file: impl Into<String>,
        data_file: impl Into<String>,
        target_class: TargetClass,
    ) -> Self {
        Self {
            ontology_file: ontology_file.into(),
            data_file: data_file.into(),
            target_class,
            thresholds: ConfidenceThresholds::default(),
            generated_at: None,
            matches: Vec::new(),
            unmapped: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Fixes the timestamp instead of using the current time.
    #[must_use]
    pub fn generated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }

    pub fn record_match(&mut self, mut record: MatchRecord) {
        record.sample_values.truncate(REPORT_SAMPLE_LIMIT);
        self.matches.push(record);
    }

    pub fn record_unmapped(&mut self, mut column: UnmappedColumn) {
        column.sample_values.truncate(REPORT_SAMPLE_LIMIT);
        self.unmapped.push(column);
    }

    pub fn build(self) -> AlignmentReport {
        let confidences: Vec<f64> = self.matches.iter().map(|m| m.confidence).collect();
        let statistics = AlignmentStatistics::compute(&confidences, self.unmapped.len(), &self.thresholds);

        let mut weak_matches = Vec::new();
        let mut skos_suggestions = Vec::new();
        for record in self.matches {
            let level = self.thresholds.categorize(record.confidence);
            if level == ConfidenceLevel::High {
                continue;
            }
            let suggestion = suggest_label(&record, &self.thresholds);
            if let Some(suggestion) = &suggestion {
                skos_suggestions.push(suggestion.clone());
            }
            weak_matches.push(WeakMatch {
                column_name: record.column_name,
                property_uri: record.property_uri,
                property_label: record.property_label,
                match_type: record.match_type,
                confidence: record.confidence,
                calibrated_confidence: record.calibrated_confidence,
                confidence_level: level,
                matched_via: record.matched_via,
                sample_values: record.sample_values,
                suggestion,
            });
        }

        AlignmentReport {
            ontology_file: self.ontology_file,
            data_file: self.data_file,
            target_class: self.target_class,
            generated_at: self
                .generated_at
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
            statistics,
            unmapped_columns: self.unmapped,
            weak_matches,
            skos_suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn record(column: &str, match_type: MatchType, confidence: f64) -> MatchRecord {
        MatchRecord {
            column_name: column.to_string(),
            property_uri: format!("http://example.org/hr#{column}"),
            property_label: column.to_string(),
            property_has_label: true,
            match_type,
            confidence,
            calibrated_confidence: None,
            matched_via: "test".to_string(),
            sample_values: vec!["a".to_string(); 8],
        }
    }

    fn builder() -> AlignmentReportBuilder {
        AlignmentReportBuilder::new(
            "hr.json",
            "employees.csv",
            TargetClass {
                uri: "http://example.org/hr#Employee".to_string(),
                label: "Employee".to_string(),
            },
        )
        .generated_at("2026-01-01T00:00:00+00:00")
    }

    #[test]
    fn empty_table_has_zero_rates() {
        let report = builder().build();
        assert_eq!(report.statistics.total_columns, 0);
        assert_eq!(report.statistics.mapping_success_rate, 0.0);
        assert_eq!(report.statistics.average_confidence, 0.0);
    }

    #[test]
    fn fuzzy_match_gets_hidden_label_snippet() {
        let mut b = builder();
        b.record_match(record("emp_nm", MatchType::Fuzzy, 0.62));
        let report = b.build();
        assert_eq!(report.weak_matches.len(), 1);
        assert_eq!(report.weak_matches[0].confidence_level, ConfidenceLevel::Medium);
        assert_eq!(report.weak_matches[0].sample_values.len(), REPORT_SAMPLE_LIMIT);
        let suggestion = &report.skos_suggestions[0];
        assert_eq!(suggestion.suggestion_type, SuggestionType::HiddenLabel);
        assert_eq!(
            suggestion.turtle_snippet,
            "<http://example.org/hr#emp_nm> <http://www.w3.org/2004/02/skos/core#hiddenLabel> \"emp_nm\" ."
        );
    }

    #[test]
    fn local_name_match_without_labels_gets_alt_label() {
        let mut unlabeled = record("hireDate", MatchType::ExactLocalName, 0.7);
        unlabeled.property_has_label = false;
        let labeled = record("startDate", MatchType::ExactLocalName, 0.7);
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(
            suggest_label(&unlabeled, &thresholds).map(|s| s.suggestion_type),
            Some(SuggestionType::AltLabel)
        );
        assert!(suggest_label(&labeled, &thresholds).is_none());
    }

    #[test]
    fn high_confidence_and_pref_label_never_suggest() {
        let thresholds = ConfidenceThresholds::default();
        assert!(suggest_label(&record("x", MatchType::Fuzzy, 0.85), &thresholds).is_none());
        assert!(suggest_label(&record("x", MatchType::ExactPrefLabel, 0.4), &thresholds).is_none());
    }

    #[test]
    fn literal_escaping() {
        assert_eq!(
            ntriple("s", "p", "say \"hi\"\\"),
            "<s> <p> \"say \\\"hi\\\"\\\\\" ."
        );
    }

    proptest! {
        #[test]
        fn buckets_partition_mapped_columns(
            confidences in proptest::collection::vec(0.0f64..=1.0, 0..40),
            unmapped in 0usize..10,
        ) {
            let stats = AlignmentStatistics::compute(&confidences, unmapped, &ConfidenceThresholds::default());
            let buckets = stats.high_confidence_matches
                + stats.medium_confidence_matches
                + stats.low_confidence_matches
                + stats.very_low_confidence_matches;
            prop_assert_eq!(buckets, stats.mapped_columns);
            prop_assert_eq!(stats.mapped_columns + stats.unmapped_columns, stats.total_columns);
            if stats.total_columns == 0 {
                prop_assert_eq!(stats.mapping_success_rate, 0.0);
            } else {
                let expected = stats.mapped_columns as f64 / stats.total_columns as f64;
                prop_assert!((stats.mapping_success_rate - expected).abs() < 1e-12);
            }
        }
    }
}
