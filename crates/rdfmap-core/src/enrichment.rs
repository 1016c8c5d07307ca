//! SKOS label patches built from alignment report suggestions.

use std::path::Path;

use rdfmap_model::SKOS_NAMESPACE;
use tracing::debug;

use crate::error::Result;
use crate::mapping::write_file;
use crate::report::{AlignmentReport, SkosSuggestion, escape_literal};

/// De-duplicated label additions ready to merge into an ontology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentPatch {
    suggestions: Vec<SkosSuggestion>,
}

impl EnrichmentPatch {
    /// Keeps suggestions whose match confidence is at least `min_confidence`.
    ///
    /// The same (property, label kind, value) triple is kept once, first
    /// occurrence wins.
    pub fn from_report(report: &AlignmentReport, min_confidence: f64) -> Self {
        let mut suggestions: Vec<SkosSuggestion> = Vec::new();
        for suggestion in &report.skos_suggestions {
            if suggestion.confidence < min_confidence {
                debug!(
                    property = %suggestion.property_uri,
                    confidence = suggestion.confidence,
                    "suggestion below enrichment minimum"
                );
                continue;
            }
            let duplicate = suggestions.iter().any(|s| {
                s.property_uri == suggestion.property_uri
                    && s.suggestion_type == suggestion.suggestion_type
                    && s.suggested_label_value == suggestion.suggested_label_value
            });
            if !duplicate {
                suggestions.push(suggestion.clone());
            }
        }
        Self { suggestions }
    }

    pub fn suggestions(&self) -> &[SkosSuggestion] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Renders the patch as Turtle with a `skos:` prefix.
    pub fn to_turtle(&self) -> String {
        let mut out = format!("@prefix skos: <{SKOS_NAMESPACE}> .\n");
        if !self.suggestions.is_empty() {
            out.push('\n');
        }
        for suggestion in &self.suggestions {
            out.push_str(&format!(
                "<{}> skos:{} \"{}\" .\n",
                suggestion.property_uri,
                suggestion.suggestion_type.local_name(),
                escape_literal(&suggestion.suggested_label_value)
            ));
        }
        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_turtle())
    }
}
