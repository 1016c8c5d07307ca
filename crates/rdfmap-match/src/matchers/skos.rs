//! SKOS `related` / `broader` / `narrower` evidence.

use std::sync::Arc;

use rdfmap_model::{ColumnAnalysis, OntologyIndex, OntologyProperty};

use super::name_signal;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::{normalize_text, split_identifier};

const RELATED_WEIGHT: f64 = 0.85;
const NARROWER_WEIGHT: f64 = 0.8;
const BROADER_WEIGHT: f64 = 0.7;

/// Matches a column that names a concept SKOS-linked to a property.
///
/// The name signal against the concept's labels is weighted by relation:
/// related over narrower over broader. No-op without an index.
#[derive(Clone)]
pub struct SkosRelationsMatcher {
    gate: Gate,
    index: Option<Arc<dyn OntologyIndex>>,
}

impl SkosRelationsMatcher {
    pub fn new(threshold: f64, index: Option<Arc<dyn OntologyIndex>>) -> Self {
        Self {
            gate: Gate::new(threshold),
            index,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }
}

impl std::fmt::Debug for SkosRelationsMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkosRelationsMatcher")
            .field("gate", &self.gate)
            .field("has_index", &self.index.is_some())
            .finish()
    }
}

impl Matcher for SkosRelationsMatcher {
    fn name(&self) -> &str {
        "SkosRelationsMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::Medium
    }

    fn enabled(&self) -> bool {
        self.gate.enabled && self.index.is_some()
    }

    fn threshold(&self) -> f64 {
        self.gate.threshold
    }

    fn match_column<'p>(
        &self,
        column: &ColumnAnalysis,
        properties: &[&'p OntologyProperty],
        _context: &MatchContext,
    ) -> Result<Option<MatchResult<'p>>, MatcherError> {
        let Some(index) = self.index.as_deref() else {
            return Ok(None);
        };
        let name = split_identifier(&column.name);
        let mut best = Best::new();
        for &property in properties {
            let relations = [
                ("related", RELATED_WEIGHT, &property.related),
                ("narrower", NARROWER_WEIGHT, &property.narrower),
                ("broader", BROADER_WEIGHT, &property.broader),
            ];
            for (relation, weight, concepts) in relations {
                for concept in concepts {
                    for label in index.concept_labels(concept) {
                        let score = name_signal(&name, &normalize_text(&label)) * weight;
                        best.offer(property, score, || {
                            format!("skos:{relation} concept '{label}'")
                        });
                    }
                }
            }
        }
        Ok(best.into_result(&self.gate, MatchType::SkosRelations, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use rdfmap_model::{InMemoryOntology, SkosConcept};

    use super::*;

    #[test]
    fn related_concept_label_proposes_property() {
        let onto = InMemoryOntology::new().with_concept(SkosConcept {
            uri: "http://ex.org/concept/Wage".to_string(),
            pref_label: Some("wage".to_string()),
            alt_labels: vec!["pay".to_string()],
        });
        let salary = OntologyProperty {
            related: vec!["http://ex.org/concept/Wage".to_string()],
            ..OntologyProperty::new("http://ex.org/salary").with_label("salary")
        };
        let matcher = SkosRelationsMatcher::new(0.5, Some(Arc::new(onto)));
        let result = matcher
            .match_column(&ColumnAnalysis::new("Wage"), &[&salary], &MatchContext::default())
            .unwrap()
            .expect("skos match");
        assert_eq!(result.property.uri, "http://ex.org/salary");
        assert!((result.confidence - 0.85).abs() < 1e-9);
        assert_eq!(result.matched_via, "skos:related concept 'wage'");
    }
}
