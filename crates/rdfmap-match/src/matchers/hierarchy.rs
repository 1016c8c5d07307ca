//! Property hierarchy (`rdfs:subPropertyOf`) evidence.

use std::sync::Arc;

use rdfmap_model::{ColumnAnalysis, OntologyIndex, OntologyProperty};

use super::property_signal;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::split_identifier;

const MIN_SIGNAL: f64 = 0.85;
const RELATIVE_WEIGHT: f64 = 0.85;

/// Boosts properties that sit in a sub/super-property chain.
///
/// A column that names a property directly, or names one of its
/// super/sub-properties, scores the name signal plus `hierarchy_boost`.
/// Evidence through a relative is discounted. No-op without an index.
#[derive(Clone)]
pub struct PropertyHierarchyMatcher {
    gate: Gate,
    index: Option<Arc<dyn OntologyIndex>>,
    hierarchy_boost: f64,
}

impl PropertyHierarchyMatcher {
    pub fn new(threshold: f64, index: Option<Arc<dyn OntologyIndex>>) -> Self {
        Self {
            gate: Gate::new(threshold),
            index,
            hierarchy_boost: 0.15,
        }
    }

    #[must_use]
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.hierarchy_boost = boost.max(0.0);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }
}

impl std::fmt::Debug for PropertyHierarchyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyHierarchyMatcher")
            .field("gate", &self.gate)
            .field("has_index", &self.index.is_some())
            .field("hierarchy_boost", &self.hierarchy_boost)
            .finish()
    }
}

impl Matcher for PropertyHierarchyMatcher {
    fn name(&self) -> &str {
        "PropertyHierarchyMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::High
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
            let parents = index.super_properties(&property.uri);
            let children = index.sub_properties(&property.uri);
            if parents.is_empty() && children.is_empty() {
                continue;
            }

            let (own, own_label) = property_signal(&name, property);
            let mut signal = own;
            let mut via = format!("hierarchy: {own_label}");
            for relative in parents.iter().chain(children.iter()) {
                let (rel, rel_label) = property_signal(&name, relative);
                let discounted = rel * RELATIVE_WEIGHT;
                if rel >= MIN_SIGNAL && discounted > signal {
                    signal = discounted;
                    via = format!("hierarchy: related property {} ({rel_label})", relative.uri);
                }
            }
            if signal < MIN_SIGNAL * RELATIVE_WEIGHT {
                continue;
            }
            let score = (signal * 0.8 + self.hierarchy_boost).min(1.0);
            best.offer(property, score, || via);
        }
        Ok(best.into_result(&self.gate, MatchType::Hierarchy, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use rdfmap_model::InMemoryOntology;

    use super::*;

    fn index() -> (InMemoryOntology, Arc<dyn OntologyIndex>) {
        let onto = InMemoryOntology::new()
            .with_property(OntologyProperty::new("http://ex.org/identifier").with_label("identifier"))
            .with_property(OntologyProperty {
                super_properties: vec!["http://ex.org/identifier".to_string()],
                ..OntologyProperty::new("http://ex.org/employeeNumber").with_label("employee number")
            })
            .with_property(OntologyProperty::new("http://ex.org/salary").with_label("salary"));
        (onto.clone(), Arc::new(onto))
    }

    #[test]
    fn parent_label_points_at_child_property() {
        let (onto, shared) = index();
        let matcher = PropertyHierarchyMatcher::new(0.65, Some(shared));
        let child = &onto.properties[1];
        let result = matcher
            .match_column(&ColumnAnalysis::new("Identifier"), &[child], &MatchContext::default())
            .unwrap()
            .expect("hierarchy match");
        assert_eq!(result.property.uri, "http://ex.org/employeeNumber");
        assert!(result.matched_via.contains("related property"));
    }

    #[test]
    fn properties_outside_a_hierarchy_are_skipped() {
        let (onto, shared) = index();
        let matcher = PropertyHierarchyMatcher::new(0.65, Some(shared));
        let salary = &onto.properties[2];
        let result = matcher
            .match_column(&ColumnAnalysis::new("salary"), &[salary], &MatchContext::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn missing_index_disables_the_matcher() {
        let matcher = PropertyHierarchyMatcher::new(0.65, None);
        assert!(!matcher.enabled());
    }
}
