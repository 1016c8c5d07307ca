//! Class restriction (`owl:Restriction`) evidence.

use std::sync::Arc;

use rdfmap_model::{ColumnAnalysis, OntologyIndex, OntologyProperty, Restriction, RestrictionKind};

use super::datatype::datatype_compatibility;
use super::property_signal;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::split_identifier;

const MIN_SIGNAL: f64 = 0.5;
const NAME_WEIGHT: f64 = 0.7;

/// Agreement of a column with one restriction, in [0, 1].
pub fn restriction_agreement(column: &ColumnAnalysis, restriction: &Restriction) -> f64 {
    match restriction.kind {
        RestrictionKind::Cardinality | RestrictionKind::MinCardinality => {
            if !restriction.requires_value() {
                0.5
            } else if column.is_required {
                1.0
            } else {
                0.2
            }
        }
        RestrictionKind::MaxCardinality => {
            if restriction.cardinality() == Some(0) {
                0.0
            } else {
                0.7
            }
        }
        RestrictionKind::SomeValuesFrom | RestrictionKind::AllValuesFrom => {
            match (column.suggested_datatype.as_deref(), restriction.filler()) {
                (Some(datatype), Some(filler)) => datatype_compatibility(datatype, filler),
                _ => 0.5,
            }
        }
    }
}

/// Checks columns against the restrictions their candidate's class declares.
///
/// Score is `0.7 * name signal + 0.3 * mean restriction agreement`. Only
/// properties constrained by a restriction on their domain class count.
/// No-op without an index.
#[derive(Clone)]
pub struct RestrictionBasedMatcher {
    gate: Gate,
    index: Option<Arc<dyn OntologyIndex>>,
}

impl RestrictionBasedMatcher {
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

impl std::fmt::Debug for RestrictionBasedMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestrictionBasedMatcher")
            .field("gate", &self.gate)
            .field("has_index", &self.index.is_some())
            .finish()
    }
}

impl Matcher for RestrictionBasedMatcher {
    fn name(&self) -> &str {
        "RestrictionBasedMatcher"
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
            let Some(domain) = property.domain.as_deref() else {
                continue;
            };
            let restrictions: Vec<&Restriction> = index
                .restrictions(domain)
                .into_iter()
                .filter(|r| r.on_property == property.uri)
                .collect();
            if restrictions.is_empty() {
                continue;
            }
            let (signal, label) = property_signal(&name, property);
            if signal < MIN_SIGNAL {
                continue;
            }
            let agreement = restrictions
                .iter()
                .map(|r| restriction_agreement(column, r))
                .sum::<f64>()
                / restrictions.len() as f64;
            let score = NAME_WEIGHT * signal + (1.0 - NAME_WEIGHT) * agreement;
            best.offer(property, score, || {
                format!(
                    "restriction: {} constraint(s) agree {agreement:.2} ({label})",
                    restrictions.len()
                )
            });
        }
        Ok(best.into_result(&self.gate, MatchType::RestrictionBased, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use rdfmap_model::{InMemoryOntology, OntologyClass};

    use super::*;

    const PERSON: &str = "http://ex.org/Person";

    fn restricted(kind: RestrictionKind, value: &str) -> (OntologyProperty, Arc<dyn OntologyIndex>) {
        let prop = OntologyProperty::new("http://ex.org/age")
            .with_label("age")
            .with_domain(PERSON);
        let class = OntologyClass::new(PERSON).with_restriction(Restriction {
            on_property: prop.uri.clone(),
            kind,
            value: Some(value.to_string()),
        });
        let onto = InMemoryOntology::new()
            .with_class(class)
            .with_property(prop.clone());
        (prop, Arc::new(onto))
    }

    #[test]
    fn required_column_satisfies_min_cardinality() {
        let (prop, index) = restricted(RestrictionKind::MinCardinality, "1");
        let matcher = RestrictionBasedMatcher::new(0.55, Some(index));
        let column = ColumnAnalysis::new("age_years").required(true);
        let result = matcher
            .match_column(&column, &[&prop], &MatchContext::default())
            .unwrap()
            .expect("restriction match");
        assert_eq!(result.match_type, MatchType::RestrictionBased);
        assert!((result.confidence - (0.7 * 0.85 + 0.3)).abs() < 1e-9);
    }

    #[test]
    fn datatype_filler_mismatch_lowers_agreement() {
        let column = ColumnAnalysis::new("age").with_datatype("xsd:boolean");
        let restriction = Restriction {
            on_property: "http://ex.org/age".to_string(),
            kind: RestrictionKind::AllValuesFrom,
            value: Some("xsd:integer".to_string()),
        };
        assert!(restriction_agreement(&column, &restriction) < 0.5);
    }
}
