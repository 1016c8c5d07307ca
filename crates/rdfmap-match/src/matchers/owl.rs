//! OWL functional / inverse-functional characteristics.

use std::sync::Arc;

use rdfmap_model::{ColumnAnalysis, OntologyIndex, OntologyProperty};

use super::property_signal;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::split_identifier;

const MIN_SIGNAL: f64 = 0.5;

/// Confirms name evidence with data that behaves like the declared axioms.
///
/// An inverse-functional property expects near-unique values
/// (`ifp_uniqueness`), a functional one expects mostly-unique, rarely
/// empty values (`fp_uniqueness`). The characteristics are read from the
/// index's declaration of each candidate, falling back to the candidate
/// itself when the index does not know it. No-op without an index.
#[derive(Clone)]
pub struct OwlCharacteristicsMatcher {
    gate: Gate,
    index: Option<Arc<dyn OntologyIndex>>,
    ifp_uniqueness: f64,
    fp_uniqueness: f64,
}

impl OwlCharacteristicsMatcher {
    pub fn new(threshold: f64, index: Option<Arc<dyn OntologyIndex>>) -> Self {
        Self {
            gate: Gate::new(threshold),
            index,
            ifp_uniqueness: 0.90,
            fp_uniqueness: 0.95,
        }
    }

    #[must_use]
    pub fn with_uniqueness(mut self, ifp: f64, fp: f64) -> Self {
        self.ifp_uniqueness = ifp.clamp(0.0, 1.0);
        self.fp_uniqueness = fp.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }

    fn characteristic_fit(
        &self,
        index: &dyn OntologyIndex,
        column: &ColumnAnalysis,
        property: &OntologyProperty,
    ) -> Option<(f64, &'static str)> {
        let declared = index.property(&property.uri).unwrap_or(property);
        if declared.inverse_functional && column.unique_ratio >= self.ifp_uniqueness {
            return Some((0.1, "inverse-functional, values unique"));
        }
        if declared.functional
            && column.unique_ratio >= self.fp_uniqueness
            && column.null_ratio <= 1.0 - self.fp_uniqueness
        {
            return Some((0.05, "functional, values single and present"));
        }
        None
    }
}

impl std::fmt::Debug for OwlCharacteristicsMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwlCharacteristicsMatcher")
            .field("gate", &self.gate)
            .field("has_index", &self.index.is_some())
            .field("ifp_uniqueness", &self.ifp_uniqueness)
            .field("fp_uniqueness", &self.fp_uniqueness)
            .finish()
    }
}

impl Matcher for OwlCharacteristicsMatcher {
    fn name(&self) -> &str {
        "OwlCharacteristicsMatcher"
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
            let Some((bonus, why)) = self.characteristic_fit(index, column, property) else {
                continue;
            };
            let (signal, label) = property_signal(&name, property);
            if signal < MIN_SIGNAL {
                continue;
            }
            let score = (signal * 0.9 + bonus).min(1.0);
            best.offer(property, score, || format!("owl: {why} ({label})"));
        }
        Ok(best.into_result(&self.gate, MatchType::OwlCharacteristics, self.name()))
    }
}
