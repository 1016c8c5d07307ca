//! String-similarity fallbacks, run last in the pipeline.

use rapidfuzz::distance::levenshtein;
use rdfmap_model::{ColumnAnalysis, OntologyProperty};

use super::searchable_labels;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};

const PARTIAL_MIN_LEN: usize = 3;

fn compact(normalized: &str) -> String {
    normalized.replace(' ', "")
}

/// Substring containment between the column name and a label.
///
/// Score is `0.6 + 0.3 * shorter/longer`, so near-complete containment
/// scores close to 0.9.
#[derive(Debug, Clone)]
pub struct PartialStringMatcher {
    gate: Gate,
}

impl PartialStringMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            gate: Gate::new(threshold),
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }

    fn score(column: &str, label: &str) -> Option<f64> {
        if column.len() < PARTIAL_MIN_LEN || label.len() < PARTIAL_MIN_LEN {
            return None;
        }
        if !(column.contains(label) || label.contains(column)) {
            return None;
        }
        let (short, long) = if column.len() <= label.len() {
            (column.len(), label.len())
        } else {
            (label.len(), column.len())
        };
        Some(0.6 + 0.3 * (short as f64 / long as f64))
    }
}

impl Default for PartialStringMatcher {
    fn default() -> Self {
        Self::new(0.60)
    }
}

impl Matcher for PartialStringMatcher {
    fn name(&self) -> &str {
        "PartialStringMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::Low
    }

    fn enabled(&self) -> bool {
        self.gate.enabled
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
        let wanted = compact(&crate::utils::normalize_text(&column.name));
        let mut best = Best::new();
        for &property in properties {
            for (label, normalized) in searchable_labels(property) {
                if let Some(score) = Self::score(&wanted, &compact(&normalized)) {
                    best.offer(property, score, || format!("partial: {label}"));
                }
            }
        }
        Ok(best.into_result(&self.gate, MatchType::Partial, self.name()))
    }
}

/// Normalized Levenshtein similarity against every label.
#[derive(Debug, Clone)]
pub struct FuzzyStringMatcher {
    gate: Gate,
}

impl FuzzyStringMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            gate: Gate::new(threshold),
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }
}

impl Default for FuzzyStringMatcher {
    fn default() -> Self {
        Self::new(0.40)
    }
}

impl Matcher for FuzzyStringMatcher {
    fn name(&self) -> &str {
        "FuzzyStringMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::Low
    }

    fn enabled(&self) -> bool {
        self.gate.enabled
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
        let wanted = crate::utils::normalize_text(&column.name);
        if wanted.is_empty() {
            return Ok(None);
        }
        let mut best = Best::new();
        for &property in properties {
            for (label, normalized) in searchable_labels(property) {
                let score = levenshtein::normalized_similarity(wanted.chars(), normalized.chars());
                best.offer(property, score, || format!("fuzzy: {label} ({score:.2})"));
            }
        }
        Ok(best.into_result(&self.gate, MatchType::Fuzzy, self.name()))
    }
}
