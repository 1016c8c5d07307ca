//! Class-hierarchy aware matching through a [`GraphReasoner`].

use std::sync::Arc;

use rdfmap_model::{ColumnAnalysis, GraphReasoner, OntologyProperty, local_name};

use super::property_signal;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::split_identifier;

const GRAPH_WEIGHT: f64 = 0.9;

/// Strips class words from a column name before comparing it to labels.
///
/// `employee_salary` against a property of `Employee` (or one of its
/// ancestors or descendants) becomes `salary`. Only fires when something
/// was actually stripped. No-op without a reasoner.
#[derive(Clone)]
pub struct GraphReasoningMatcher {
    gate: Gate,
    reasoner: Option<Arc<dyn GraphReasoner>>,
}

impl GraphReasoningMatcher {
    pub fn new(threshold: f64, reasoner: Option<Arc<dyn GraphReasoner>>) -> Self {
        Self {
            gate: Gate::new(threshold),
            reasoner,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }

    fn class_words(reasoner: &dyn GraphReasoner, class_uri: &str) -> Vec<String> {
        let mut classes = vec![class_uri.to_string()];
        classes.extend(reasoner.ancestors(class_uri));
        classes.extend(reasoner.descendants(class_uri));

        let mut words = Vec::new();
        for class in &classes {
            let label = reasoner
                .class_label(class)
                .unwrap_or_else(|| local_name(class).to_string());
            words.extend(split_identifier(&label).split_whitespace().map(str::to_string));
        }
        words.sort();
        words.dedup();
        words
    }
}

impl std::fmt::Debug for GraphReasoningMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphReasoningMatcher")
            .field("gate", &self.gate)
            .field("has_reasoner", &self.reasoner.is_some())
            .finish()
    }
}

impl Matcher for GraphReasoningMatcher {
    fn name(&self) -> &str {
        "GraphReasoningMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::Medium
    }

    fn enabled(&self) -> bool {
        self.gate.enabled && self.reasoner.is_some()
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
        let Some(reasoner) = self.reasoner.as_deref() else {
            return Ok(None);
        };
        let name = split_identifier(&column.name);
        let original: Vec<&str> = name.split_whitespace().collect();
        let mut best = Best::new();
        for &property in properties {
            let Some(domain) = property.domain.as_deref() else {
                continue;
            };
            let class_words = Self::class_words(reasoner, domain);
            let remainder: Vec<&str> = original
                .iter()
                .copied()
                .filter(|w| !class_words.iter().any(|c| c.as_str() == *w))
                .collect();
            if remainder.is_empty() || remainder.len() == original.len() {
                continue;
            }
            let remainder = remainder.join(" ");
            let (signal, label) = property_signal(&remainder, property);
            let score = signal * GRAPH_WEIGHT;
            best.offer(property, score, || {
                format!("graph: '{remainder}' after removing class words matches {label}")
            });
        }
        Ok(best.into_result(&self.gate, MatchType::GraphReasoning, self.name()))
    }
}
