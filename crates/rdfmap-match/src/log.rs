//! Audit trail of every candidate the pipeline considered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ColumnMatch, MatchType};

/// One candidate as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLogEntry {
    pub column: String,
    pub matcher: String,
    pub property_uri: String,
    pub match_type: MatchType,
    pub confidence: f64,
    pub calibrated_confidence: Option<f64>,
    pub matched_via: String,
    /// True for the accepted winner of the column.
    pub selected: bool,
}

/// Collected [`MatchLogEntry`] values for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingLog {
    entries: Vec<MatchLogEntry>,
}

impl MatchingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &ColumnMatch<'_>) {
        let winner = outcome.winner().map(|w| (w.matcher_name.as_str(), w.property.uri.as_str()));
        for candidate in &outcome.candidates {
            let selected = winner == Some((candidate.matcher_name.as_str(), candidate.property.uri.as_str()));
            debug!(
                column = %outcome.column,
                matcher = %candidate.matcher_name,
                property = %candidate.property.uri,
                confidence = candidate.confidence,
                calibrated = ?candidate.calibrated_confidence,
                selected,
                "candidate"
            );
            self.entries.push(MatchLogEntry {
                column: outcome.column.clone(),
                matcher: candidate.matcher_name.clone(),
                property_uri: candidate.property.uri.clone(),
                match_type: candidate.match_type,
                confidence: candidate.confidence,
                calibrated_confidence: candidate.calibrated_confidence,
                matched_via: candidate.matched_via.clone(),
                selected,
            });
        }
    }

    pub fn entries(&self) -> &[MatchLogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of accepted winners per matcher.
    pub fn wins_by_matcher(&self) -> BTreeMap<String, usize> {
        let mut wins = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.selected) {
            *wins.entry(entry.matcher.clone()).or_insert(0) += 1;
        }
        wins
    }
}
