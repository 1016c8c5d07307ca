//! Match history store and the matcher that replays it.
//!
//! The history is a single JSON file of confirmed column→property
//! decisions. Records are keyed by normalized column name and property
//! IRI; confirming the same pair again bumps its counter.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rapidfuzz::distance::jaro_winkler;
use rdfmap_model::{ColumnAnalysis, OntologyProperty};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HistoryError, MatcherError};
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::normalize_text;

/// Minimum Jaro-Winkler similarity between column names to reuse a decision.
pub const HISTORY_NAME_SIMILARITY: f64 = 0.85;

/// One confirmed decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub column_name: String,
    pub property_uri: String,
    pub match_type: MatchType,
    pub confidence: f64,
    #[serde(default = "default_times")]
    pub times_confirmed: u32,
    /// RFC 3339 timestamp of the latest confirmation.
    pub recorded_at: String,
}

fn default_times() -> u32 {
    1
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    records: Vec<HistoryRecord>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Previously confirmed matches, optionally backed by a file.
#[derive(Debug, Clone, Default)]
pub struct MatchHistory {
    path: Option<PathBuf>,
    records: Vec<HistoryRecord>,
}

impl MatchHistory {
    /// Empty in-memory history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a history file. A missing file yields an empty history bound to `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path: Some(path),
                records: Vec::new(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|source| HistoryError::Read {
            path: path.clone(),
            source,
        })?;
        let file: HistoryFile =
            serde_json::from_str(&content).map_err(|source| HistoryError::Parse {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path: Some(path),
            records: file.records,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records a confirmed decision, merging with an existing identical pair.
    pub fn record(
        &mut self,
        column_name: &str,
        property_uri: &str,
        match_type: MatchType,
        confidence: f64,
    ) {
        let key = normalize_text(column_name);
        let now = chrono::Utc::now().to_rfc3339();
        if let Some(existing) = self
            .records
            .iter_mut()
            .find(|r| normalize_text(&r.column_name) == key && r.property_uri == property_uri)
        {
            existing.times_confirmed = existing.times_confirmed.saturating_add(1);
            existing.confidence = existing.confidence.max(confidence);
            existing.match_type = match_type;
            existing.recorded_at = now;
            return;
        }
        self.records.push(HistoryRecord {
            column_name: column_name.to_string(),
            property_uri: property_uri.to_string(),
            match_type,
            confidence: confidence.clamp(0.0, 1.0),
            times_confirmed: 1,
            recorded_at: now,
        });
    }

    /// Records whose column name resembles `column_name`, most similar first.
    pub fn find_similar(&self, column_name: &str, min_similarity: f64) -> Vec<(&HistoryRecord, f64)> {
        let wanted = normalize_text(column_name);
        let mut hits: Vec<(&HistoryRecord, f64)> = self
            .records
            .iter()
            .map(|record| {
                let seen = normalize_text(&record.column_name);
                let sim = jaro_winkler::similarity(wanted.chars(), seen.chars());
                (record, sim)
            })
            .filter(|(_, sim)| *sim >= min_similarity)
            .collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits
    }

    /// Writes the history back to the file it was loaded from.
    pub fn save(&self) -> Result<(), HistoryError> {
        match self.path.as_deref() {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), HistoryError> {
        let file = HistoryFile {
            version: default_version(),
            records: self.records.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(HistoryError::Serialize)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| HistoryError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| HistoryError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), records = self.records.len(), "saved match history");
        Ok(())
    }
}

/// Replays confirmed decisions for similarly named columns.
///
/// Score is name similarity times the recorded confidence; only properties
/// among the current candidates are considered.
#[derive(Debug, Clone)]
pub struct HistoryAwareMatcher {
    gate: Gate,
    history: Option<Arc<MatchHistory>>,
}

impl HistoryAwareMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            gate: Gate::new(threshold),
            history: None,
        }
    }

    #[must_use]
    pub fn with_history(mut self, history: Arc<MatchHistory>) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }
}

impl Default for HistoryAwareMatcher {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl Matcher for HistoryAwareMatcher {
    fn name(&self) -> &str {
        "HistoryAwareMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::Medium
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
        let Some(history) = self.history.as_deref() else {
            return Ok(None);
        };
        let mut best = Best::new();
        for (record, similarity) in history.find_similar(&column.name, HISTORY_NAME_SIMILARITY) {
            let Some(&property) = properties.iter().find(|p| p.uri == record.property_uri) else {
                continue;
            };
            let score = similarity * record.confidence;
            best.offer(property, score, || {
                format!(
                    "history: '{}' confirmed {}x ({similarity:.2} name similarity)",
                    record.column_name, record.times_confirmed
                )
            });
        }
        Ok(best.into_result(&self.gate, MatchType::HistoryAware, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_confirmation_merges() {
        let mut history = MatchHistory::new();
        history.record("Emp Name", "http://ex.org/name", MatchType::Fuzzy, 0.7);
        history.record("emp_name", "http://ex.org/name", MatchType::ExactLabel, 0.95);
        assert_eq!(history.len(), 1);
        let record = &history.records()[0];
        assert_eq!(record.times_confirmed, 2);
        assert_eq!(record.confidence, 0.95);
    }

    #[test]
    fn matcher_only_proposes_current_candidates() {
        let mut history = MatchHistory::new();
        history.record("employee_name", "http://ex.org/fullName", MatchType::Fuzzy, 0.9);
        history.record("employee_name", "http://ex.org/gone", MatchType::Fuzzy, 1.0);
        let prop = OntologyProperty::new("http://ex.org/fullName");
        let matcher = HistoryAwareMatcher::default().with_history(Arc::new(history));

        let result = matcher
            .match_column(
                &ColumnAnalysis::new("employee name"),
                &[&prop],
                &MatchContext::default(),
            )
            .unwrap()
            .expect("history match");
        assert_eq!(result.property.uri, "http://ex.org/fullName");
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn without_history_the_matcher_is_silent() {
        let prop = OntologyProperty::new("http://ex.org/fullName");
        let result = HistoryAwareMatcher::default()
            .match_column(&ColumnAnalysis::new("x"), &[&prop], &MatchContext::default())
            .unwrap();
        assert!(result.is_none());
    }
}
