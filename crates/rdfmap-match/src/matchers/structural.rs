//! Identifier and foreign-key naming patterns.

use rapidfuzz::distance::jaro_winkler;
use rdfmap_model::{ColumnAnalysis, OntologyProperty};

use super::searchable_labels;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::split_identifier;

const ID_TOKENS: &[&str] = &[
    "id",
    "identifier",
    "ref",
    "reference",
    "key",
    "code",
    "no",
    "number",
    "num",
];

const UNIQUE_RATIO_MIN: f64 = 0.95;
const UNIQUE_BONUS: f64 = 0.1;
const SIBLING_BONUS: f64 = 0.05;

/// Splits `dept_id` into (`dept`, `id`). Returns `None` without an identifier suffix.
pub fn identifier_stem(normalized: &str) -> Option<(String, &str)> {
    let mut words: Vec<&str> = normalized.split_whitespace().collect();
    let last = *words.last()?;
    if words.len() < 2 || !ID_TOKENS.contains(&last) {
        return None;
    }
    words.pop();
    Some((words.join(" "), last))
}

fn strip_id_tokens(normalized: &str) -> (String, bool) {
    let mut had = false;
    let kept: Vec<&str> = normalized
        .split_whitespace()
        .filter(|word| {
            let id = ID_TOKENS.contains(word);
            had |= id;
            !id
        })
        .collect();
    (kept.join(" "), had)
}

/// Matches `*_id`/`*_ref`/`*_key`/`*_code`/`*_no` columns to identifying properties.
///
/// A property is identifying when one of its labels carries an identifier
/// word or it is declared inverse-functional. Unique column values and a
/// sibling column sharing the stem (`dept_id` next to `dept_name`) add small
/// bonuses.
#[derive(Debug, Clone)]
pub struct StructuralMatcher {
    gate: Gate,
}

impl StructuralMatcher {
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

impl Default for StructuralMatcher {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Matcher for StructuralMatcher {
    fn name(&self) -> &str {
        "StructuralMatcher"
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
        context: &MatchContext,
    ) -> Result<Option<MatchResult<'p>>, MatcherError> {
        let name = split_identifier(&column.name);
        let Some((stem, suffix)) = identifier_stem(&name) else {
            return Ok(None);
        };
        let has_sibling = context.columns().iter().any(|other| {
            *other != column.name && {
                let other = split_identifier(other);
                other.starts_with(&stem) && identifier_stem(&other).is_none()
            }
        });

        let mut best = Best::new();
        for &property in properties {
            for (label, normalized) in searchable_labels(property) {
                let (label_stem, label_has_id) = strip_id_tokens(&normalized);
                if !(label_has_id || property.inverse_functional) || label_stem.is_empty() {
                    continue;
                }
                let similarity = if label_stem.starts_with(&stem) {
                    jaro_winkler::similarity(stem.chars(), label_stem.chars()).max(0.9)
                } else {
                    jaro_winkler::similarity(stem.chars(), label_stem.chars())
                };
                let mut score = similarity * 0.85;
                if property.inverse_functional && column.unique_ratio >= UNIQUE_RATIO_MIN {
                    score += UNIQUE_BONUS;
                }
                if has_sibling {
                    score += SIBLING_BONUS;
                }
                let score = score.min(1.0);
                best.offer(property, score, || {
                    format!("structural: {stem}_{suffix} resembles identifier '{label}'")
                });
            }
        }
        Ok(best.into_result(&self.gate, MatchType::Structural, self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_require_identifier_suffix() {
        assert_eq!(
            identifier_stem("dept id"),
            Some(("dept".to_string(), "id"))
        );
        assert!(identifier_stem("id").is_none());
        assert!(identifier_stem("dept name").is_none());
    }

    #[test]
    fn abbreviated_stem_finds_identifier_property() {
        let prop = OntologyProperty::new("http://ex.org/departmentCode").with_label("department code");
        let other = OntologyProperty::new("http://ex.org/departmentName").with_label("department name");
        let ctx = MatchContext::new(["dept_code", "dept_name"]);
        let result = StructuralMatcher::default()
            .match_column(&ColumnAnalysis::new("dept_code"), &[&other, &prop], &ctx)
            .unwrap()
            .expect("structural match");
        assert_eq!(result.property.uri, "http://ex.org/departmentCode");
        assert!(result.confidence > 0.75);
        assert!(result.matched_via.contains("dept_code"));
    }

    #[test]
    fn non_identifier_columns_are_ignored() {
        let prop = OntologyProperty::new("http://ex.org/x").with_label("x id");
        let result = StructuralMatcher::default()
            .match_column(&ColumnAnalysis::new("salary"), &[&prop], &MatchContext::default())
            .unwrap();
        assert!(result.is_none());
    }
}
