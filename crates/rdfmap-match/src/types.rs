//! Match results and cross-column state.

use std::fmt;

use indexmap::IndexMap;
use rdfmap_model::OntologyProperty;
use serde::{Deserialize, Serialize};

/// Which heuristic produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    ExactPrefLabel,
    ExactLabel,
    ExactAltLabel,
    ExactHiddenLabel,
    ExactLocalName,
    Partial,
    Fuzzy,
    SemanticSimilarity,
    DatatypeInference,
    HistoryAware,
    Structural,
    GraphReasoning,
    Hierarchy,
    OwlCharacteristics,
    RestrictionBased,
    SkosRelations,
}

impl MatchType {
    pub const ALL: [MatchType; 16] = [
        MatchType::ExactPrefLabel,
        MatchType::ExactLabel,
        MatchType::ExactAltLabel,
        MatchType::ExactHiddenLabel,
        MatchType::ExactLocalName,
        MatchType::Partial,
        MatchType::Fuzzy,
        MatchType::SemanticSimilarity,
        MatchType::DatatypeInference,
        MatchType::HistoryAware,
        MatchType::Structural,
        MatchType::GraphReasoning,
        MatchType::Hierarchy,
        MatchType::OwlCharacteristics,
        MatchType::RestrictionBased,
        MatchType::SkosRelations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::ExactPrefLabel => "exact-pref-label",
            MatchType::ExactLabel => "exact-label",
            MatchType::ExactAltLabel => "exact-alt-label",
            MatchType::ExactHiddenLabel => "exact-hidden-label",
            MatchType::ExactLocalName => "exact-local-name",
            MatchType::Partial => "partial",
            MatchType::Fuzzy => "fuzzy",
            MatchType::SemanticSimilarity => "semantic-similarity",
            MatchType::DatatypeInference => "datatype-inference",
            MatchType::HistoryAware => "history-aware",
            MatchType::Structural => "structural",
            MatchType::GraphReasoning => "graph-reasoning",
            MatchType::Hierarchy => "hierarchy",
            MatchType::OwlCharacteristics => "owl-characteristics",
            MatchType::RestrictionBased => "restriction-based",
            MatchType::SkosRelations => "skos-relations",
        }
    }

    /// True for the five exact-label variants.
    pub fn is_exact(&self) -> bool {
        matches!(
            self,
            MatchType::ExactPrefLabel
                | MatchType::ExactLabel
                | MatchType::ExactAltLabel
                | MatchType::ExactHiddenLabel
                | MatchType::ExactLocalName
        )
    }

    /// True for matchers that read the ontology graph or its axioms.
    pub fn is_ontology_structure(&self) -> bool {
        matches!(
            self,
            MatchType::Hierarchy
                | MatchType::OwlCharacteristics
                | MatchType::RestrictionBased
                | MatchType::SkosRelations
                | MatchType::GraphReasoning
        )
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse trust tier of a matcher. Only a hint; pipeline order decides ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPriority {
    Low,
    Medium,
    High,
}

impl fmt::Display for MatchPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MatchPriority::High => "high",
            MatchPriority::Medium => "medium",
            MatchPriority::Low => "low",
        };
        f.write_str(text)
    }
}

/// A candidate decision produced by one matcher for one column.
#[derive(Debug, Clone)]
pub struct MatchResult<'p> {
    pub property: &'p OntologyProperty,
    pub match_type: MatchType,
    /// Score reported by the matcher, kept after calibration.
    pub confidence: f64,
    /// Score after calibration, when a calibrator ran.
    pub calibrated_confidence: Option<f64>,
    pub matched_via: String,
    pub matcher_name: String,
}

impl<'p> MatchResult<'p> {
    pub fn new(
        property: &'p OntologyProperty,
        match_type: MatchType,
        confidence: f64,
        matched_via: impl Into<String>,
        matcher_name: impl Into<String>,
    ) -> Self {
        Self {
            property,
            match_type,
            confidence: confidence.clamp(0.0, 1.0),
            calibrated_confidence: None,
            matched_via: matched_via.into(),
            matcher_name: matcher_name.into(),
        }
    }

    /// Calibrated score if present, raw score otherwise.
    pub fn effective_confidence(&self) -> f64 {
        self.calibrated_confidence.unwrap_or(self.confidence)
    }
}

/// A property already matched to an earlier column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedProperty {
    pub uri: String,
    pub domain: Option<String>,
}

/// Cross-column state for one sheet-mapping generation.
///
/// Matched columns are kept in the order they were recorded, which is the
/// data source's declared column order when driven by the generator.
#[derive(Debug, Clone, Default)]
pub struct MatchContext {
    columns: Vec<String>,
    matched: IndexMap<String, MatchedProperty>,
}

impl MatchContext {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            matched: IndexMap::new(),
        }
    }

    /// Every column of the table, in declared order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn record(&mut self, column: impl Into<String>, property: &OntologyProperty) {
        self.matched.insert(
            column.into(),
            MatchedProperty {
                uri: property.uri.clone(),
                domain: property.domain.clone(),
            },
        );
    }

    pub fn matched(&self) -> &IndexMap<String, MatchedProperty> {
        &self.matched
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    /// True if some column already claimed `uri`.
    pub fn is_property_matched(&self, uri: &str) -> bool {
        self.matched.values().any(|m| m.uri == uri)
    }

    /// Number of distinct matched properties whose domain is `domain`.
    pub fn domain_count(&self, domain: &str) -> usize {
        let mut uris: Vec<&str> = self
            .matched
            .values()
            .filter(|m| m.domain.as_deref() == Some(domain))
            .map(|m| m.uri.as_str())
            .collect();
        uris.sort_unstable();
        uris.dedup();
        uris.len()
    }
}

/// Everything the pipeline learned about one column.
#[derive(Debug, Clone)]
pub struct ColumnMatch<'p> {
    pub column: String,
    /// Every candidate, in pipeline order.
    pub candidates: Vec<MatchResult<'p>>,
    best: Option<usize>,
    accepted: bool,
}

impl<'p> ColumnMatch<'p> {
    pub(crate) fn new(
        column: impl Into<String>,
        candidates: Vec<MatchResult<'p>>,
        best: Option<usize>,
        accepted: bool,
    ) -> Self {
        Self {
            column: column.into(),
            candidates,
            best,
            accepted: accepted && best.is_some(),
        }
    }

    pub fn empty(column: impl Into<String>) -> Self {
        Self::new(column, Vec::new(), None, false)
    }

    /// The accepted winner, if any.
    pub fn winner(&self) -> Option<&MatchResult<'p>> {
        if self.accepted {
            self.best_candidate()
        } else {
            None
        }
    }

    /// Highest scoring candidate whether or not it cleared the threshold.
    pub fn best_candidate(&self) -> Option<&MatchResult<'p>> {
        self.best.and_then(|idx| self.candidates.get(idx))
    }

    pub fn into_winner(mut self) -> Option<MatchResult<'p>> {
        match (self.accepted, self.best) {
            (true, Some(idx)) => Some(self.candidates.swap_remove(idx)),
            _ => None,
        }
    }

    /// A candidate existed but scored below the pipeline minimum.
    pub fn was_rejected(&self) -> bool {
        !self.accepted && self.best.is_some()
    }
}
