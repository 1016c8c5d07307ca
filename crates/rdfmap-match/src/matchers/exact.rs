//! Exact label matchers.

use rdfmap_model::{ColumnAnalysis, OntologyProperty};

use crate::error::MatcherError;
use crate::matcher::{Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::squash;

/// Which label an [`ExactLabelMatcher`] compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    PrefLabel,
    RdfsLabel,
    AltLabel,
    HiddenLabel,
    LocalName,
}

impl LabelKind {
    /// Fixed confidence, strictly decreasing with trust.
    pub fn confidence(&self) -> f64 {
        match self {
            LabelKind::PrefLabel => 1.0,
            LabelKind::RdfsLabel => 0.95,
            LabelKind::AltLabel => 0.90,
            LabelKind::HiddenLabel => 0.85,
            LabelKind::LocalName => 0.80,
        }
    }

    pub fn match_type(&self) -> MatchType {
        match self {
            LabelKind::PrefLabel => MatchType::ExactPrefLabel,
            LabelKind::RdfsLabel => MatchType::ExactLabel,
            LabelKind::AltLabel => MatchType::ExactAltLabel,
            LabelKind::HiddenLabel => MatchType::ExactHiddenLabel,
            LabelKind::LocalName => MatchType::ExactLocalName,
        }
    }

    fn matcher_name(&self) -> &'static str {
        match self {
            LabelKind::PrefLabel => "ExactPrefLabelMatcher",
            LabelKind::RdfsLabel => "ExactRdfsLabelMatcher",
            LabelKind::AltLabel => "ExactAltLabelMatcher",
            LabelKind::HiddenLabel => "ExactHiddenLabelMatcher",
            LabelKind::LocalName => "ExactLocalNameMatcher",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            LabelKind::PrefLabel => "skos:prefLabel",
            LabelKind::RdfsLabel => "rdfs:label",
            LabelKind::AltLabel => "skos:altLabel",
            LabelKind::HiddenLabel => "skos:hiddenLabel",
            LabelKind::LocalName => "local name",
        }
    }

    fn labels<'a>(&self, property: &'a OntologyProperty) -> Vec<&'a str> {
        match self {
            LabelKind::PrefLabel => property.pref_label.as_deref().into_iter().collect(),
            LabelKind::RdfsLabel => property.label.as_deref().into_iter().collect(),
            LabelKind::AltLabel => property.alt_labels.iter().map(String::as_str).collect(),
            LabelKind::HiddenLabel => property.hidden_labels.iter().map(String::as_str).collect(),
            LabelKind::LocalName => vec![property.local_name()],
        }
    }
}

/// Case- and whitespace-insensitive equality against one label kind.
#[derive(Debug, Clone)]
pub struct ExactLabelMatcher {
    kind: LabelKind,
    gate: Gate,
}

impl ExactLabelMatcher {
    pub fn new(kind: LabelKind) -> Self {
        Self {
            kind,
            gate: Gate::new(kind.confidence()),
        }
    }

    pub fn pref_label() -> Self {
        Self::new(LabelKind::PrefLabel)
    }

    pub fn rdfs_label() -> Self {
        Self::new(LabelKind::RdfsLabel)
    }

    pub fn alt_label() -> Self {
        Self::new(LabelKind::AltLabel)
    }

    pub fn hidden_label() -> Self {
        Self::new(LabelKind::HiddenLabel)
    }

    pub fn local_name() -> Self {
        Self::new(LabelKind::LocalName)
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }

    pub fn kind(&self) -> LabelKind {
        self.kind
    }
}

impl Matcher for ExactLabelMatcher {
    fn name(&self) -> &str {
        self.kind.matcher_name()
    }

    fn priority(&self) -> MatchPriority {
        match self.kind {
            LabelKind::LocalName => MatchPriority::Medium,
            _ => MatchPriority::High,
        }
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
        let wanted = squash(&column.name);
        if wanted.is_empty() || !self.gate.enabled {
            return Ok(None);
        }
        for &property in properties {
            if let Some(label) = self
                .kind
                .labels(property)
                .into_iter()
                .find(|label| squash(label) == wanted)
            {
                return Ok(Some(MatchResult::new(
                    property,
                    self.kind.match_type(),
                    self.kind.confidence(),
                    format!("{}: {label}", self.kind.describe()),
                    self.name(),
                )));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn column(name: &str) -> ColumnAnalysis {
        ColumnAnalysis::new(name)
    }

    #[test]
    fn pref_label_ignores_case_and_separators() {
        let prop = OntologyProperty::new("http://ex.org/firstName").with_pref_label("First Name");
        let matcher = ExactLabelMatcher::pref_label();
        let ctx = MatchContext::default();
        for name in ["First_Name", "first name", "FIRSTNAME"] {
            let result = matcher
                .match_column(&column(name), &[&prop], &ctx)
                .unwrap()
                .expect("match");
            assert_eq!(result.match_type, MatchType::ExactPrefLabel);
            assert_eq!(result.confidence, 1.0);
        }
    }

    #[test]
    fn local_name_matcher_uses_iri_suffix() {
        let prop = OntologyProperty::new("http://ex.org/hr#emp_code");
        let result = ExactLabelMatcher::local_name()
            .match_column(&column("EMP CODE"), &[&prop], &MatchContext::default())
            .unwrap()
            .expect("match");
        assert_eq!(result.confidence, 0.80);
        assert_eq!(result.matcher_name, "ExactLocalNameMatcher");
    }

    #[test]
    fn confidences_strictly_decrease() {
        let kinds = [
            LabelKind::PrefLabel,
            LabelKind::RdfsLabel,
            LabelKind::AltLabel,
            LabelKind::HiddenLabel,
            LabelKind::LocalName,
        ];
        for pair in kinds.windows(2) {
            assert!(pair[0].confidence() > pair[1].confidence());
        }
    }

    proptest! {
        #[test]
        fn separators_and_case_never_change_the_outcome(words in prop::collection::vec("[a-z]{1,6}", 1..4)) {
            let label = words.join(" ");
            let snake = words.join("_").to_uppercase();
            let prop = OntologyProperty::new("http://ex.org/p").with_label(label.clone());
            let ctx = MatchContext::default();
            let matcher = ExactLabelMatcher::rdfs_label();
            let a = matcher.match_column(&column(&label), &[&prop], &ctx).unwrap();
            let b = matcher.match_column(&column(&snake), &[&prop], &ctx).unwrap();
            prop_assert!(a.is_some());
            prop_assert!(b.is_some());
        }
    }
}
