//! Semantic similarity with abbreviation expansion and context boosts.

use std::sync::Arc;

use rdfmap_model::{ColumnAnalysis, OntologyProperty};
use tracing::debug;

use super::embedding::{EmbeddingHandle, cosine_similarity};
use crate::error::MatcherError;
use crate::matcher::{Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::{jaccard, normalize_text, split_identifier, tokens};

/// Common column-name shorthands and what they stand for.
///
/// Only the first entry found in a column name is expanded.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("fname", "first name"),
    ("lname", "last name"),
    ("mname", "middle name"),
    ("middle initial", "middle name"),
    ("dob", "birth date"),
    ("birth city", "birth place"),
    ("email address", "email"),
    ("phone", "phone number"),
    ("postal code", "zip code"),
    ("zipcode", "zip code"),
    ("city name", "city"),
    ("address", "street address"),
];

const SUBSTRING_SCORE: f64 = 0.8;
const OVERLAP_SCALE: f64 = 0.7;
const MIN_CONTAINED_LABEL: usize = 3;

/// Expands the first known abbreviation appearing as whole words.
pub fn expand_abbreviations(normalized: &str) -> String {
    let padded = format!(" {normalized} ");
    for (short, long) in ABBREVIATIONS {
        let needle = format!(" {short} ");
        if padded.contains(&needle) {
            return padded.replacen(&needle, &format!(" {long} "), 1).trim().to_string();
        }
    }
    normalized.to_string()
}

/// Lexical similarity between a column and a property.
///
/// Equality with the combined property text or any single label is 1.0,
/// containment is 0.8, otherwise word overlap scaled by 0.7.
pub fn lexical_score(column: &str, expanded: &str, property: &OntologyProperty) -> f64 {
    let labels: Vec<String> = property
        .all_labels()
        .into_iter()
        .map(normalize_text)
        .chain(std::iter::once(split_identifier(property.local_name())))
        .filter(|label| !label.is_empty())
        .collect();
    let text = property_text(property);

    let equals = |candidate: &str| candidate == expanded || candidate == column;
    if equals(text.as_str()) || labels.iter().any(|label| equals(label.as_str())) {
        return 1.0;
    }
    if (!expanded.is_empty() && text.contains(expanded))
        || labels
            .iter()
            .any(|label| label.len() >= MIN_CONTAINED_LABEL && column.contains(label.as_str()))
    {
        return SUBSTRING_SCORE;
    }
    jaccard(&tokens(expanded), &tokens(&text)) * OVERLAP_SCALE
}

/// Labels, comment and split local name as one normalized string.
pub fn property_text(property: &OntologyProperty) -> String {
    let mut parts: Vec<String> = property
        .all_labels()
        .into_iter()
        .map(normalize_text)
        .collect();
    if let Some(comment) = property.comment.as_deref() {
        parts.push(normalize_text(comment));
    }
    parts.push(split_identifier(property.local_name()));
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Embedding-or-lexical similarity, boosted by already matched siblings.
#[derive(Debug, Clone)]
pub struct SemanticSimilarityMatcher {
    gate: Gate,
    embeddings: Option<Arc<EmbeddingHandle>>,
    domain_boost: f64,
    cooccurrence_boost: f64,
}

impl SemanticSimilarityMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            gate: Gate::new(threshold),
            embeddings: None,
            domain_boost: 0.1,
            cooccurrence_boost: 0.05,
        }
    }

    #[must_use]
    pub fn with_embeddings(mut self, handle: Arc<EmbeddingHandle>) -> Self {
        self.embeddings = Some(handle);
        self
    }

    #[must_use]
    pub fn with_boosts(mut self, domain_boost: f64, cooccurrence_boost: f64) -> Self {
        self.domain_boost = domain_boost.max(0.0);
        self.cooccurrence_boost = cooccurrence_boost.max(0.0);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }

    fn base_score(&self, column: &str, expanded: &str, property: &OntologyProperty) -> f64 {
        let lexical = lexical_score(column, expanded, property);
        if lexical >= 1.0 {
            return lexical;
        }
        let Some(model) = self.embeddings.as_ref().and_then(|h| h.get()) else {
            return lexical;
        };
        let embedded = model
            .embed(expanded)
            .and_then(|a| model.embed(&property_text(property)).map(|b| (a, b)));
        match embedded {
            Ok((a, b)) => lexical.max(cosine_similarity(&a, &b)),
            Err(error) => {
                debug!(%error, property = %property.uri, "embedding failed, using lexical score");
                lexical
            }
        }
    }

    fn boosted(&self, base: f64, property: &OntologyProperty, context: &MatchContext) -> f64 {
        let Some(domain) = property.domain.as_deref() else {
            return base;
        };
        if base <= 0.0 {
            return base;
        }
        if context.domain_count(domain) == 0 {
            return base;
        }
        let score = (base + self.domain_boost).min(1.0);
        (score + self.cooccurrence_boost).min(1.0)
    }
}

impl Default for SemanticSimilarityMatcher {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl Matcher for SemanticSimilarityMatcher {
    fn name(&self) -> &str {
        "SemanticSimilarityMatcher"
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
        if name.is_empty() {
            return Ok(None);
        }
        let expanded = expand_abbreviations(&name);

        let mut best: Option<(&'p OntologyProperty, f64, f64)> = None;
        for &property in properties {
            let base = self.base_score(&name, &expanded, property);
            let score = self.boosted(base, property, context);
            if best.is_none_or(|(_, top, _)| score > top) {
                best = Some((property, score, base));
            }
        }

        let Some((property, score, base)) = best else {
            return Ok(None);
        };
        if !self.gate.admits(score) {
            return Ok(None);
        }
        let via = if (score - base).abs() > 0.01 {
            format!("semantic similarity {base:.3} boosted to {score:.3} by matched siblings")
        } else {
            format!("semantic similarity {score:.3}")
        };
        Ok(Some(MatchResult::new(
            property,
            MatchType::SemanticSimilarity,
            score,
            via,
            self.name(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: &str = "http://ex.org/Person";

    #[test]
    fn dob_expands_to_birth_date() {
        assert_eq!(expand_abbreviations("dob"), "birth date");
        assert_eq!(expand_abbreviations("adobe"), "adobe");
        let prop = OntologyProperty::new("http://ex.org/born").with_label("birth date");
        let result = SemanticSimilarityMatcher::default()
            .match_column(&ColumnAnalysis::new("DOB"), &[&prop], &MatchContext::default())
            .unwrap()
            .expect("semantic match");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.match_type, MatchType::SemanticSimilarity);
    }

    #[test]
    fn substring_scores_point_eight() {
        let prop = OntologyProperty::new("http://ex.org/hireDate")
            .with_label("hire date")
            .with_comment("date the employee was hired");
        let score = lexical_score("hire", "hire", &prop);
        assert_eq!(score, 0.8);
    }

    #[test]
    fn boosts_need_matched_siblings_and_saturate() {
        let matcher = SemanticSimilarityMatcher::default();
        let prop = OntologyProperty::new("http://ex.org/a").with_domain(P);
        let sibling = OntologyProperty::new("http://ex.org/b").with_domain(P);
        let other = OntologyProperty::new("http://ex.org/c").with_domain(P);
        let elsewhere = OntologyProperty::new("http://ex.org/d").with_domain("http://ex.org/Q");

        let mut ctx = MatchContext::default();
        assert_eq!(matcher.boosted(0.5, &prop, &ctx), 0.5);
        ctx.record("w", &elsewhere);
        assert_eq!(matcher.boosted(0.5, &prop, &ctx), 0.5);
        ctx.record("x", &sibling);
        assert!((matcher.boosted(0.5, &prop, &ctx) - 0.65).abs() < 1e-9);
        ctx.record("y", &other);
        assert!((matcher.boosted(0.5, &prop, &ctx) - 0.65).abs() < 1e-9);
        assert_eq!(matcher.boosted(0.97, &prop, &ctx), 1.0);
    }

    #[test]
    fn unavailable_embeddings_fall_back_to_lexical() {
        let handle = Arc::new(EmbeddingHandle::lazy(|| {
            Err(MatcherError::Unavailable {
                matcher: "test".to_string(),
                message: "offline".to_string(),
            })
        }));
        let prop = OntologyProperty::new("http://ex.org/email").with_label("email");
        let result = SemanticSimilarityMatcher::default()
            .with_embeddings(handle)
            .match_column(
                &ColumnAnalysis::new("Email Address"),
                &[&prop],
                &MatchContext::default(),
            )
            .unwrap()
            .expect("lexical match");
        assert_eq!(result.confidence, 1.0);
    }
}
