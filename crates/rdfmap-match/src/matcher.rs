//! The matcher capability shared by every heuristic.

use rdfmap_model::{ColumnAnalysis, OntologyProperty};

use crate::error::MatcherError;
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};

/// One column→property matching strategy.
///
/// `Ok(None)` is the normal "nothing found" outcome. Errors are local
/// failures; the pipeline logs them and moves on to the next matcher.
pub trait Matcher: Send + Sync {
    /// Stable identifier used in reports and logs.
    fn name(&self) -> &str;

    fn priority(&self) -> MatchPriority;

    fn enabled(&self) -> bool;

    /// Minimum score this matcher will report.
    fn threshold(&self) -> f64;

    fn match_column<'p>(
        &self,
        column: &ColumnAnalysis,
        properties: &[&'p OntologyProperty],
        context: &MatchContext,
    ) -> Result<Option<MatchResult<'p>>, MatcherError>;
}

/// Shared `enabled`/`threshold` pair carried by every matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    pub enabled: bool,
    pub threshold: f64,
}

impl Gate {
    pub fn new(threshold: f64) -> Self {
        Self {
            enabled: true,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// True when `score` may be reported.
    pub fn admits(&self, score: f64) -> bool {
        self.enabled && score >= self.threshold
    }
}

/// Keeps the highest score, first wins on ties.
pub(crate) struct Best<'p> {
    pub property: Option<&'p OntologyProperty>,
    pub score: f64,
    pub via: String,
}

impl<'p> Best<'p> {
    pub fn new() -> Self {
        Self {
            property: None,
            score: 0.0,
            via: String::new(),
        }
    }

    pub fn offer(&mut self, property: &'p OntologyProperty, score: f64, via: impl FnOnce() -> String) {
        if self.property.is_none() || score > self.score {
            self.property = Some(property);
            self.score = score;
            self.via = via();
        }
    }

    pub fn into_result(
        self,
        gate: &Gate,
        match_type: MatchType,
        matcher: &str,
    ) -> Option<MatchResult<'p>> {
        let property = self.property?;
        gate.admits(self.score)
            .then(|| MatchResult::new(property, match_type, self.score, self.via, matcher))
    }
}
