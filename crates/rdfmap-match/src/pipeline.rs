//! Runs an ordered list of matchers and picks one winner per column.

use rdfmap_model::{ColumnAnalysis, OntologyProperty};
use tracing::{debug, warn};

use crate::calibration::ConfidenceCalibrator;
use crate::log::MatchingLog;
use crate::matcher::Matcher;
use crate::types::{ColumnMatch, MatchContext, MatchResult};

/// Default minimum effective confidence for accepting a winner.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// An explicit, ordered matcher pipeline.
///
/// Every enabled matcher runs for every column; there is no
/// short-circuiting. The winner is the candidate with the highest
/// effective confidence (calibrated when a calibrator is set), with ties
/// going to the earliest matcher. A winner below `min_confidence` leaves
/// the column unmapped.
pub struct MatcherPipeline {
    matchers: Vec<Box<dyn Matcher>>,
    calibrator: Option<ConfidenceCalibrator>,
    log: Option<MatchingLog>,
    min_confidence: f64,
}

impl MatcherPipeline {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self {
            matchers,
            calibrator: None,
            log: None,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    #[must_use]
    pub fn with_calibrator(mut self, calibrator: ConfidenceCalibrator) -> Self {
        self.calibrator = Some(calibrator);
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: MatchingLog) -> Self {
        self.log = Some(log);
        self
    }

    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    pub fn set_min_confidence(&mut self, min_confidence: f64) {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    pub fn matchers(&self) -> &[Box<dyn Matcher>] {
        &self.matchers
    }

    /// Names of the matchers that will actually run, in order.
    pub fn enabled_matcher_names(&self) -> Vec<&str> {
        self.matchers
            .iter()
            .filter(|m| m.enabled())
            .map(|m| m.name())
            .collect()
    }

    pub fn calibrator(&self) -> Option<&ConfidenceCalibrator> {
        self.calibrator.as_ref()
    }

    pub fn log(&self) -> Option<&MatchingLog> {
        self.log.as_ref()
    }

    pub fn take_log(&mut self) -> Option<MatchingLog> {
        self.log.take()
    }

    /// Installs `log`, replacing any current one.
    pub fn set_log(&mut self, log: MatchingLog) {
        self.log = Some(log);
    }

    /// Empties the current log, if logging is on.
    pub fn clear_log(&mut self) {
        if let Some(log) = self.log.as_mut() {
            *log = MatchingLog::new();
        }
    }

    /// Runs every enabled matcher over `properties` for one column.
    pub fn match_column<'p>(
        &mut self,
        column: &ColumnAnalysis,
        properties: &[&'p OntologyProperty],
        context: &MatchContext,
    ) -> ColumnMatch<'p> {
        if properties.is_empty() {
            debug!(column = %column.name, "no candidate properties");
            return ColumnMatch::empty(&column.name);
        }

        let mut candidates: Vec<MatchResult<'p>> = Vec::new();
        for matcher in self.matchers.iter().filter(|m| m.enabled()) {
            match matcher.match_column(column, properties, context) {
                Ok(Some(mut result)) => {
                    if let Some(calibrator) = &self.calibrator {
                        result.calibrated_confidence =
                            Some(calibrator.calibrate(result.match_type, result.confidence));
                    }
                    candidates.push(result);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        column = %column.name,
                        matcher = matcher.name(),
                        %error,
                        "matcher failed, skipping"
                    );
                }
            }
        }

        let mut best: Option<usize> = None;
        for (idx, candidate) in candidates.iter().enumerate() {
            let better = match best {
                None => true,
                Some(current) => {
                    candidate.effective_confidence() > candidates[current].effective_confidence()
                }
            };
            if better {
                best = Some(idx);
            }
        }
        let accepted = best.is_some_and(|idx| {
            candidates[idx].effective_confidence() >= self.min_confidence
        });

        let outcome = ColumnMatch::new(&column.name, candidates, best, accepted);
        if let Some(winner) = outcome.winner() {
            debug!(
                column = %column.name,
                property = %winner.property.uri,
                matcher = %winner.matcher_name,
                confidence = winner.effective_confidence(),
                "selected"
            );
        }
        if let Some(log) = self.log.as_mut() {
            log.record(&outcome);
        }
        outcome
    }

    /// Convenience wrapper returning only the accepted winner.
    pub fn find_best_match<'p>(
        &mut self,
        column: &ColumnAnalysis,
        properties: &[&'p OntologyProperty],
        context: &MatchContext,
    ) -> Option<MatchResult<'p>> {
        self.match_column(column, properties, context).into_winner()
    }
}

impl std::fmt::Debug for MatcherPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.matchers.iter().map(|m| m.name()).collect();
        f.debug_struct("MatcherPipeline")
            .field("matchers", &names)
            .field("calibrated", &self.calibrator.is_some())
            .field("logging", &self.log.is_some())
            .field("min_confidence", &self.min_confidence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatcherError;
    use crate::matchers::exact::ExactLabelMatcher;
    use crate::matchers::fuzzy::FuzzyStringMatcher;
    use crate::types::{MatchPriority, MatchType};

    struct Failing;

    impl Matcher for Failing {
        fn name(&self) -> &str {
            "Failing"
        }
        fn priority(&self) -> MatchPriority {
            MatchPriority::Low
        }
        fn enabled(&self) -> bool {
            true
        }
        fn threshold(&self) -> f64 {
            0.0
        }
        fn match_column<'p>(
            &self,
            _column: &ColumnAnalysis,
            _properties: &[&'p OntologyProperty],
            _context: &MatchContext,
        ) -> Result<Option<MatchResult<'p>>, MatcherError> {
            Err(MatcherError::Unavailable {
                matcher: "Failing".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    struct Fixed(&'static str, f64);

    impl Matcher for Fixed {
        fn name(&self) -> &str {
            self.0
        }
        fn priority(&self) -> MatchPriority {
            MatchPriority::Medium
        }
        fn enabled(&self) -> bool {
            true
        }
        fn threshold(&self) -> f64 {
            0.0
        }
        fn match_column<'p>(
            &self,
            _column: &ColumnAnalysis,
            properties: &[&'p OntologyProperty],
            _context: &MatchContext,
        ) -> Result<Option<MatchResult<'p>>, MatcherError> {
            Ok(properties
                .first()
                .map(|&p| MatchResult::new(p, MatchType::Structural, self.1, "fixed", self.0)))
        }
    }

    #[test]
    fn zero_properties_short_circuit() {
        let mut pipeline = MatcherPipeline::new(vec![Box::new(Failing)]);
        let outcome = pipeline.match_column(&ColumnAnalysis::new("x"), &[], &MatchContext::default());
        assert!(outcome.winner().is_none());
        assert!(outcome.candidates.is_empty());
        assert!(!outcome.was_rejected());
    }

    #[test]
    fn failures_are_skipped_and_ties_go_to_earliest() {
        let prop = OntologyProperty::new("http://ex.org/p");
        let mut pipeline = MatcherPipeline::new(vec![
            Box::new(Failing),
            Box::new(Fixed("first", 0.7)),
            Box::new(Fixed("second", 0.7)),
        ]);
        let outcome = pipeline.match_column(&ColumnAnalysis::new("x"), &[&prop], &MatchContext::default());
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.winner().map(|w| w.matcher_name.as_str()), Some("first"));
    }

    #[test]
    fn below_minimum_is_rejected_not_dropped() {
        let prop = OntologyProperty::new("http://ex.org/p");
        let mut pipeline =
            MatcherPipeline::new(vec![Box::new(Fixed("weak", 0.3))]).with_min_confidence(0.5);
        let outcome = pipeline.match_column(&ColumnAnalysis::new("x"), &[&prop], &MatchContext::default());
        assert!(outcome.winner().is_none());
        assert!(outcome.was_rejected());
        assert_eq!(outcome.best_candidate().map(|c| c.confidence), Some(0.3));
    }

    #[test]
    fn exact_pref_label_beats_fuzzy_in_any_property_order() {
        let pref = OntologyProperty::new("http://ex.org/firstName").with_pref_label("First Name");
        let near = OntologyProperty::new("http://ex.org/firstNames").with_label("first names");
        let column = ColumnAnalysis::new("first_name");
        for props in [[&pref, &near], [&near, &pref]] {
            let mut pipeline = MatcherPipeline::new(vec![
                Box::new(ExactLabelMatcher::pref_label()),
                Box::new(FuzzyStringMatcher::default()),
            ])
            .with_calibrator(ConfidenceCalibrator::default())
            .with_log(MatchingLog::new());
            let outcome = pipeline.match_column(&column, &props, &MatchContext::default());
            let winner = outcome.winner().expect("winner");
            assert_eq!(winner.property.uri, "http://ex.org/firstName");
            assert_eq!(winner.match_type, MatchType::ExactPrefLabel);
            let log = pipeline.log().expect("log");
            assert_eq!(log.entries().iter().filter(|e| e.selected).count(), 1);
        }
    }
}
