//! Per-match-type confidence calibration.

use std::collections::HashMap;

use crate::types::MatchType;

/// Maps raw matcher scores onto one comparable scale.
///
/// Each match type has a linear scale factor; calibrated scores are
/// `raw * scale` clamped to [0, 1], which keeps calibration monotonic per
/// type. Types without an explicit scale pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceCalibrator {
    scales: HashMap<MatchType, f64>,
}

impl ConfidenceCalibrator {
    /// Calibrator that never changes a score.
    pub fn identity() -> Self {
        Self {
            scales: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_scale(mut self, match_type: MatchType, scale: f64) -> Self {
        self.scales.insert(match_type, scale.max(0.0));
        self
    }

    pub fn scale(&self, match_type: MatchType) -> f64 {
        self.scales.get(&match_type).copied().unwrap_or(1.0)
    }

    pub fn calibrate(&self, match_type: MatchType, raw: f64) -> f64 {
        (raw * self.scale(match_type)).clamp(0.0, 1.0)
    }
}

impl Default for ConfidenceCalibrator {
    fn default() -> Self {
        let mut scales = HashMap::new();
        for match_type in MatchType::ALL {
            let scale = match match_type {
                t if t.is_exact() => 1.0,
                t if t.is_ontology_structure() => 0.9,
                MatchType::SemanticSimilarity | MatchType::HistoryAware => 0.95,
                MatchType::DatatypeInference | MatchType::Structural | MatchType::Partial => 0.85,
                MatchType::Fuzzy => 0.75,
                _ => 1.0,
            };
            scales.insert(match_type, scale);
        }
        Self { scales }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn default_scales_favor_curated_evidence() {
        let c = ConfidenceCalibrator::default();
        assert_eq!(c.calibrate(MatchType::ExactPrefLabel, 1.0), 1.0);
        assert!((c.calibrate(MatchType::Fuzzy, 1.0) - 0.75).abs() < 1e-9);
        assert!((c.calibrate(MatchType::Hierarchy, 1.0) - 0.9).abs() < 1e-9);
        assert_eq!(ConfidenceCalibrator::identity().calibrate(MatchType::Fuzzy, 0.42), 0.42);
    }

    proptest! {
        #[test]
        fn calibration_is_monotonic_and_bounded(a in 0.0f64..=1.0, b in 0.0f64..=1.0, idx in 0usize..16) {
            let c = ConfidenceCalibrator::default();
            let kind = MatchType::ALL[idx];
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (clo, chi) = (c.calibrate(kind, lo), c.calibrate(kind, hi));
            prop_assert!(clo <= chi);
            prop_assert!((0.0..=1.0).contains(&chi));
        }
    }
}
