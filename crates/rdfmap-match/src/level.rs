//! Confidence levels used to bucket accepted matches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence level categories for alignment quality assessment.
///
/// - `High`: near-certain, no review needed
/// - `Medium`: plausible, worth a glance
/// - `Low` and `VeryLow`: weak, the ontology probably needs better labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very_low",
        }
    }

    /// Returns a human-readable description of the confidence level.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
            Self::VeryLow => "very low confidence - likely wrong",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket boundaries for [`ConfidenceLevel`].
///
/// - At or above `high`: [`ConfidenceLevel::High`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - Below `low`: [`ConfidenceLevel::VeryLow`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.5,
            low: 0.3,
        }
    }
}

impl ConfidenceThresholds {
    /// Categorizes a confidence score. Every score lands in exactly one level.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> ConfidenceLevel {
        if confidence >= self.high {
            ConfidenceLevel::High
        } else if confidence >= self.medium {
            ConfidenceLevel::Medium
        } else if confidence >= self.low {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn boundaries_are_inclusive_from_below() {
        let t = ConfidenceThresholds::default();
        assert_eq!(t.categorize(0.8), ConfidenceLevel::High);
        assert_eq!(t.categorize(0.79), ConfidenceLevel::Medium);
        assert_eq!(t.categorize(0.5), ConfidenceLevel::Medium);
        assert_eq!(t.categorize(0.3), ConfidenceLevel::Low);
        assert_eq!(t.categorize(0.29), ConfidenceLevel::VeryLow);
    }

    proptest! {
        #[test]
        fn levels_are_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let t = ConfidenceThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.categorize(lo) <= t.categorize(hi));
        }
    }
}
