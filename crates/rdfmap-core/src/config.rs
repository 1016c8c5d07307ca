//! Generator configuration.

use serde::{Deserialize, Serialize};

/// Settings for a [`MappingGenerator`](crate::MappingGenerator) run.
///
/// `base_iri` has no default; every other field does, so a TOML
/// `[generator]` table only needs the base IRI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base IRI for generated resources.
    pub base_iri: String,
    /// Prefix for row IRIs when the target class has no label.
    #[serde(default = "default_class_prefix")]
    pub default_class_prefix: String,
    /// Copy property comments into column mappings as `_comment`.
    #[serde(default = "default_true")]
    pub include_comments: bool,
    /// Detect linked objects through object properties.
    #[serde(default = "default_true")]
    pub auto_detect_relationships: bool,
    /// Minimum effective confidence for accepting a match.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

fn default_class_prefix() -> String {
    "resource".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f64 {
    rdfmap_match::DEFAULT_MIN_CONFIDENCE
}

impl GeneratorConfig {
    pub fn new(base_iri: impl Into<String>) -> Self {
        Self {
            base_iri: base_iri.into(),
            default_class_prefix: default_class_prefix(),
            include_comments: true,
            auto_detect_relationships: true,
            min_confidence: default_min_confidence(),
        }
    }

    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    #[must_use]
    pub fn with_relationships(mut self, detect: bool) -> Self {
        self.auto_detect_relationships = detect;
        self
    }
}
