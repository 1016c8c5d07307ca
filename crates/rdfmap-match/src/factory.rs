//! Pipeline construction from one explicit configuration value.
//!
//! Factories never read the environment. Optional collaborators (ontology
//! index, graph reasoner, match history, embedding model) are passed in
//! [`PipelineResources`]; matchers whose collaborator is missing are left
//! out of the pipeline.

use std::sync::{Arc, OnceLock};

use rdfmap_model::{GraphReasoner, OntologyIndex};
use serde::{Deserialize, Serialize};

use crate::calibration::ConfidenceCalibrator;
use crate::log::MatchingLog;
use crate::matcher::Matcher;
use crate::matchers::datatype::DataTypeInferenceMatcher;
use crate::matchers::embedding::EmbeddingHandle;
use crate::matchers::exact::ExactLabelMatcher;
use crate::matchers::fuzzy::{FuzzyStringMatcher, PartialStringMatcher};
use crate::matchers::graph::GraphReasoningMatcher;
use crate::matchers::hierarchy::PropertyHierarchyMatcher;
use crate::matchers::history::{HistoryAwareMatcher, MatchHistory};
use crate::matchers::owl::OwlCharacteristicsMatcher;
use crate::matchers::restriction::RestrictionBasedMatcher;
use crate::matchers::semantic::SemanticSimilarityMatcher;
use crate::matchers::skos::SkosRelationsMatcher;
use crate::matchers::structural::StructuralMatcher;
use crate::pipeline::{DEFAULT_MIN_CONFIDENCE, MatcherPipeline};

/// Which matchers participate and at what thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub use_hierarchy: bool,
    pub hierarchy_threshold: f64,
    pub use_owl_characteristics: bool,
    pub owl_characteristics_threshold: f64,
    pub use_restrictions: bool,
    pub restrictions_threshold: f64,
    pub use_skos_relations: bool,
    pub skos_relations_threshold: f64,
    pub use_history: bool,
    pub history_threshold: f64,
    pub use_semantic: bool,
    pub semantic_threshold: f64,
    /// Combine lexical scoring with an embedding model.
    pub use_embeddings: bool,
    pub use_datatype: bool,
    pub datatype_threshold: f64,
    pub use_structural: bool,
    pub structural_threshold: f64,
    pub use_graph_reasoning: bool,
    pub graph_reasoning_threshold: f64,
    pub partial_threshold: f64,
    pub fuzzy_threshold: f64,
    pub enable_logging: bool,
    pub enable_calibration: bool,
    /// Minimum effective confidence for accepting a winner.
    pub min_confidence: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_hierarchy: true,
            hierarchy_threshold: 0.65,
            use_owl_characteristics: true,
            owl_characteristics_threshold: 0.60,
            use_restrictions: true,
            restrictions_threshold: 0.55,
            use_skos_relations: true,
            skos_relations_threshold: 0.50,
            use_history: true,
            history_threshold: 0.6,
            use_semantic: true,
            semantic_threshold: 0.6,
            use_embeddings: true,
            use_datatype: true,
            datatype_threshold: 0.7,
            use_structural: true,
            structural_threshold: 0.7,
            use_graph_reasoning: true,
            graph_reasoning_threshold: 0.6,
            partial_threshold: 0.60,
            fuzzy_threshold: 0.40,
            enable_logging: false,
            enable_calibration: true,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Optional collaborators injected into matchers.
#[derive(Clone, Default)]
pub struct PipelineResources {
    pub index: Option<Arc<dyn OntologyIndex>>,
    pub reasoner: Option<Arc<dyn GraphReasoner>>,
    pub history: Option<Arc<MatchHistory>>,
    pub embeddings: Option<Arc<EmbeddingHandle>>,
}

impl PipelineResources {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_index(mut self, index: Arc<dyn OntologyIndex>) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_reasoner(mut self, reasoner: Arc<dyn GraphReasoner>) -> Self {
        self.reasoner = Some(reasoner);
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Arc<MatchHistory>) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn with_embeddings(mut self, embeddings: Arc<EmbeddingHandle>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }
}

impl std::fmt::Debug for PipelineResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineResources")
            .field("index", &self.index.is_some())
            .field("reasoner", &self.reasoner.is_some())
            .field("history", &self.history.as_ref().map(|h| h.len()))
            .field("embeddings", &self.embeddings)
            .finish()
    }
}

/// Process-wide built-in embedding handle, created on first use.
pub fn shared_embeddings() -> Arc<EmbeddingHandle> {
    static HANDLE: OnceLock<Arc<EmbeddingHandle>> = OnceLock::new();
    Arc::clone(HANDLE.get_or_init(|| Arc::new(EmbeddingHandle::ngram())))
}

fn exact_matchers() -> Vec<Box<dyn Matcher>> {
    vec![
        Box::new(ExactLabelMatcher::pref_label()),
        Box::new(ExactLabelMatcher::rdfs_label()),
        Box::new(ExactLabelMatcher::alt_label()),
        Box::new(ExactLabelMatcher::hidden_label()),
        Box::new(ExactLabelMatcher::local_name()),
    ]
}

fn semantic_matcher(
    threshold: f64,
    use_embeddings: bool,
    resources: &PipelineResources,
) -> SemanticSimilarityMatcher {
    let matcher = SemanticSimilarityMatcher::new(threshold);
    if !use_embeddings {
        return matcher;
    }
    let handle = resources.embeddings.clone().unwrap_or_else(shared_embeddings);
    matcher.with_embeddings(handle)
}

fn finish(matchers: Vec<Box<dyn Matcher>>, config: &PipelineConfig) -> MatcherPipeline {
    let mut pipeline = MatcherPipeline::new(matchers).with_min_confidence(config.min_confidence);
    if config.enable_calibration {
        pipeline = pipeline.with_calibrator(ConfidenceCalibrator::default());
    }
    if config.enable_logging {
        pipeline = pipeline.with_log(MatchingLog::new());
    }
    pipeline
}

/// Full pipeline in canonical order.
///
/// exact (pref, rdfs, alt, hidden, local) → hierarchy → OWL characteristics
/// → restrictions → SKOS relations → history → semantic → datatype →
/// structural → graph reasoning → partial → fuzzy.
pub fn create_default_pipeline(
    config: &PipelineConfig,
    resources: &PipelineResources,
) -> MatcherPipeline {
    let mut matchers = exact_matchers();

    if let Some(index) = resources.index.as_ref() {
        if config.use_hierarchy {
            matchers.push(Box::new(PropertyHierarchyMatcher::new(
                config.hierarchy_threshold,
                Some(Arc::clone(index)),
            )));
        }
        if config.use_owl_characteristics {
            matchers.push(Box::new(OwlCharacteristicsMatcher::new(
                config.owl_characteristics_threshold,
                Some(Arc::clone(index)),
            )));
        }
        if config.use_restrictions {
            matchers.push(Box::new(RestrictionBasedMatcher::new(
                config.restrictions_threshold,
                Some(Arc::clone(index)),
            )));
        }
        if config.use_skos_relations {
            matchers.push(Box::new(SkosRelationsMatcher::new(
                config.skos_relations_threshold,
                Some(Arc::clone(index)),
            )));
        }
    }

    let mut history = HistoryAwareMatcher::new(config.history_threshold).with_enabled(config.use_history);
    if let Some(records) = resources.history.as_ref() {
        history = history.with_history(Arc::clone(records));
    }
    matchers.push(Box::new(history));
    matchers.push(Box::new(
        semantic_matcher(config.semantic_threshold, config.use_embeddings, resources)
            .with_enabled(config.use_semantic),
    ));
    matchers.push(Box::new(
        DataTypeInferenceMatcher::new(config.datatype_threshold).with_enabled(config.use_datatype),
    ));
    matchers.push(Box::new(
        StructuralMatcher::new(config.structural_threshold).with_enabled(config.use_structural),
    ));

    if config.use_graph_reasoning
        && let Some(reasoner) = resources.reasoner.as_ref()
    {
        matchers.push(Box::new(GraphReasoningMatcher::new(
            config.graph_reasoning_threshold,
            Some(Arc::clone(reasoner)),
        )));
    }

    matchers.push(Box::new(PartialStringMatcher::new(config.partial_threshold)));
    matchers.push(Box::new(FuzzyStringMatcher::new(config.fuzzy_threshold)));

    finish(matchers, config)
}

/// Only the five exact-label matchers.
pub fn create_exact_only_pipeline(config: &PipelineConfig) -> MatcherPipeline {
    finish(exact_matchers(), config)
}

/// Exact matchers plus the partial and fuzzy fallbacks.
pub fn create_fast_pipeline(config: &PipelineConfig) -> MatcherPipeline {
    let mut matchers = exact_matchers();
    matchers.push(Box::new(PartialStringMatcher::new(config.partial_threshold)));
    matchers.push(Box::new(FuzzyStringMatcher::new(config.fuzzy_threshold)));
    finish(matchers, config)
}

/// The semantic matcher on its own.
pub fn create_semantic_only_pipeline(
    config: &PipelineConfig,
    resources: &PipelineResources,
) -> MatcherPipeline {
    let matcher = semantic_matcher(config.semantic_threshold, config.use_embeddings, resources);
    finish(vec![Box::new(matcher)], config)
}

/// Caller-supplied matchers with the configured calibration, logging and minimum.
pub fn create_custom_pipeline(
    matchers: Vec<Box<dyn Matcher>>,
    config: &PipelineConfig,
) -> MatcherPipeline {
    finish(matchers, config)
}

#[cfg(test)]
mod tests {
    use rdfmap_model::InMemoryOntology;

    use super::*;

    #[test]
    fn default_order_without_collaborators() {
        let pipeline = create_default_pipeline(&PipelineConfig::default(), &PipelineResources::new());
        assert_eq!(
            pipeline.enabled_matcher_names(),
            vec![
                "ExactPrefLabelMatcher",
                "ExactRdfsLabelMatcher",
                "ExactAltLabelMatcher",
                "ExactHiddenLabelMatcher",
                "ExactLocalNameMatcher",
                "HistoryAwareMatcher",
                "SemanticSimilarityMatcher",
                "DataTypeInferenceMatcher",
                "StructuralMatcher",
                "PartialStringMatcher",
                "FuzzyStringMatcher",
            ]
        );
        assert!(pipeline.calibrator().is_some());
    }

    #[test]
    fn collaborators_add_structure_matchers_in_order() {
        let onto = Arc::new(InMemoryOntology::new());
        let resources = PipelineResources::new()
            .with_index(onto.clone())
            .with_reasoner(onto);
        let pipeline = create_default_pipeline(&PipelineConfig::default(), &resources);
        let names = pipeline.enabled_matcher_names();
        assert_eq!(names[5], "PropertyHierarchyMatcher");
        assert_eq!(names[8], "SkosRelationsMatcher");
        let graph = names.iter().position(|n| *n == "GraphReasoningMatcher").unwrap();
        let partial = names.iter().position(|n| *n == "PartialStringMatcher").unwrap();
        assert_eq!(graph + 1, partial);
    }

    #[test]
    fn disabled_flags_are_respected() {
        let config = PipelineConfig {
            use_semantic: false,
            use_history: false,
            ..PipelineConfig::default()
        };
        let pipeline = create_default_pipeline(&config, &PipelineResources::new());
        let names = pipeline.enabled_matcher_names();
        assert!(!names.contains(&"SemanticSimilarityMatcher"));
        assert!(!names.contains(&"HistoryAwareMatcher"));
        assert_eq!(create_fast_pipeline(&config).matchers().len(), 7);
        assert_eq!(create_exact_only_pipeline(&config).matchers().len(), 5);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "fuzzy_threshold": 0.5, "use_embeddings": false }"#).unwrap();
        assert_eq!(config.fuzzy_threshold, 0.5);
        assert!(!config.use_embeddings);
        assert_eq!(config.hierarchy_threshold, 0.65);
    }
}
