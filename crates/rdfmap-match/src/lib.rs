//! Column to ontology-property matching.
//!
//! An ordered [`MatcherPipeline`] runs every enabled [`Matcher`] over the
//! candidate properties for one column, calibrates the proposals and picks
//! a single winner.
//!
//! # Overview
//!
//! - **Matchers**: exact labels, ontology structure (hierarchy, OWL
//!   characteristics, restrictions, SKOS relations, class graph), history,
//!   semantic similarity, datatype, identifier structure, partial and fuzzy
//!   string matching
//! - **Calibration**: per-match-type scaling of raw confidences
//! - **Logging**: optional per-candidate audit trail
//! - **Factories**: the default pipeline plus exact-only, fast,
//!   semantic-only and custom variants
//!
//! # Example
//!
//! ```ignore
//! use rdfmap_match::{MatchContext, PipelineConfig, PipelineResources, create_default_pipeline};
//!
//! let mut pipeline = create_default_pipeline(&PipelineConfig::default(), &PipelineResources::new());
//! let context = MatchContext::new(["emp_id", "first_name"]);
//! let outcome = pipeline.match_column(&column, &properties, &context);
//! ```

mod calibration;
mod error;
mod factory;
mod level;
mod log;
mod matcher;
mod pipeline;
mod types;

pub mod matchers;
pub mod utils;

// === Core types ===
pub use types::{ColumnMatch, MatchContext, MatchPriority, MatchResult, MatchType, MatchedProperty};

// === Errors ===
pub use error::{HistoryError, MatcherError};

// === Matcher contract ===
pub use matcher::{Gate, Matcher};

// === Pipeline ===
pub use calibration::ConfidenceCalibrator;
pub use level::{ConfidenceLevel, ConfidenceThresholds};
pub use log::{MatchLogEntry, MatchingLog};
pub use pipeline::{DEFAULT_MIN_CONFIDENCE, MatcherPipeline};

// === Factories ===
pub use factory::{
    PipelineConfig, PipelineResources, create_custom_pipeline, create_default_pipeline,
    create_exact_only_pipeline, create_fast_pipeline, create_semantic_only_pipeline,
    shared_embeddings,
};

// === Frequently used matcher items ===
pub use matchers::embedding::{EmbeddingHandle, EmbeddingModel, NgramEmbedder};
pub use matchers::history::{HistoryRecord, MatchHistory};
