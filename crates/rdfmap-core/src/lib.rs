//! Mapping configuration generation and alignment reporting.
//!
//! # Overview
//!
//! - **Generation**: resolve a target class, match every column against its
//!   datatype properties, detect linked objects, emit a [`MappingConfig`]
//! - **Alignment report**: statistics, unmapped columns, weak matches and
//!   SKOS label suggestions
//! - **Enrichment**: turn suggestions into a Turtle patch
//! - **Trends**: compare saved reports over time
//!
//! # Example
//!
//! ```ignore
//! use rdfmap_core::{GeneratorConfig, MappingGenerator};
//!
//! let mut generator = MappingGenerator::new(ontology, data, GeneratorConfig::new("http://data.example.org/"));
//! let (mapping, report) = generator.generate_with_alignment_report(Some("Employee"), None)?;
//! mapping.save_yaml(Path::new("mapping.yaml"))?;
//! ```

mod config;
mod enrichment;
mod error;
mod generator;
mod mapping;
mod report;
mod stats;

// === Configuration ===
pub use config::GeneratorConfig;

// === Errors ===
pub use error::{GeneratorError, Result};

// === Generation ===
pub use generator::{AcceptedMatch, MappingGenerator, auto_detect_class, curie, resolve_class};

// === Output ===
pub use mapping::{
    ColumnMapping, MappingConfig, MappingDefaults, MappingOptions, ObjectMapping,
    ObjectPropertyMapping, RowResource, SheetMapping,
};

// === Alignment report ===
pub use report::{
    AlignmentReport, AlignmentReportBuilder, AlignmentStatistics, MatchRecord, REASON_BELOW_THRESHOLD,
    REASON_NO_MATCH, REPORT_SAMPLE_LIMIT, SkosSuggestion, SuggestionType, TargetClass,
    UnmappedColumn, WeakMatch, ntriple, suggest_label,
};

// === Enrichment and trends ===
pub use enrichment::EnrichmentPatch;
pub use stats::{AlignmentTrend, RunSummary};
