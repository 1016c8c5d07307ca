//! Input adapters for the rdfmap alignment crates.
//!
//! # Features
//!
//! - **CSV tables**: load a file into a [`DataSource`](rdfmap_model::DataSource)
//!   with per-column samples, inferred `xsd:` datatypes and ratios
//! - **Ontology documents**: load a JSON index into an
//!   [`InMemoryOntology`](rdfmap_model::InMemoryOntology)
//! - **Settings**: optional TOML file with generator and pipeline tables
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rdfmap_ingest::{CsvDataSource, Settings, load_ontology};
//!
//! let ontology = load_ontology(Path::new("hr.json"))?;
//! let data = CsvDataSource::load(Path::new("employees.csv"))?;
//! let settings = Settings::load(Path::new("rdfmap.toml"))?;
//! ```

mod error;
mod ontology;
mod settings;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Tables ===
pub use table::{CsvDataSource, CsvOptions, DEFAULT_SAMPLE_LIMIT};

// === Ontology ===
pub use ontology::{load_ontology, parse_ontology};

// === Settings ===
pub use settings::Settings;
