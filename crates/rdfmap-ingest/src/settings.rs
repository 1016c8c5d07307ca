//! TOML settings file.
//!
//! ```toml
//! history = "history/matches.json"
//!
//! [generator]
//! base_iri = "http://data.example.org/"
//! min_confidence = 0.6
//!
//! [pipeline]
//! use_embeddings = false
//! fuzzy_threshold = 0.5
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rdfmap_core::GeneratorConfig;
use rdfmap_match::PipelineConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Match history file shared across runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<PathBuf>,
    /// Absent when the file has no `[generator]` table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorConfig>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
        let settings: Self = toml::from_str(&content).map_err(|source| IngestError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Generator config with `base_iri` taking precedence over the file.
    ///
    /// Returns `None` when neither provides a base IRI.
    pub fn generator_config(&self, base_iri: Option<&str>) -> Option<GeneratorConfig> {
        match (&self.generator, base_iri) {
            (Some(config), Some(base)) => Some(GeneratorConfig {
                base_iri: base.to_string(),
                ..config.clone()
            }),
            (Some(config), None) => Some(config.clone()),
            (None, Some(base)) => Some(GeneratorConfig::new(base)),
            (None, None) => None,
        }
    }
}
