//! Alignment quality over time, from a directory of saved reports.

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GeneratorError, Result};
use crate::report::AlignmentReport;

/// One report reduced to its headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub data_file: String,
    pub target_class: String,
    pub total_columns: usize,
    pub mapped_columns: usize,
    pub mapping_success_rate: f64,
    pub average_confidence: f64,
    pub suggestions: usize,
}

impl From<&AlignmentReport> for RunSummary {
    fn from(report: &AlignmentReport) -> Self {
        Self {
            generated_at: report.generated_at.clone(),
            data_file: report.data_file.clone(),
            target_class: report.target_class.label.clone(),
            total_columns: report.statistics.total_columns,
            mapped_columns: report.statistics.mapped_columns,
            mapping_success_rate: report.statistics.mapping_success_rate,
            average_confidence: report.statistics.average_confidence,
            suggestions: report.skos_suggestions.len(),
        }
    }
}

/// Runs ordered oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentTrend {
    pub runs: Vec<RunSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_confidence_delta: Option<f64>,
}

fn timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

impl AlignmentTrend {
    /// Orders reports by `generated_at`. Unparseable timestamps sort first.
    pub fn from_reports(reports: &[AlignmentReport]) -> Self {
        let mut runs: Vec<RunSummary> = reports.iter().map(RunSummary::from).collect();
        runs.sort_by(|a, b| {
            timestamp(&a.generated_at)
                .cmp(&timestamp(&b.generated_at))
                .then_with(|| a.generated_at.cmp(&b.generated_at))
        });
        let (success_rate_delta, average_confidence_delta) = match (runs.first(), runs.last()) {
            (Some(first), Some(last)) if runs.len() > 1 => (
                Some(last.mapping_success_rate - first.mapping_success_rate),
                Some(last.average_confidence - first.average_confidence),
            ),
            _ => (None, None),
        };
        Self {
            runs,
            success_rate_delta,
            average_confidence_delta,
        }
    }

    /// Loads every `*.json` report in `dir`. Files that are not reports are skipped.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|source| GeneratorError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| GeneratorError::Read {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut reports = Vec::new();
        for path in paths {
            match AlignmentReport::from_json_file(&path) {
                Ok(report) => reports.push(report),
                Err(error) => warn!(path = %path.display(), %error, "skipping file"),
            }
        }
        debug!(dir = %dir.display(), reports = reports.len(), "loaded alignment reports");
        Ok(Self::from_reports(&reports))
    }

    pub fn latest(&self) -> Option<&RunSummary> {
        self.runs.last()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
