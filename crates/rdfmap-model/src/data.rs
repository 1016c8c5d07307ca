//! Tabular data collaborators.
//!
//! A [`DataSource`] exposes the columns of one table in declaration order,
//! each described by a [`ColumnAnalysis`] (samples, inferred datatype and a
//! few ratios computed by the loader).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Statistics and samples for one source column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnAnalysis {
    /// Column header, unique within the table.
    pub name: String,
    /// Distinct non-empty sample values in first-seen order.
    #[serde(default)]
    pub sample_values: Vec<String>,
    /// Inferred datatype as an `xsd:` CURIE (e.g. `xsd:integer`).
    #[serde(default)]
    pub suggested_datatype: Option<String>,
    /// True when no row leaves the column empty.
    #[serde(default)]
    pub is_required: bool,
    /// Ratio of unique values to non-null values (0.0 to 1.0).
    #[serde(default)]
    pub unique_ratio: f64,
    /// Ratio of null/missing values to total rows (0.0 to 1.0).
    #[serde(default)]
    pub null_ratio: f64,
}

impl ColumnAnalysis {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_samples<I, S>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sample_values = samples.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.suggested_datatype = Some(datatype.into());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    #[must_use]
    pub fn with_unique_ratio(mut self, ratio: f64) -> Self {
        self.unique_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_null_ratio(mut self, ratio: f64) -> Self {
        self.null_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// True for names like `id`, `emp_id` or `EmployeeID`.
    pub fn looks_like_identifier(&self) -> bool {
        let lower = self.name.trim().to_ascii_lowercase();
        lower == "id"
            || lower == "identifier"
            || lower.ends_with("_id")
            || lower.ends_with(" id")
            || lower.ends_with("-id")
            || self.name.trim_end().ends_with("ID")
            || self.name.trim_end().ends_with("Id")
    }
}

/// Read-only view over one loaded table.
pub trait DataSource {
    /// Table name, usually the file stem.
    fn name(&self) -> &str;

    /// Location the table was loaded from, if any.
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Column names in declaration order.
    fn get_column_names(&self) -> Vec<&str>;

    fn get_analysis(&self, name: &str) -> Option<&ColumnAnalysis>;

    /// Columns suitable for building row IRIs, best first.
    fn suggest_iri_template_columns(&self) -> Vec<&str>;
}

/// Picks identifier columns: identifier-like names whose values are unique.
pub fn suggest_identifier_columns(columns: &[ColumnAnalysis]) -> Vec<&str> {
    columns
        .iter()
        .filter(|column| column.looks_like_identifier() && column.unique_ratio >= 0.999)
        .map(|column| column.name.as_str())
        .take(1)
        .collect()
}

/// A table held entirely in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryDataSource {
    name: String,
    #[serde(default)]
    path: Option<PathBuf>,
    columns: Vec<ColumnAnalysis>,
    #[serde(default)]
    iri_columns: Vec<String>,
}

impl InMemoryDataSource {
    /// Builds a source from analysed columns.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateColumn`] if two columns share a name.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnAnalysis>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            path: None,
            columns,
            iri_columns: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Overrides the identifier heuristic with explicit IRI template columns.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownColumn`] if a column is not part of the table.
    pub fn with_iri_columns<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for column in &columns {
            if self.get_analysis(column).is_none() {
                return Err(ModelError::UnknownColumn {
                    column: column.clone(),
                });
            }
        }
        self.iri_columns = columns;
        Ok(self)
    }

    pub fn columns(&self) -> &[ColumnAnalysis] {
        &self.columns
    }
}

impl DataSource for InMemoryDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn get_analysis(&self, name: &str) -> Option<&ColumnAnalysis> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn suggest_iri_template_columns(&self) -> Vec<&str> {
        if self.iri_columns.is_empty() {
            suggest_identifier_columns(&self.columns)
        } else {
            self.iri_columns.iter().map(String::as_str).collect()
        }
    }
}
