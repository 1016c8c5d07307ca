//! CSV tables as [`DataSource`]s.
//!
//! The whole file is scanned once. Each column gets samples, a datatype
//! inferred from every non-empty value, and unique/null ratios.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rdfmap_model::{ColumnAnalysis, DataSource, InMemoryDataSource};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

/// Number of distinct sample values kept per column.
pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

/// Reader settings for [`CsvDataSource::load_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub sample_limit: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

/// A loaded CSV file. The table name is the file stem.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    inner: InMemoryDataSource,
    rows: usize,
}

impl CsvDataSource {
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, CsvOptions::default())
    }

    pub fn load_with(path: &Path, options: CsvOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .flexible(true)
            .from_reader(file);
        let csv_error = |source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        };

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(IngestError::EmptyCsv {
                path: path.to_path_buf(),
            });
        }
        if let Some(position) = headers.iter().position(String::is_empty) {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                position,
            });
        }

        let mut stats: Vec<ColumnStats> = headers.iter().map(|_| ColumnStats::default()).collect();
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows += 1;
            for (idx, column) in stats.iter_mut().enumerate() {
                column.observe(record.get(idx).unwrap_or(""), options.sample_limit);
            }
        }
        if rows == 0 {
            warn!(path = %path.display(), "CSV has a header but no data rows");
        }

        let columns: Vec<ColumnAnalysis> = headers
            .iter()
            .zip(stats)
            .map(|(name, column)| column.into_analysis(name, rows))
            .collect();
        let name = path
            .file_stem()
            .map_or_else(|| "data".to_string(), |stem| stem.to_string_lossy().into_owned());
        let inner = InMemoryDataSource::new(name, columns)
            .map_err(|source| IngestError::Model {
                context: format!("invalid header in {}", path.display()),
                source,
            })?
            .with_path(path);

        info!(path = %path.display(), rows, columns = headers.len(), "loaded CSV");
        Ok(Self { inner, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[ColumnAnalysis] {
        self.inner.columns()
    }
}

impl DataSource for CsvDataSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn path(&self) -> Option<&Path> {
        self.inner.path()
    }

    fn get_column_names(&self) -> Vec<&str> {
        self.inner.get_column_names()
    }

    fn get_analysis(&self, name: &str) -> Option<&ColumnAnalysis> {
        self.inner.get_analysis(name)
    }

    fn suggest_iri_template_columns(&self) -> Vec<&str> {
        self.inner.suggest_iri_template_columns()
    }
}

#[derive(Debug, Default)]
struct ColumnStats {
    empty: usize,
    distinct: BTreeSet<String>,
    samples: Vec<String>,
    kind: Option<ValueKind>,
}

impl ColumnStats {
    fn observe(&mut self, raw: &str, sample_limit: usize) {
        let value = raw.trim();
        if value.is_empty() {
            self.empty += 1;
            return;
        }
        if self.distinct.insert(value.to_string()) && self.samples.len() < sample_limit {
            self.samples.push(value.to_string());
        }
        let kind = ValueKind::of(value);
        self.kind = Some(match self.kind {
            Some(current) => current.widen(kind),
            None => kind,
        });
    }

    fn into_analysis(self, name: &str, rows: usize) -> ColumnAnalysis {
        let non_empty = rows - self.empty;
        let unique_ratio = if non_empty > 0 {
            self.distinct.len() as f64 / non_empty as f64
        } else {
            0.0
        };
        let null_ratio = if rows > 0 {
            self.empty as f64 / rows as f64
        } else {
            0.0
        };
        debug!(column = name, datatype = ?self.kind, unique_ratio, null_ratio, "column analysed");

        let mut analysis = ColumnAnalysis::new(name)
            .with_samples(self.samples)
            .required(rows > 0 && self.empty == 0)
            .with_unique_ratio(unique_ratio)
            .with_null_ratio(null_ratio);
        if let Some(kind) = self.kind {
            analysis = analysis.with_datatype(kind.curie());
        }
        analysis
    }
}

/// Datatype of a single cell, ordered roughly from narrow to wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Boolean,
    Integer,
    Decimal,
    Date,
    DateTime,
    String,
}

impl ValueKind {
    fn of(value: &str) -> Self {
        if value.parse::<i64>().is_ok() {
            Self::Integer
        } else if value.parse::<f64>().is_ok_and(f64::is_finite) {
            Self::Decimal
        } else if matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "false" | "yes" | "no"
        ) {
            Self::Boolean
        } else if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            Self::Date
        } else if is_datetime(value) {
            Self::DateTime
        } else {
            Self::String
        }
    }

    /// Smallest kind that covers both.
    fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Decimal) | (Self::Decimal, Self::Integer) => Self::Decimal,
            (Self::Date, Self::DateTime) | (Self::DateTime, Self::Date) => Self::DateTime,
            _ => Self::String,
        }
    }

    fn curie(self) -> &'static str {
        match self {
            Self::Boolean => "xsd:boolean",
            Self::Integer => "xsd:integer",
            Self::Decimal => "xsd:decimal",
            Self::Date => "xsd:date",
            Self::DateTime => "xsd:dateTime",
            Self::String => "xsd:string",
        }
    }
}

fn is_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").is_ok()
}
