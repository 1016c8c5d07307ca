//! Datatype agreement between a column and a property range.

use rapidfuzz::distance::jaro_winkler;
use rdfmap_model::{ColumnAnalysis, OntologyProperty, XSD_NAMESPACE};

use super::searchable_labels;
use crate::error::MatcherError;
use crate::matcher::{Best, Gate, Matcher};
use crate::types::{MatchContext, MatchPriority, MatchResult, MatchType};
use crate::utils::split_identifier;

/// Local XSD name of a datatype written as CURIE or full IRI.
pub fn xsd_local(datatype: &str) -> Option<&str> {
    datatype
        .strip_prefix(XSD_NAMESPACE)
        .or_else(|| datatype.strip_prefix("xsd:"))
}

fn family(local: &str) -> &str {
    match local {
        "int" | "integer" | "long" | "short" | "byte" | "nonNegativeInteger"
        | "positiveInteger" | "unsignedInt" | "unsignedLong" => "integer",
        "decimal" | "double" | "float" => "decimal",
        "date" => "date",
        "dateTime" | "dateTimeStamp" => "dateTime",
        "boolean" => "boolean",
        "string" | "normalizedString" | "token" | "anyURI" | "language" => "string",
        other => other,
    }
}

/// How well values of `column_datatype` fit a property with `range`, in [0, 1].
///
/// Compatibility rather than equality: an integer column fits a decimal
/// range, and anything fits a string range at a discount.
pub fn datatype_compatibility(column_datatype: &str, range: &str) -> f64 {
    let (Some(column), Some(range)) = (xsd_local(column_datatype), xsd_local(range)) else {
        return 0.0;
    };
    match (family(column), family(range)) {
        (a, b) if a == b => 1.0,
        ("integer", "decimal") => 0.8,
        ("date", "dateTime") => 0.8,
        ("dateTime", "date") => 0.7,
        ("decimal", "integer") => 0.5,
        (_, "string") => 0.5,
        ("boolean", "integer") => 0.4,
        _ => 0.0,
    }
}

/// Scores datatype compatibility times name affinity.
///
/// Both the column datatype and the property range must be known.
#[derive(Debug, Clone)]
pub struct DataTypeInferenceMatcher {
    gate: Gate,
}

impl DataTypeInferenceMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            gate: Gate::new(threshold),
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.gate.enabled = enabled;
        self
    }
}

impl Default for DataTypeInferenceMatcher {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl Matcher for DataTypeInferenceMatcher {
    fn name(&self) -> &str {
        "DataTypeInferenceMatcher"
    }

    fn priority(&self) -> MatchPriority {
        MatchPriority::Medium
    }

    fn enabled(&self) -> bool {
        self.gate.enabled
    }

    fn threshold(&self) -> f64 {
        self.gate.threshold
    }

    fn match_column<'p>(
        &self,
        column: &ColumnAnalysis,
        properties: &[&'p OntologyProperty],
        _context: &MatchContext,
    ) -> Result<Option<MatchResult<'p>>, MatcherError> {
        let Some(column_datatype) = column.suggested_datatype.as_deref() else {
            return Ok(None);
        };
        let name = split_identifier(&column.name);
        let mut best = Best::new();
        for &property in properties {
            let Some(range) = property.range.as_deref() else {
                continue;
            };
            let compatibility = datatype_compatibility(column_datatype, range);
            if compatibility == 0.0 {
                continue;
            }
            for (label, normalized) in searchable_labels(property) {
                let affinity = jaro_winkler::similarity(name.chars(), normalized.chars());
                let score = compatibility * affinity;
                best.offer(property, score, || {
                    format!("datatype {column_datatype} fits {range} (name affinity {affinity:.2} via {label})")
                });
            }
        }
        Ok(best.into_result(&self.gate, MatchType::DatatypeInference, self.name()))
    }
}
