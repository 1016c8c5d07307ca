//! Mapping configuration document produced by the generator.
//!
//! The shape mirrors the YAML consumed by the conversion tooling:
//!
//! ```yaml
//! namespaces: { ex: "http://example.org/hr#", xsd: "..." }
//! defaults: { base_iri: "http://data.example.org/" }
//! sheets:
//!   - name: employees
//!     source: data/employees.csv
//!     row_resource: { class: "ex:Employee", iri_template: "employee:{emp_id}" }
//!     columns:
//!       first_name: { as: "ex:firstName", datatype: "xsd:string" }
//! options: { on_error: report, skip_empty_values: true }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub namespaces: BTreeMap<String, String>,
    pub defaults: MappingDefaults,
    pub sheets: Vec<SheetMapping>,
    pub options: MappingOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDefaults {
    pub base_iri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingOptions {
    pub on_error: String,
    pub skip_empty_values: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            on_error: "report".to_string(),
            skip_empty_values: true,
        }
    }
}

/// One table mapped onto one ontology class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMapping {
    pub name: String,
    pub source: String,
    pub row_resource: RowResource,
    /// Column mappings in data-source column order.
    pub columns: IndexMap<String, ColumnMapping>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub objects: IndexMap<String, ObjectMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResource {
    #[serde(rename = "class")]
    pub class: String,
    pub iri_template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Property CURIE.
    #[serde(rename = "as")]
    pub property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(rename = "_comment", default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A linked resource reached through an object property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMapping {
    pub predicate: String,
    #[serde(rename = "class")]
    pub class: String,
    pub iri_template: String,
    pub properties: Vec<ObjectPropertyMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPropertyMapping {
    pub column: String,
    #[serde(rename = "as")]
    pub property: String,
}

impl MappingConfig {
    /// Total column mappings across sheets, excluding linked objects.
    pub fn mapped_column_count(&self) -> usize {
        self.sheets.iter().map(|s| s.columns.len()).sum()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_yaml(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_yaml()?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_json()?)
    }
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| GeneratorError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_mapping_uses_reserved_keys() {
        let mapping = ColumnMapping {
            property: "ex:firstName".to_string(),
            datatype: None,
            required: false,
            comment: Some("Given name".to_string()),
        };
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "as": "ex:firstName", "_comment": "Given name" })
        );
    }
}
