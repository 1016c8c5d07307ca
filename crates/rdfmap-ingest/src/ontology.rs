//! Ontology index documents.
//!
//! An index document is the JSON form of [`InMemoryOntology`]: namespaces,
//! classes, properties and SKOS concepts, already extracted from RDF by
//! whatever tool produced it.

use std::fs;
use std::path::Path;

use rdfmap_model::{InMemoryOntology, OntologyIndex};
use tracing::{info, warn};

use crate::error::{IngestError, Result};

pub fn load_ontology(path: &Path) -> Result<InMemoryOntology> {
    let content = fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    let ontology = parse_ontology(&content).map_err(|source| IngestError::OntologyParse {
        path: path.to_path_buf(),
        source,
    })?;
    if ontology.classes.is_empty() {
        warn!(path = %path.display(), "ontology declares no classes");
    }
    info!(
        path = %path.display(),
        classes = ontology.classes.len(),
        properties = ontology.properties.len(),
        "loaded ontology index"
    );
    Ok(ontology)
}

/// Parses an index document. Properties without a domain are kept.
pub fn parse_ontology(content: &str) -> std::result::Result<InMemoryOntology, serde_json::Error> {
    let ontology: InMemoryOntology = serde_json::from_str(content)?;
    let undeclared = ontology
        .properties
        .iter()
        .filter_map(|p| p.domain.as_deref())
        .filter(|domain| ontology.class(domain).is_none())
        .count();
    if undeclared > 0 {
        warn!(undeclared, "properties reference undeclared domain classes");
    }
    Ok(ontology)
}

#[cfg(test)]
mod tests {
    use rdfmap_model::PropertyKind;

    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let ontology = parse_ontology(
            r#"{
                "namespaces": { "hr": "http://example.org/hr#" },
                "classes": [ { "uri": "http://example.org/hr#Employee", "label": "Employee" } ],
                "properties": [
                    {
                        "uri": "http://example.org/hr#worksIn",
                        "kind": "object",
                        "domain": "http://example.org/hr#Employee"
                    },
                    {
                        "uri": "http://example.org/hr#firstName",
                        "pref_label": "First Name",
                        "domain": "http://example.org/hr#Employee"
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(ontology.properties[0].kind, PropertyKind::Object);
        let props = ontology.get_datatype_properties("http://example.org/hr#Employee");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].pref_label.as_deref(), Some("First Name"));
    }

    #[test]
    fn test_empty_document() {
        let ontology = parse_ontology("{}").unwrap();
        assert!(ontology.classes().is_empty());
    }
}
