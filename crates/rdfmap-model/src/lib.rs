//! Shared model for ontology/table alignment.
//!
//! This crate holds the value types and read-only collaborator traits the
//! matching pipeline consumes:
//!
//! - **Ontology**: [`OntologyClass`], [`OntologyProperty`], [`Restriction`]
//!   behind the [`OntologyIndex`] and [`GraphReasoner`] traits
//! - **Tabular data**: [`ColumnAnalysis`] behind the [`DataSource`] trait
//!
//! Loading either side from files lives in `rdfmap-ingest`.

#![deny(unsafe_code)]

pub mod data;
pub mod error;
pub mod index;
pub mod ontology;

pub use data::{ColumnAnalysis, DataSource, InMemoryDataSource, suggest_identifier_columns};
pub use error::{ModelError, Result};
pub use index::{GraphReasoner, InMemoryOntology, OntologyIndex, suggest_classes};
pub use ontology::{
    OntologyClass, OntologyProperty, PropertyKind, Restriction, RestrictionKind, SKOS_NAMESPACE,
    SkosConcept, XSD_NAMESPACE, local_name,
};
