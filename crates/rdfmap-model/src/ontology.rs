//! Ontology vocabulary types consumed by the matchers.
//!
//! These types mirror what an ontology indexer extracts from an OWL/RDFS
//! document: classes, datatype and object properties, SKOS labels and
//! the handful of OWL axioms the structural matchers look at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace of the XML Schema datatypes.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Namespace of the SKOS core vocabulary.
pub const SKOS_NAMESPACE: &str = "http://www.w3.org/2004/02/skos/core#";

/// Returns the local part of an IRI (the text after the last `#` or `/`).
pub fn local_name(uri: &str) -> &str {
    uri.rsplit(['#', '/']).next().unwrap_or(uri)
}

/// Whether a property links to a literal or to another resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Range is a literal datatype (string, number, date).
    #[default]
    Datatype,
    /// Range is an instance of another class.
    Object,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKind::Datatype => "datatype",
            PropertyKind::Object => "object",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ontology property with every label the matchers can use.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OntologyProperty {
    pub uri: String,
    /// `rdfs:label`
    #[serde(default)]
    pub label: Option<String>,
    /// `skos:prefLabel`
    #[serde(default)]
    pub pref_label: Option<String>,
    /// `skos:altLabel` values.
    #[serde(default)]
    pub alt_labels: Vec<String>,
    /// `skos:hiddenLabel` values.
    #[serde(default)]
    pub hidden_labels: Vec<String>,
    /// `rdfs:comment`
    #[serde(default)]
    pub comment: Option<String>,
    /// `rdfs:domain` class IRI.
    #[serde(default)]
    pub domain: Option<String>,
    /// `rdfs:range` datatype or class IRI.
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub kind: PropertyKind,
    /// `owl:FunctionalProperty`
    #[serde(default)]
    pub functional: bool,
    /// `owl:InverseFunctionalProperty`
    #[serde(default)]
    pub inverse_functional: bool,
    /// `rdfs:subPropertyOf` targets.
    #[serde(default)]
    pub super_properties: Vec<String>,
    /// Properties declared as `rdfs:subPropertyOf` this one.
    #[serde(default)]
    pub sub_properties: Vec<String>,
    /// `skos:related` concepts.
    #[serde(default)]
    pub related: Vec<String>,
    /// `skos:broader` concepts.
    #[serde(default)]
    pub broader: Vec<String>,
    /// `skos:narrower` concepts.
    #[serde(default)]
    pub narrower: Vec<String>,
}

impl OntologyProperty {
    /// Creates a datatype property with only an IRI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_pref_label(mut self, label: impl Into<String>) -> Self {
        self.pref_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_alt_label(mut self, label: impl Into<String>) -> Self {
        self.alt_labels.push(label.into());
        self
    }

    #[must_use]
    pub fn with_hidden_label(mut self, label: impl Into<String>) -> Self {
        self.hidden_labels.push(label.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Local part of the property IRI.
    pub fn local_name(&self) -> &str {
        local_name(&self.uri)
    }

    /// All human-readable labels: prefLabel, rdfs:label, altLabels, hiddenLabels.
    pub fn all_labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        if let Some(pref) = self.pref_label.as_deref() {
            labels.push(pref);
        }
        if let Some(label) = self.label.as_deref() {
            labels.push(label);
        }
        labels.extend(self.alt_labels.iter().map(String::as_str));
        labels.extend(self.hidden_labels.iter().map(String::as_str));
        labels
    }

    /// Label used for display: prefLabel, then rdfs:label, then the local name.
    pub fn display_label(&self) -> &str {
        self.pref_label
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or_else(|| self.local_name())
    }

    /// True when the property carries an editorial label (prefLabel or rdfs:label).
    pub fn has_proper_label(&self) -> bool {
        self.pref_label.is_some() || self.label.is_some()
    }

    pub fn is_datatype_property(&self) -> bool {
        self.kind == PropertyKind::Datatype
    }

    pub fn is_object_property(&self) -> bool {
        self.kind == PropertyKind::Object
    }
}

/// OWL restriction kinds the restriction-based matcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionKind {
    Cardinality,
    MinCardinality,
    MaxCardinality,
    SomeValuesFrom,
    AllValuesFrom,
}

/// An `owl:Restriction` attached to a class via `rdfs:subClassOf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// `owl:onProperty`
    pub on_property: String,
    pub kind: RestrictionKind,
    /// Cardinality as text, or the filler class/datatype IRI.
    #[serde(default)]
    pub value: Option<String>,
}

impl Restriction {
    /// Cardinality bound of this restriction, if it is a cardinality restriction.
    pub fn cardinality(&self) -> Option<u32> {
        match self.kind {
            RestrictionKind::Cardinality
            | RestrictionKind::MinCardinality
            | RestrictionKind::MaxCardinality => {
                self.value.as_deref().and_then(|v| v.trim().parse().ok())
            }
            _ => None,
        }
    }

    /// True when the restriction forces at least one value.
    pub fn requires_value(&self) -> bool {
        match self.kind {
            RestrictionKind::Cardinality | RestrictionKind::MinCardinality => {
                self.cardinality().is_some_and(|n| n >= 1)
            }
            RestrictionKind::SomeValuesFrom => true,
            _ => false,
        }
    }

    /// Filler datatype or class for value restrictions.
    pub fn filler(&self) -> Option<&str> {
        match self.kind {
            RestrictionKind::SomeValuesFrom | RestrictionKind::AllValuesFrom => {
                self.value.as_deref()
            }
            _ => None,
        }
    }
}

/// An ontology class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OntologyClass {
    pub uri: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    /// `rdfs:subClassOf` named classes.
    #[serde(default)]
    pub super_classes: Vec<String>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
}

impl OntologyClass {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_super_class(mut self, uri: impl Into<String>) -> Self {
        self.super_classes.push(uri.into());
        self
    }

    #[must_use]
    pub fn with_restriction(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    pub fn local_name(&self) -> &str {
        local_name(&self.uri)
    }

    /// rdfs:label if present, else the local name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.local_name())
    }
}

/// A SKOS concept referenced by `skos:related`/`broader`/`narrower`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkosConcept {
    pub uri: String,
    #[serde(default)]
    pub pref_label: Option<String>,
    #[serde(default)]
    pub alt_labels: Vec<String>,
}
