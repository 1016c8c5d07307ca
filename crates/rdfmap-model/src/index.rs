//! Read-only ontology collaborators.
//!
//! The matching core never parses RDF. It consumes an [`OntologyIndex`]
//! (classes, properties, namespaces and simple axiom lookups) and, for the
//! graph-reasoning matcher, a [`GraphReasoner`] over the class hierarchy.
//! [`InMemoryOntology`] implements both over plain vectors and is what the
//! JSON ontology-index loader produces.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::ontology::{OntologyClass, OntologyProperty, Restriction, SkosConcept, local_name};

/// Read-only view over an indexed ontology.
///
/// Only the first three methods are required; everything else has a default
/// implementation derived from them.
pub trait OntologyIndex: Send + Sync {
    /// Classes in declaration order.
    fn classes(&self) -> Vec<&OntologyClass>;

    /// Properties in declaration order.
    fn properties(&self) -> Vec<&OntologyProperty>;

    /// Prefix → namespace IRI.
    fn namespaces(&self) -> BTreeMap<String, String>;

    fn class(&self, uri: &str) -> Option<&OntologyClass> {
        self.classes().into_iter().find(|class| class.uri == uri)
    }

    fn property(&self, uri: &str) -> Option<&OntologyProperty> {
        self.properties().into_iter().find(|prop| prop.uri == uri)
    }

    /// Case-insensitive lookup of a class by its rdfs:label.
    fn get_class_by_label(&self, label: &str) -> Option<&OntologyClass> {
        let wanted = label.trim();
        self.classes().into_iter().find(|class| {
            class
                .label
                .as_deref()
                .is_some_and(|l| l.trim().eq_ignore_ascii_case(wanted))
        })
    }

    /// Classes whose label or local name resemble `name`, best first.
    fn suggest_class_for_name(&self, name: &str) -> Vec<&OntologyClass> {
        suggest_classes(self.classes(), name)
    }

    /// Datatype properties whose domain is `class_uri`.
    fn get_datatype_properties(&self, class_uri: &str) -> Vec<&OntologyProperty> {
        self.properties()
            .into_iter()
            .filter(|p| p.is_datatype_property() && p.domain.as_deref() == Some(class_uri))
            .collect()
    }

    /// Object properties whose domain is `class_uri`.
    fn get_object_properties(&self, class_uri: &str) -> Vec<&OntologyProperty> {
        self.properties()
            .into_iter()
            .filter(|p| p.is_object_property() && p.domain.as_deref() == Some(class_uri))
            .collect()
    }

    /// Direct super-properties of `uri` that are known to the index.
    fn super_properties(&self, uri: &str) -> Vec<&OntologyProperty> {
        let Some(prop) = self.property(uri) else {
            return Vec::new();
        };
        prop.super_properties
            .iter()
            .filter_map(|parent| self.property(parent))
            .collect()
    }

    /// Direct sub-properties of `uri`, from either side of the relation.
    fn sub_properties(&self, uri: &str) -> Vec<&OntologyProperty> {
        let declared: BTreeSet<&str> = self
            .property(uri)
            .map(|p| p.sub_properties.iter().map(String::as_str).collect())
            .unwrap_or_default();
        self.properties()
            .into_iter()
            .filter(|p| {
                declared.contains(p.uri.as_str()) || p.super_properties.iter().any(|s| s == uri)
            })
            .collect()
    }

    /// Restrictions declared on `class_uri`.
    fn restrictions(&self, class_uri: &str) -> Vec<&Restriction> {
        self.class(class_uri)
            .map(|class| class.restrictions.iter().collect())
            .unwrap_or_default()
    }

    /// Labels of a SKOS concept, property or class IRI.
    fn concept_labels(&self, uri: &str) -> Vec<String> {
        entity_labels(self, uri)
    }
}

fn entity_labels<I: OntologyIndex + ?Sized>(index: &I, uri: &str) -> Vec<String> {
    if let Some(prop) = index.property(uri) {
        let mut labels: Vec<String> = prop.all_labels().into_iter().map(String::from).collect();
        labels.push(prop.local_name().to_string());
        return labels;
    }
    if let Some(class) = index.class(uri) {
        return vec![class.display_label().to_string()];
    }
    vec![local_name(uri).to_string()]
}

/// Class-hierarchy reasoning used by the graph-reasoning matcher.
pub trait GraphReasoner: Send + Sync {
    /// Transitive super-classes of `class_uri` (nearest first, excluding itself).
    fn ancestors(&self, class_uri: &str) -> Vec<String>;

    /// Transitive sub-classes of `class_uri` (nearest first, excluding itself).
    fn descendants(&self, class_uri: &str) -> Vec<String>;

    /// Display label of a class.
    fn class_label(&self, class_uri: &str) -> Option<String>;
}

/// An ontology index held entirely in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryOntology {
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: Vec<OntologyClass>,
    #[serde(default)]
    pub properties: Vec<OntologyProperty>,
    #[serde(default)]
    pub concepts: Vec<SkosConcept>,
}

impl InMemoryOntology {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: OntologyClass) -> Self {
        self.classes.push(class);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: OntologyProperty) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn with_concept(mut self, concept: SkosConcept) -> Self {
        self.concepts.push(concept);
        self
    }

    fn walk(&self, start: &str, next: impl Fn(&str) -> Vec<String>) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        let mut queue: VecDeque<String> = next(start).into();
        while let Some(uri) = queue.pop_front() {
            if uri == start || !seen.insert(uri.clone()) {
                continue;
            }
            queue.extend(next(&uri));
            ordered.push(uri);
        }
        ordered
    }
}

impl OntologyIndex for InMemoryOntology {
    fn classes(&self) -> Vec<&OntologyClass> {
        self.classes.iter().collect()
    }

    fn properties(&self) -> Vec<&OntologyProperty> {
        self.properties.iter().collect()
    }

    fn namespaces(&self) -> BTreeMap<String, String> {
        self.namespaces.clone()
    }

    fn concept_labels(&self, uri: &str) -> Vec<String> {
        if let Some(concept) = self.concepts.iter().find(|c| c.uri == uri) {
            let mut labels: Vec<String> = concept.pref_label.iter().cloned().collect();
            labels.extend(concept.alt_labels.iter().cloned());
            if labels.is_empty() {
                labels.push(local_name(uri).to_string());
            }
            return labels;
        }
        entity_labels(self, uri)
    }
}

impl GraphReasoner for InMemoryOntology {
    fn ancestors(&self, class_uri: &str) -> Vec<String> {
        self.walk(class_uri, |uri| {
            self.classes
                .iter()
                .find(|c| c.uri == uri)
                .map(|c| c.super_classes.clone())
                .unwrap_or_default()
        })
    }

    fn descendants(&self, class_uri: &str) -> Vec<String> {
        self.walk(class_uri, |uri| {
            self.classes
                .iter()
                .filter(|c| c.super_classes.iter().any(|s| s == uri))
                .map(|c| c.uri.clone())
                .collect()
        })
    }

    fn class_label(&self, class_uri: &str) -> Option<String> {
        self.classes
            .iter()
            .find(|c| c.uri == class_uri)
            .map(|c| c.display_label().to_string())
    }
}

/// Ranks classes against a free-form name such as a file stem.
///
/// Exact label/local-name equality ranks first, then containment in either
/// direction. A trailing plural `s` on the name is ignored.
pub fn suggest_classes<'a>(classes: Vec<&'a OntologyClass>, name: &str) -> Vec<&'a OntologyClass> {
    let wanted = squash(name);
    if wanted.is_empty() {
        return Vec::new();
    }
    let singular = wanted.strip_suffix('s').unwrap_or(&wanted).to_string();

    let mut scored: Vec<(u8, usize, &OntologyClass)> = Vec::new();
    for (idx, class) in classes.into_iter().enumerate() {
        let mut keys = vec![squash(class.local_name())];
        if let Some(label) = class.label.as_deref() {
            keys.push(squash(label));
        }
        let rank = keys
            .iter()
            .filter(|key| !key.is_empty())
            .map(|key| {
                if *key == wanted || *key == singular {
                    2
                } else if wanted.contains(key.as_str()) || key.contains(singular.as_str()) {
                    1
                } else {
                    0
                }
            })
            .max()
            .unwrap_or(0);
        if rank > 0 {
            scored.push((rank, idx, class));
        }
    }
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, class)| class).collect()
}

fn squash(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
