//! Matcher implementations.

pub mod datatype;
pub mod embedding;
pub mod exact;
pub mod fuzzy;
pub mod graph;
pub mod hierarchy;
pub mod history;
pub mod owl;
pub mod restriction;
pub mod semantic;
pub mod skos;
pub mod structural;

use rapidfuzz::distance::jaro_winkler;
use rdfmap_model::OntologyProperty;

use crate::utils::{jaccard, normalize_text, split_identifier, squash, tokens};

/// Labels plus the split local name, each paired with its normalized form.
pub(crate) fn searchable_labels(property: &OntologyProperty) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = property
        .all_labels()
        .into_iter()
        .map(|label| (label.to_string(), normalize_text(label)))
        .collect();
    let local = property.local_name();
    out.push((local.to_string(), split_identifier(local)));
    out.retain(|(_, normalized)| !normalized.is_empty());
    out
}

/// Conservative name agreement between a column and one label, in [0, 1].
///
/// Equality scores 1.0 and containment 0.85. Otherwise the better of word
/// overlap and a discounted Jaro-Winkler similarity above 0.9.
pub(crate) fn name_signal(column: &str, label: &str) -> f64 {
    let (a, b) = (squash(column), squash(label));
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.len() >= 3 && b.len() >= 3 && (a.contains(&b) || b.contains(&a)) {
        return 0.85;
    }
    let (na, nb) = (normalize_text(column), normalize_text(label));
    let overlap = jaccard(&tokens(&na), &tokens(&nb));
    let jw = jaro_winkler::similarity(na.chars(), nb.chars());
    let fuzzy = if jw >= 0.9 { jw * 0.9 } else { 0.0 };
    overlap.max(fuzzy)
}

/// Best [`name_signal`] over a property's labels and split local name.
pub(crate) fn property_signal(column: &str, property: &OntologyProperty) -> (f64, String) {
    searchable_labels(property)
        .into_iter()
        .map(|(label, normalized)| (name_signal(column, &normalized), label))
        .fold((0.0, String::new()), |best, next| if next.0 > best.0 { next } else { best })
}
