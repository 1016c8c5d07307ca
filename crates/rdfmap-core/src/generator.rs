//! Mapping generation: ontology + table → mapping configuration + report.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rdfmap_match::{
    MatchContext, MatchHistory, MatchType, MatcherPipeline, PipelineConfig, PipelineResources,
    create_default_pipeline,
};
use rdfmap_model::{ColumnAnalysis, DataSource, OntologyClass, OntologyIndex, XSD_NAMESPACE};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::mapping::{
    ColumnMapping, MappingConfig, MappingDefaults, MappingOptions, ObjectMapping,
    ObjectPropertyMapping, RowResource, SheetMapping,
};
use crate::report::{
    AlignmentReport, AlignmentReportBuilder, MatchRecord, REASON_BELOW_THRESHOLD, REASON_NO_MATCH,
    TargetClass, UnmappedColumn,
};

/// A column decision kept after a run, for history recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedMatch {
    pub column: String,
    pub property_uri: String,
    pub match_type: MatchType,
    pub confidence: f64,
}

/// Builds a mapping configuration for one table against one ontology.
///
/// Columns are matched in the data source's declared order against the
/// datatype properties of the target class. Each accepted match is recorded
/// in a [`MatchContext`] before the next column is matched.
pub struct MappingGenerator {
    ontology: Arc<dyn OntologyIndex>,
    data: Box<dyn DataSource>,
    config: GeneratorConfig,
    pipeline: MatcherPipeline,
    ontology_file: String,
    accepted: Vec<AcceptedMatch>,
}

impl MappingGenerator {
    /// Uses the default pipeline with the ontology as its index.
    pub fn new(
        ontology: Arc<dyn OntologyIndex>,
        data: Box<dyn DataSource>,
        config: GeneratorConfig,
    ) -> Self {
        let pipeline_config = PipelineConfig {
            min_confidence: config.min_confidence,
            ..PipelineConfig::default()
        };
        let resources = PipelineResources::new().with_index(Arc::clone(&ontology));
        let pipeline = create_default_pipeline(&pipeline_config, &resources);
        Self::with_pipeline(ontology, data, config, pipeline)
    }

    /// Uses a caller-built pipeline. Its minimum confidence is overridden by `config`.
    pub fn with_pipeline(
        ontology: Arc<dyn OntologyIndex>,
        data: Box<dyn DataSource>,
        config: GeneratorConfig,
        mut pipeline: MatcherPipeline,
    ) -> Self {
        pipeline.set_min_confidence(config.min_confidence);
        Self {
            ontology,
            data,
            config,
            pipeline,
            ontology_file: "ontology".to_string(),
            accepted: Vec::new(),
        }
    }

    /// Identifier of the ontology recorded in reports (usually its path).
    #[must_use]
    pub fn with_ontology_file(mut self, ontology_file: impl Into<String>) -> Self {
        self.ontology_file = ontology_file.into();
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &MatcherPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut MatcherPipeline {
        &mut self.pipeline
    }

    /// Accepted matches of the latest run, in column order.
    pub fn accepted_matches(&self) -> &[AcceptedMatch] {
        &self.accepted
    }

    /// Generates the mapping configuration.
    ///
    /// `target_class` is a class label or IRI (full, or the part after `#`
    /// or `/`). Without one, the class is guessed from the table name.
    /// `output_path` is where the mapping will be written; the sheet source
    /// is made relative to its directory.
    pub fn generate(
        &mut self,
        target_class: Option<&str>,
        output_path: Option<&Path>,
    ) -> Result<MappingConfig> {
        self.run(target_class, output_path).map(|(mapping, _)| mapping)
    }

    /// Generates the mapping configuration together with its alignment report.
    pub fn generate_with_alignment_report(
        &mut self,
        target_class: Option<&str>,
        output_path: Option<&Path>,
    ) -> Result<(MappingConfig, AlignmentReport)> {
        let (mapping, builder) = self.run(target_class, output_path)?;
        Ok((mapping, builder.build()))
    }

    /// Adds the accepted matches of the latest run to `history`.
    pub fn record_history(&self, history: &mut MatchHistory) -> usize {
        for accepted in &self.accepted {
            history.record(
                &accepted.column,
                &accepted.property_uri,
                accepted.match_type,
                accepted.confidence,
            );
        }
        self.accepted.len()
    }

    fn run(
        &mut self,
        target_class: Option<&str>,
        output_path: Option<&Path>,
    ) -> Result<(MappingConfig, AlignmentReportBuilder)> {
        let ontology = Arc::clone(&self.ontology);
        let index: &dyn OntologyIndex = ontology.as_ref();

        let column_names: Vec<String> = self
            .data
            .get_column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        if column_names.is_empty() {
            warn!(table = %self.data.name(), "data source has no columns");
        }

        let class = match target_class {
            Some(identifier) => resolve_class(index, identifier)?,
            None => auto_detect_class(index, self.data.name())?,
        };
        let mut namespaces = index.namespaces();
        namespaces
            .entry("xsd".to_string())
            .or_insert_with(|| XSD_NAMESPACE.to_string());

        let properties = index.get_datatype_properties(&class.uri);
        info!(
            class = %class.uri,
            columns = column_names.len(),
            properties = properties.len(),
            "matching columns"
        );

        let data_file = self
            .data
            .path()
            .map_or_else(|| self.data.name().to_string(), |p| p.display().to_string());
        let mut report = AlignmentReportBuilder::new(
            self.ontology_file.clone(),
            data_file,
            TargetClass {
                uri: class.uri.clone(),
                label: class.display_label().to_string(),
            },
        );

        self.accepted.clear();
        self.pipeline.clear_log();
        let mut context = MatchContext::new(column_names.iter().cloned());
        let mut columns = IndexMap::new();
        for name in &column_names {
            let analysis = self.column_analysis(name);
            let outcome = self.pipeline.match_column(&analysis, &properties, &context);
            let Some(winner) = outcome.winner() else {
                let reason = if outcome.was_rejected() {
                    REASON_BELOW_THRESHOLD
                } else {
                    REASON_NO_MATCH
                };
                debug!(column = %name, reason, "unmapped");
                report.record_unmapped(UnmappedColumn {
                    column_name: name.clone(),
                    sample_values: analysis.sample_values.clone(),
                    inferred_datatype: analysis.suggested_datatype.clone(),
                    reason: reason.to_string(),
                });
                continue;
            };

            let property = winner.property;
            columns.insert(
                name.clone(),
                ColumnMapping {
                    property: curie(&namespaces, &property.uri),
                    datatype: analysis.suggested_datatype.clone(),
                    required: analysis.is_required,
                    comment: property
                        .comment
                        .clone()
                        .filter(|_| self.config.include_comments),
                },
            );
            report.record_match(MatchRecord {
                column_name: name.clone(),
                property_uri: property.uri.clone(),
                property_label: property.display_label().to_string(),
                property_has_label: property.has_proper_label(),
                match_type: winner.match_type,
                confidence: winner.confidence,
                calibrated_confidence: winner.calibrated_confidence,
                matched_via: winner.matched_via.clone(),
                sample_values: analysis.sample_values.clone(),
            });
            self.accepted.push(AcceptedMatch {
                column: name.clone(),
                property_uri: property.uri.clone(),
                match_type: winner.match_type,
                confidence: winner.confidence,
            });
            context.record(name.clone(), property);
        }

        let objects = if self.config.auto_detect_relationships {
            self.object_mappings(index, class, &column_names, &namespaces)
        } else {
            IndexMap::new()
        };

        info!(
            mapped = columns.len(),
            unmapped = column_names.len() - columns.len(),
            objects = objects.len(),
            "generated mapping"
        );

        let sheet = SheetMapping {
            name: self.data.name().to_string(),
            source: self.source(output_path),
            row_resource: RowResource {
                class: curie(&namespaces, &class.uri),
                iri_template: self.iri_template(class, &column_names),
            },
            columns,
            objects,
        };
        let mapping = MappingConfig {
            namespaces,
            defaults: MappingDefaults {
                base_iri: self.config.base_iri.clone(),
            },
            sheets: vec![sheet],
            options: MappingOptions::default(),
        };
        Ok((mapping, report))
    }

    fn column_analysis(&self, name: &str) -> ColumnAnalysis {
        self.data.get_analysis(name).cloned().unwrap_or_else(|| {
            warn!(column = name, "data source has no analysis for column");
            ColumnAnalysis::new(name)
        })
    }

    /// One level of linked objects through object properties of `class`.
    ///
    /// Every column is matched against the datatype properties of each
    /// object property's range class with a fresh context. These matches are
    /// kept out of the matching log.
    fn object_mappings(
        &mut self,
        index: &dyn OntologyIndex,
        class: &OntologyClass,
        column_names: &[String],
        namespaces: &BTreeMap<String, String>,
    ) -> IndexMap<String, ObjectMapping> {
        let paused = self.pipeline.take_log();
        let objects = self.detect_objects(index, class, column_names, namespaces);
        if let Some(log) = paused {
            self.pipeline.set_log(log);
        }
        objects
    }

    fn detect_objects(
        &mut self,
        index: &dyn OntologyIndex,
        class: &OntologyClass,
        column_names: &[String],
        namespaces: &BTreeMap<String, String>,
    ) -> IndexMap<String, ObjectMapping> {
        let mut objects = IndexMap::new();
        for link in index.get_object_properties(&class.uri) {
            let Some(range_class) = link.range.as_deref().and_then(|range| index.class(range)) else {
                continue;
            };
            let range_properties = index.get_datatype_properties(&range_class.uri);
            if range_properties.is_empty() {
                continue;
            }

            let mut context = MatchContext::new(column_names.iter().cloned());
            let mut properties = Vec::new();
            for name in column_names {
                let analysis = self.column_analysis(name);
                let outcome = self.pipeline.match_column(&analysis, &range_properties, &context);
                if let Some(winner) = outcome.winner() {
                    properties.push(ObjectPropertyMapping {
                        column: name.clone(),
                        property: curie(namespaces, &winner.property.uri),
                    });
                    context.record(name.clone(), winner.property);
                }
            }
            if properties.is_empty() {
                continue;
            }

            let object_name = link
                .label
                .clone()
                .unwrap_or_else(|| link.local_name().to_string());
            debug!(object = %object_name, columns = properties.len(), "linked object");
            objects.insert(
                object_name,
                ObjectMapping {
                    predicate: curie(namespaces, &link.uri),
                    class: curie(namespaces, &range_class.uri),
                    iri_template: self.iri_template(range_class, column_names),
                    properties,
                },
            );
        }
        objects
    }

    /// `{class}:{col}` per identifier column, joined by `_`. A table
    /// without columns gets the bare `{class}:` prefix.
    fn iri_template(&self, class: &OntologyClass, column_names: &[String]) -> String {
        let mut id_columns: Vec<String> = self
            .data
            .suggest_iri_template_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        if id_columns.is_empty() {
            id_columns.extend(column_names.first().cloned());
        }
        let prefix = class
            .label
            .as_deref()
            .unwrap_or(&self.config.default_class_prefix)
            .to_lowercase()
            .replace(' ', "_");
        if id_columns.is_empty() {
            return format!("{prefix}:");
        }
        id_columns
            .iter()
            .map(|column| format!("{prefix}:{{{column}}}"))
            .collect::<Vec<_>>()
            .join("_")
    }

    fn source(&self, output_path: Option<&Path>) -> String {
        let Some(path) = self.data.path() else {
            return self.data.name().to_string();
        };
        if let Some(output) = output_path {
            let base = output.parent().unwrap_or_else(|| Path::new(""));
            if let Some(relative) = relative_to(path, base) {
                return relative.display().to_string();
            }
        }
        path.display().to_string()
    }
}

impl std::fmt::Debug for MappingGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingGenerator")
            .field("data", &self.data.name())
            .field("config", &self.config)
            .field("pipeline", &self.pipeline)
            .field("ontology_file", &self.ontology_file)
            .finish_non_exhaustive()
    }
}

/// Finds a class by label, then by IRI or IRI suffix.
pub fn resolve_class<'o>(
    index: &'o dyn OntologyIndex,
    identifier: &str,
) -> Result<&'o OntologyClass> {
    if let Some(class) = index.get_class_by_label(identifier) {
        return Ok(class);
    }
    let hash_suffix = format!("#{identifier}");
    let slash_suffix = format!("/{identifier}");
    index
        .classes()
        .into_iter()
        .find(|class| {
            class.uri == identifier
                || class.uri.ends_with(&hash_suffix)
                || class.uri.ends_with(&slash_suffix)
        })
        .ok_or_else(|| GeneratorError::ClassNotFound {
            identifier: identifier.to_string(),
        })
}

/// Best class suggestion for a table name, else the first declared class.
pub fn auto_detect_class<'o>(
    index: &'o dyn OntologyIndex,
    table_name: &str,
) -> Result<&'o OntologyClass> {
    if let Some(class) = index.suggest_class_for_name(table_name).into_iter().next() {
        debug!(table = table_name, class = %class.uri, "class suggested from table name");
        return Ok(class);
    }
    index
        .classes()
        .into_iter()
        .next()
        .ok_or(GeneratorError::NoTargetClass)
}

/// Shortens `uri` with the longest matching namespace, or returns it unchanged.
pub fn curie(namespaces: &BTreeMap<String, String>, uri: &str) -> String {
    namespaces
        .iter()
        .filter(|(_, namespace)| !namespace.is_empty() && uri.starts_with(namespace.as_str()))
        .max_by_key(|(_, namespace)| namespace.len())
        .map_or_else(
            || uri.to_string(),
            |(prefix, namespace)| format!("{prefix}:{}", &uri[namespace.len()..]),
        )
}

/// Path of `target` relative to the directory `base`.
///
/// Returns `None` when the two do not share a root (different drives).
fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    let base = if base.as_os_str().is_empty() {
        Path::new(".")
    } else {
        base
    };
    let target = std::path::absolute(target).ok()?;
    let base = std::path::absolute(base).ok()?;
    let target: Vec<Component<'_>> = target.components().collect();
    let base: Vec<Component<'_>> = base.components().collect();
    if target.first() != base.first() {
        return None;
    }
    let common = target
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();
    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    Some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curie_prefers_longest_namespace() {
        let mut ns = BTreeMap::new();
        ns.insert("ex".to_string(), "http://example.org/".to_string());
        ns.insert("hr".to_string(), "http://example.org/hr#".to_string());
        assert_eq!(curie(&ns, "http://example.org/hr#Employee"), "hr:Employee");
        assert_eq!(curie(&ns, "http://example.org/Thing"), "ex:Thing");
        assert_eq!(curie(&ns, "urn:x:y"), "urn:x:y");
    }

    #[test]
    fn relative_paths_climb_out_of_the_output_directory() {
        let rel = relative_to(Path::new("/work/data/employees.csv"), Path::new("/work/config")).unwrap();
        assert_eq!(rel, PathBuf::from("../data/employees.csv"));
        let same = relative_to(Path::new("/work/employees.csv"), Path::new("/work")).unwrap();
        assert_eq!(same, PathBuf::from("employees.csv"));
    }
}
