use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span, warn};

use rdfmap_core::{
    AcceptedMatch, AlignmentReport, AlignmentTrend, EnrichmentPatch, MappingConfig,
    MappingGenerator,
};
use rdfmap_ingest::{CsvDataSource, Settings, load_ontology};
use rdfmap_match::{
    MatchHistory, MatcherPipeline, PipelineConfig, PipelineResources, create_default_pipeline,
    shared_embeddings,
};
use rdfmap_model::InMemoryOntology;

use crate::cli::{EnrichArgs, GenerateArgs, MatchersArgs, StatsArgs};

/// Everything `generate` produced, for the summary table.
#[derive(Debug)]
pub struct GenerateResult {
    pub mapping: MappingConfig,
    pub accepted: Vec<AcceptedMatch>,
    pub total_columns: usize,
    pub output: Option<PathBuf>,
    pub report: Option<(AlignmentReport, PathBuf)>,
    pub history: Option<(PathBuf, usize)>,
    pub match_log: Option<PathBuf>,
}

#[derive(Debug)]
pub struct EnrichResult {
    pub patch: EnrichmentPatch,
    pub output: Option<PathBuf>,
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path).with_context(|| format!("load settings {}", path.display())),
        None => Ok(Settings::default()),
    }
}

/// Report path next to the mapping output, or in the working directory.
pub fn default_report_path(output: Option<&Path>) -> PathBuf {
    match output {
        Some(output) => {
            let stem = output
                .file_stem()
                .map_or_else(|| "mapping".into(), |s| s.to_string_lossy().into_owned());
            output.with_file_name(format!("{stem}_alignment_report.json"))
        }
        None => PathBuf::from("alignment_report.json"),
    }
}

fn write_mapping(mapping: &MappingConfig, output: &Path) -> Result<()> {
    let is_json = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let written = if is_json {
        mapping.save_json(output)
    } else {
        mapping.save_yaml(output)
    };
    written.with_context(|| format!("write mapping {}", output.display()))
}

pub fn run_generate(args: &GenerateArgs) -> Result<GenerateResult> {
    let started = Instant::now();
    let span = info_span!("generate", data = %args.data.display());
    let _guard = span.enter();

    let settings = load_settings(args.config.as_deref())?;
    let mut generator_config = settings
        .generator_config(args.base_iri.as_deref())
        .ok_or_else(|| anyhow!("no base IRI: pass --base-iri or set base_iri in [generator]"))?;
    if let Some(min) = args.min_confidence {
        generator_config = generator_config.with_min_confidence(min);
    }
    let mut pipeline_config = settings.pipeline.clone();
    if args.no_embeddings {
        pipeline_config.use_embeddings = false;
    }
    if args.match_log.is_some() {
        pipeline_config.enable_logging = true;
    }

    let ontology: Arc<InMemoryOntology> = Arc::new(
        load_ontology(&args.ontology)
            .with_context(|| format!("load ontology {}", args.ontology.display()))?,
    );
    let data = CsvDataSource::load(&args.data)
        .with_context(|| format!("load data {}", args.data.display()))?;
    let total_columns = data.columns().len();

    let history_path = args.history.clone().or_else(|| settings.history.clone());
    let mut history = match &history_path {
        Some(path) => Some(
            MatchHistory::load(path.as_path())
                .with_context(|| format!("load history {}", path.display()))?,
        ),
        None => None,
    };

    let mut resources = PipelineResources::new()
        .with_index(ontology.clone())
        .with_reasoner(ontology.clone());
    if let Some(history) = &history {
        resources = resources.with_history(Arc::new(history.clone()));
    }
    if pipeline_config.use_embeddings {
        resources = resources.with_embeddings(shared_embeddings());
    }
    let pipeline = create_default_pipeline(&pipeline_config, &resources);

    let mut generator =
        MappingGenerator::with_pipeline(ontology, Box::new(data), generator_config, pipeline)
            .with_ontology_file(args.ontology.display().to_string());

    let output = args.output.as_deref();
    let (mapping, report) = match &args.alignment_report {
        Some(path) => {
            let (mapping, report) = generator
                .generate_with_alignment_report(args.class.as_deref(), output)
                .context("generate mapping")?;
            let path = path.clone().unwrap_or_else(|| default_report_path(output));
            report
                .save_json(&path)
                .with_context(|| format!("write alignment report {}", path.display()))?;
            (mapping, Some((report, path)))
        }
        None => (
            generator
                .generate(args.class.as_deref(), output)
                .context("generate mapping")?,
            None,
        ),
    };

    match output {
        Some(path) => write_mapping(&mapping, path)?,
        None => print!("{}", mapping.to_yaml().context("serialize mapping")?),
    }

    let history_summary = match (history.as_mut(), history_path) {
        (Some(history), Some(path)) => {
            let recorded = generator.record_history(history);
            history
                .save()
                .with_context(|| format!("save history {}", path.display()))?;
            Some((path, recorded))
        }
        _ => None,
    };

    let match_log = match &args.match_log {
        Some(path) => {
            let log = generator.pipeline_mut().take_log().unwrap_or_default();
            let json = serde_json::to_string_pretty(&log).context("serialize match log")?;
            fs::write(path, json).with_context(|| format!("write match log {}", path.display()))?;
            Some(path.clone())
        }
        None => None,
    };

    info!(
        mapped = generator.accepted_matches().len(),
        total = total_columns,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generate complete"
    );
    Ok(GenerateResult {
        accepted: generator.accepted_matches().to_vec(),
        mapping,
        total_columns,
        output: args.output.clone(),
        report,
        history: history_summary,
        match_log,
    })
}

pub fn run_enrich(args: &EnrichArgs) -> Result<EnrichResult> {
    let report = AlignmentReport::from_json_file(&args.alignment_report).with_context(|| {
        format!("load alignment report {}", args.alignment_report.display())
    })?;
    let patch = EnrichmentPatch::from_report(&report, args.min_confidence);
    if patch.is_empty() {
        warn!(report = %args.alignment_report.display(), "no suggestions to apply");
    }
    match &args.output {
        Some(path) => patch
            .save(path)
            .with_context(|| format!("write patch {}", path.display()))?,
        None => print!("{}", patch.to_turtle()),
    }
    Ok(EnrichResult {
        patch,
        output: args.output.clone(),
    })
}

pub fn run_stats(args: &StatsArgs) -> Result<AlignmentTrend> {
    let trend = AlignmentTrend::load_dir(&args.reports_dir)
        .with_context(|| format!("read reports from {}", args.reports_dir.display()))?;
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&trend).context("serialize trend")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(trend)
}

/// The default pipeline as `generate` would build it, minus history.
pub fn run_matchers(args: &MatchersArgs) -> Result<(MatcherPipeline, PipelineConfig)> {
    let settings = load_settings(args.config.as_deref())?;
    let ontology = Arc::new(InMemoryOntology::new());
    let resources = PipelineResources::new()
        .with_index(ontology.clone())
        .with_reasoner(ontology);
    let pipeline = create_default_pipeline(&settings.pipeline, &resources);
    Ok((pipeline, settings.pipeline))
}
