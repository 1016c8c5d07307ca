//! CLI argument definitions for rdfmap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rdfmap",
    version,
    about = "Align table columns with ontology properties",
    long_about = "Match the columns of a CSV file against the datatype properties of an \
                  ontology class.\n\n\
                  Writes a YAML or JSON mapping configuration and, on request, an \
                  alignment report with SKOS label suggestions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a mapping configuration for a CSV file.
    Generate(GenerateArgs),

    /// Turn alignment report suggestions into a SKOS Turtle patch.
    Enrich(EnrichArgs),

    /// Summarize alignment reports saved over several runs.
    Stats(StatsArgs),

    /// List the matchers of the default pipeline.
    Matchers(MatchersArgs),
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Ontology index document (JSON).
    #[arg(long, value_name = "PATH")]
    pub ontology: PathBuf,

    /// CSV file to map.
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,

    /// Target class by label, local name or IRI (default: detected from the file name).
    #[arg(long = "class", value_name = "CLASS")]
    pub class: Option<String>,

    /// Mapping output file; `.json` writes JSON, anything else YAML (default: stdout).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write an alignment report (default: next to the output).
    #[arg(long = "alignment-report", value_name = "PATH", num_args = 0..=1)]
    pub alignment_report: Option<Option<PathBuf>>,

    /// Settings file with `[generator]` and `[pipeline]` tables.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Match history file, read before and updated after the run.
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Base IRI for generated resources (overrides the settings file).
    #[arg(long = "base-iri", value_name = "IRI")]
    pub base_iri: Option<String>,

    /// Minimum confidence for accepting a match (overrides the settings file).
    #[arg(long = "min-confidence", value_name = "SCORE")]
    pub min_confidence: Option<f64>,

    /// Score with the lexical model only.
    #[arg(long = "no-embeddings")]
    pub no_embeddings: bool,

    /// Write every candidate the pipeline considered to a JSON file.
    #[arg(long = "match-log", value_name = "PATH")]
    pub match_log: Option<PathBuf>,
}

#[derive(Parser)]
pub struct EnrichArgs {
    /// Alignment report produced by `generate --alignment-report`.
    #[arg(long = "alignment-report", value_name = "PATH")]
    pub alignment_report: PathBuf,

    /// Turtle output file (default: stdout).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Skip suggestions whose match confidence is below this value.
    #[arg(long = "min-confidence", value_name = "SCORE", default_value_t = 0.0)]
    pub min_confidence: f64,
}

#[derive(Parser)]
pub struct StatsArgs {
    /// Directory of saved alignment reports.
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: PathBuf,

    /// Also write the trend as JSON.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct MatchersArgs {
    /// Settings file whose `[pipeline]` table shapes the list.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
