//! rdfmap CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use rdfmap_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use rdfmap_cli::commands::{run_enrich, run_generate, run_matchers, run_stats};
use rdfmap_cli::logging::{LogConfig, LogFormat, init_logging};
use rdfmap_cli::summary::{print_enrich_summary, print_generate_summary, print_matchers, print_trend};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let outcome = match &cli.command {
        Command::Generate(args) => run_generate(args).map(|result| {
            // Without --output the mapping itself went to stdout.
            if result.output.is_some() {
                print_generate_summary(&result);
            }
        }),
        Command::Enrich(args) => run_enrich(args).map(|result| print_enrich_summary(&result)),
        Command::Stats(args) => run_stats(args).map(|trend| print_trend(&trend)),
        Command::Matchers(args) => {
            run_matchers(args).map(|(pipeline, config)| print_matchers(&pipeline, &config))
        }
    };
    if let Err(error) = outcome {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
