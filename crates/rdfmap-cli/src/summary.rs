use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rdfmap_core::{AlignmentReport, AlignmentTrend};
use rdfmap_match::{
    ConfidenceLevel, ConfidenceThresholds, Matcher, MatcherPipeline, PipelineConfig,
};

use crate::commands::{EnrichResult, GenerateResult};

pub fn print_generate_summary(result: &GenerateResult) {
    if let Some(path) = &result.output {
        println!("Mapping: {}", path.display());
    }
    if let Some((_, path)) = &result.report {
        println!("Alignment report: {}", path.display());
    }
    if let Some((path, recorded)) = &result.history {
        println!("History: {} (+{recorded})", path.display());
    }
    if let Some(path) = &result.match_log {
        println!("Match log: {}", path.display());
    }
    if let Some(sheet) = result.mapping.sheets.first() {
        println!("Class: {}", sheet.row_resource.class);
        println!("IRI template: {}", sheet.row_resource.iri_template);
    }

    let thresholds = ConfidenceThresholds::default();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Property"),
        header_cell("Match"),
        header_cell("Confidence"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for accepted in &result.accepted {
        table.add_row(vec![
            Cell::new(&accepted.column).add_attribute(Attribute::Bold),
            Cell::new(&accepted.property_uri),
            Cell::new(accepted.match_type),
            confidence_cell(accepted.confidence, &thresholds),
        ]);
    }
    if let Some((report, _)) = &result.report {
        for column in &report.unmapped_columns {
            table.add_row(vec![
                Cell::new(&column.column_name).fg(Color::DarkGrey),
                dim_cell("-"),
                dim_cell(&column.reason),
                dim_cell("-"),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} of {} mapped", result.accepted.len(), result.total_columns))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    if let Some((report, _)) = &result.report {
        print_report_overview(report);
    }
}

fn print_report_overview(report: &AlignmentReport) {
    let stats = &report.statistics;
    println!(
        "Success rate: {:.1}%  average confidence: {:.2}",
        stats.mapping_success_rate * 100.0,
        stats.average_confidence
    );
    println!(
        "Buckets: high {} / medium {} / low {} / very low {}",
        stats.high_confidence_matches,
        stats.medium_confidence_matches,
        stats.low_confidence_matches,
        stats.very_low_confidence_matches
    );
    if report.skos_suggestions.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Property"),
        header_cell("Label"),
        header_cell("Value"),
        header_cell("Confidence"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for suggestion in &report.skos_suggestions {
        table.add_row(vec![
            Cell::new(&suggestion.property_label),
            Cell::new(format!("skos:{}", suggestion.suggestion_type.local_name())),
            Cell::new(&suggestion.suggested_label_value).fg(Color::Yellow),
            Cell::new(format!("{:.2}", suggestion.confidence)),
        ]);
    }
    println!();
    println!("Suggestions:");
    println!("{table}");
}

pub fn print_enrich_summary(result: &EnrichResult) {
    let Some(path) = &result.output else {
        return;
    };
    println!("Patch: {} ({} labels)", path.display(), result.patch.len());
}

pub fn print_trend(trend: &AlignmentTrend) {
    if trend.is_empty() {
        println!("No alignment reports found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Generated"),
        header_cell("Data"),
        header_cell("Class"),
        header_cell("Mapped"),
        header_cell("Success"),
        header_cell("Avg conf"),
        header_cell("Suggestions"),
    ]);
    apply_table_style(&mut table);
    for index in 3..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for run in &trend.runs {
        table.add_row(vec![
            Cell::new(&run.generated_at),
            Cell::new(&run.data_file),
            Cell::new(&run.target_class),
            Cell::new(format!("{}/{}", run.mapped_columns, run.total_columns)),
            Cell::new(format!("{:.1}%", run.mapping_success_rate * 100.0)),
            Cell::new(format!("{:.2}", run.average_confidence)),
            Cell::new(run.suggestions),
        ]);
    }
    println!("{table}");
    if let (Some(rate), Some(confidence)) = (trend.success_rate_delta, trend.average_confidence_delta) {
        println!(
            "Change since first run: success {:+.1} pts, average confidence {:+.2}",
            rate * 100.0,
            confidence
        );
    }
}

pub fn print_matchers(pipeline: &MatcherPipeline, config: &PipelineConfig) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Matcher"),
        header_cell("Priority"),
        header_cell("Threshold"),
        header_cell("Enabled"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (index, matcher) in pipeline.matchers().iter().enumerate() {
        let enabled = if matcher.enabled() {
            Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(matcher.name()),
            Cell::new(matcher.priority()),
            Cell::new(format!("{:.2}", matcher.threshold())),
            enabled,
        ]);
    }
    println!("{table}");
    println!(
        "Minimum confidence: {:.2}  calibration: {}  embeddings: {}",
        config.min_confidence,
        if config.enable_calibration { "on" } else { "off" },
        if config.use_embeddings { "on" } else { "off" }
    );
}

fn confidence_cell(confidence: f64, thresholds: &ConfidenceThresholds) -> Cell {
    let color = match thresholds.categorize(confidence) {
        ConfidenceLevel::High => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low | ConfidenceLevel::VeryLow => Color::Red,
    };
    Cell::new(format!("{confidence:.2}")).fg(color)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
