use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use stops_cli::pipeline::RunReport;
use stops_model::{ColumnPresence, ColumnRole};

pub fn print_report(report: &RunReport) {
    println!("Input: {}", report.input.display());
    if let Some(path) = &report.output {
        println!("Output: {}", path.display());
    }
    if let Some(rows) = report.reference_rows {
        println!("Reference rows: {rows}");
    }

    let summary = &report.summary;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Step"), header_cell("Rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Input rows"), Cell::new(summary.input_rows)]);
    table.add_row(vec![
        Cell::new("Dropped: missing county_fips"),
        dropped_cell(summary.dropped_missing_county_fips),
    ]);
    table.add_row(vec![
        Cell::new("Dropped: missing driver_race"),
        dropped_cell(summary.dropped_missing_driver_race),
    ]);
    table.add_row(vec![
        Cell::new("Dropped: officer without state"),
        dropped_cell(summary.dropped_missing_state),
    ]);
    let keys = match summary.officer_id {
        ColumnPresence::Present => Cell::new(summary.officer_keys),
        ColumnPresence::Absent => dim_cell("no officer_id"),
    };
    table.add_row(vec![Cell::new("Officer keys"), keys]);
    if summary.keys_without_state > 0 {
        table.add_row(vec![
            Cell::new("Empty keys: officer without state"),
            Cell::new(summary.keys_without_state).fg(Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("Output rows")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.output_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Chunks: {}", report.chunks);
    println!("Columns: {}", report.columns.join(", "));
}

pub fn print_report_json(report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    println!("{json}");
    Ok(())
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn role_cell(role: ColumnRole) -> Cell {
    let cell = Cell::new(role.as_str());
    match role {
        ColumnRole::Required => cell.fg(Color::Blue).add_attribute(Attribute::Bold),
        ColumnRole::Passthrough => cell,
        ColumnRole::Consumed => cell.fg(Color::Yellow),
        ColumnRole::Dropped => cell.fg(Color::DarkGrey),
        ColumnRole::Derived => cell.fg(Color::Green),
    }
}

fn dropped_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
