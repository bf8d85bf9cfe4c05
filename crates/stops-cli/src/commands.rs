use std::io::{self, IsTerminal};

use anyhow::{Result, bail};
use comfy_table::{Cell, Table};

use stops_cli::pipeline::{RunConfig, RunReport, run_normalize};
use stops_model::{COLUMN_RULES, NormalizeOptions};

use crate::cli::NormalizeArgs;
use crate::summary::{apply_table_style, header_cell, role_cell};

pub fn run_columns() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Role"),
        header_cell("Handling"),
    ]);
    apply_table_style(&mut table);
    for rule in COLUMN_RULES {
        table.add_row(vec![
            Cell::new(rule.name),
            role_cell(rule.role),
            Cell::new(rule.description),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_normalize_command(args: &NormalizeArgs) -> Result<RunReport> {
    if args.chunk_size == 0 {
        bail!("--chunk-size must be at least 1");
    }
    let options = NormalizeOptions::new().with_missing_state(args.missing_state.into());
    let config = RunConfig::new(&args.input)
        .with_chunk_size(args.chunk_size)
        .with_stream(args.stream)
        .with_reference(args.reference.clone())
        .with_output(args.output.clone())
        .with_options(options)
        .with_progress(args.stream && !args.json && io::stderr().is_terminal());
    run_normalize(&config)
}
