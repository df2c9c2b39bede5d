//! tabclean - Command-line shell
//!
//! Thin I/O collaborator around the cleaning core: reads a delimited file,
//! runs the configured pipeline, prints previews and the step log, and
//! writes the cleaned table and an optional JSON report.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use tabclean::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "tabclean", about = "Tabular data cleaning pipeline", version)]
struct Cli {
    /// Input delimited file (header row + data rows)
    input: PathBuf,

    /// Pipeline configuration: JSON array of operation descriptors
    #[arg(short, long)]
    pipeline: Option<PathBuf>,

    /// Output file for the cleaned table
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter
    #[arg(short, long, default_value = ",")]
    delimiter: char,

    /// Preview row count
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview: usize,

    /// Write the step report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Do not write the explicit row index on export
    #[arg(long)]
    no_index: bool,
}

fn print_preview(title: &str, table: &Table, n: usize) {
    println!("{}", title);
    for row in preview(table, n) {
        println!("  {}", row.join(" | "));
    }
    let (rows, cols) = table.shape();
    println!("  shape: {} rows x {} cols", rows, cols);
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabclean=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let options = DelimitedOptions::default()
        .with_delimiter(cli.delimiter as u8)
        .with_include_index(!cli.no_index);

    let file = File::open(&cli.input)
        .with_context(|| format!("cannot open {}", cli.input.display()))?;
    // Ingestion failure is fatal: nothing to preview or export.
    let table = read_table(file, &options)
        .with_context(|| format!("cannot ingest {}", cli.input.display()))?;

    print_preview("Original data:", &table, cli.preview);

    let pipeline = match &cli.pipeline {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            Pipeline::from_json(&json)
                .with_context(|| format!("invalid pipeline in {}", path.display()))?
        }
        None => Pipeline::default(),
    };

    let run = run_pipeline(table, &pipeline);
    let report = CleaningReport::from_run(&run);

    println!();
    print_preview("Cleaned data:", &run.table, cli.preview);

    if !report.steps.is_empty() {
        println!("\nSteps:");
        for step in &report.steps {
            println!("  {:<20} {:?}: {}", step.op, step.status, step.message);
        }
        let (applied, skipped, failed) = report.tally();
        println!("  {} applied, {} skipped, {} failed", applied, skipped, failed);
    }

    if let Some(path) = &cli.output {
        let out = File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        write_table(&run.table, out, &options)?;
        println!("\nWrote {}", path.display());
    }

    if let Some(path) = &cli.report {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("cannot write {}", path.display()))?;
    }

    Ok(())
}
