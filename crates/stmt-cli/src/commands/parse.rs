//! Parse command - extract transactions from a single statement document.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use stmt_core::models::config::{HeaderPolicy, StmtConfig};
use stmt_core::{JsonDocument, ParseResult, RecordSource, StatementParser};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input page dump (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Re-map rows to each page's own header instead of keeping the first one
    #[arg(long)]
    refresh_headers: bool,

    /// Fail instead of loading the reference table when nothing is extracted
    #[arg(long)]
    no_fallback: bool,

    /// Show record counts and totals
    #[arg(long)]
    show_summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if args.refresh_headers {
        config.header.policy = HeaderPolicy::Refresh;
    }
    if args.no_fallback {
        config.fallback.enabled = false;
    }

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Parsing statement: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading pages...");

    let result = parse_document(&args.input, &config);
    pb.finish_and_clear();
    let result = result?;

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_result(&result, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_summary {
        let (debit, credit) = result.totals();
        println!();
        println!(
            "{} {} records ({})",
            style("ℹ").blue(),
            result.len(),
            match result.source {
                RecordSource::Document => "extracted from document",
                RecordSource::Reference => "loaded from reference table",
            }
        );
        println!("{} Total debit: {}, total credit: {}", style("ℹ").blue(), debit, credit);
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read and parse one page dump.
pub fn parse_document(path: &std::path::Path, config: &StmtConfig) -> anyhow::Result<ParseResult> {
    let document = JsonDocument::from_path(path)?;
    let parser = StatementParser::new(config)?;
    Ok(parser.parse(&document)?)
}

/// Render a result in the requested format.
pub fn format_result(result: &ParseResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ParseResult) -> anyhow::Result<String> {
    let columns = result.columns();
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(columns.iter().map(|c| c.label()))?;
    for record in &result.records {
        wtr.write_record(record.cells(&columns))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ParseResult) -> String {
    let columns = result.columns();
    let rows: Vec<Vec<String>> = result.records.iter().map(|r| r.cells(&columns)).collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.label().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut output = String::new();
    output.push_str(&format!("Document: {}\n", result.document));
    output.push_str(&format!("Records: {}\n\n", result.len()));
    output.push_str(&line(columns.iter().map(|c| c.label()).collect()));
    output.push('\n');

    for row in &rows {
        output.push_str(&line(row.iter().map(String::as_str).collect()));
        output.push('\n');
    }

    output
}
