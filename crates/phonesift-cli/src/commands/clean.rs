use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::sheet::{self, SheetFormat};
use anyhow::{Context as _, Result};
use clap::Args;
use phonesift_core::{CleanStats, Cleaner, Row};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Contact sheet exported as CSV or JSON
    pub input: PathBuf,
    /// Where to write the cleaned rows (stdout when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Where to write the untouched input rows
    #[arg(long)]
    pub originals_out: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub format: Option<SheetFormat>,
}

#[derive(Debug, Serialize)]
struct CleanReport {
    input: String,
    format: &'static str,
    kept: usize,
    stats: CleanStats,
    output: Option<String>,
    originals_output: Option<String>,
}

pub fn clean(ctx: &Context<'_>, args: CleanArgs) -> Result<()> {
    if ctx.json && args.out.is_none() {
        return Err(invalid_input("--json requires --out for clean"));
    }
    if !args.input.is_file() {
        return Err(not_found(format!("input sheet {}", args.input.display())));
    }
    let format = match args.format {
        Some(format) => format,
        None => SheetFormat::detect(&args.input).ok_or_else(|| {
            invalid_input(format!(
                "cannot detect sheet format of {}; pass --format",
                args.input.display()
            ))
        })?,
    };
    debug!(path = %args.input.display(), format = format.as_str(), "reading sheet");

    let rows = sheet::read_rows(&args.input, format)
        .with_context(|| format!("read sheet {}", args.input.display()))?;
    debug!(rows = rows.len(), "sheet loaded");

    let options = ctx
        .config
        .cleaner_options()
        .with_context(|| "build cleaner options")?;
    let mut cleaner = Cleaner::new(options);
    let outcome = cleaner.process_rows(&rows)?;
    info!(
        total = outcome.stats.total_processed,
        duplicates = outcome.stats.duplicates_removed,
        invalid = outcome.stats.invalid_phones,
        registered = cleaner.registered_count(),
        "sheet cleaned"
    );

    let columns = cleaner.options().columns.export_columns();
    let cleaned: Vec<Row> = outcome
        .kept_records
        .iter()
        .map(|record| sheet::project(&record.row, &columns))
        .collect();

    match args.out.as_deref() {
        Some(path) => write_sheet(path, &cleaned, format)?,
        None => {
            let stdout = io::stdout().lock();
            sheet::write_rows(stdout, &cleaned, format).with_context(|| "write cleaned rows")?;
        }
    }
    if let Some(path) = args.originals_out.as_deref() {
        write_sheet(path, &outcome.original_rows, format)?;
    }

    let report = CleanReport {
        input: args.input.display().to_string(),
        format: format.as_str(),
        kept: outcome.kept_records.len(),
        stats: outcome.stats,
        output: args.out.as_ref().map(|path| path.display().to_string()),
        originals_output: args
            .originals_out
            .as_ref()
            .map(|path| path.display().to_string()),
    };

    if ctx.json {
        return print_json(&report);
    }

    // Cleaned rows may own stdout; the summary goes to stderr then.
    let mut summary: Box<dyn Write> = if args.out.is_some() {
        Box::new(io::stdout().lock())
    } else {
        Box::new(io::stderr().lock())
    };
    writeln!(
        summary,
        "Processed {} rows: kept {}, removed {} duplicates, {} without a valid phone",
        report.stats.total_processed,
        report.kept,
        report.stats.duplicates_removed,
        report.stats.invalid_phones
    )?;
    if let Some(output) = &report.output {
        writeln!(summary, "Cleaned rows written to {}", output)?;
    }
    if let Some(output) = &report.originals_output {
        writeln!(summary, "Original rows written to {}", output)?;
    }
    Ok(())
}

fn write_sheet(path: &Path, rows: &[Row], format: SheetFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output directory {}", parent.display()))?;
        }
    }
    let file =
        File::create(path).with_context(|| format!("create output file {}", path.display()))?;
    sheet::write_rows(BufWriter::new(file), rows, format)
        .with_context(|| format!("write sheet {}", path.display()))?;
    Ok(())
}
