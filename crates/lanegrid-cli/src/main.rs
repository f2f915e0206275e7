//! lanegrid CLI - Timeline Grid Engine
//!
//! Command-line interface for checking interval files and laying them out
//! as a week-aligned grid.

mod diagnostics;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diagnostics::{DiagnosticConfig, ExitCode, JsonEmitter, TerminalEmitter};
use lanegrid_core::{DiagnosticEmitter, GridConfig, RawInterval};
use lanegrid_engine::{normalize, parse_date, BuildOutput, GridBuilder, GridModel};

#[derive(Parser)]
#[command(name = "lanegrid")]
#[command(author, version, about = "Timeline grid engine", long_about = None)]
struct Cli {
    /// Verbose output (-v warnings, -vv info, -vvv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an interval file without building a grid
    Check {
        /// Input file (JSON array or TOML with [[intervals]])
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Grid configuration (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors
        #[arg(short, long)]
        quiet: bool,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Build the grid model
    Layout {
        /// Input file (JSON array or TOML with [[intervals]])
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Grid configuration (TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reference date for the today column (defaults to the local date)
        #[arg(long, value_parser = parse_today)]
        today: Option<NaiveDate>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = LayoutFormat::Json)]
        format: LayoutFormat,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Only show errors
        #[arg(short, long)]
        quiet: bool,

        /// Diagnostic format on stderr
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        diagnostics: ReportFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutFormat {
    Json,
    Summary,
}

fn parse_today(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", text))
}

fn main() -> Result<process::ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let code = match cli.command {
        Commands::Check {
            file,
            config,
            strict,
            quiet,
            format,
        } => {
            let diag = DiagnosticConfig {
                strict,
                quiet,
                ..Default::default()
            }
            .with_input(&file);
            cmd_check(&file, config.as_deref(), diag, format)?
        }
        Commands::Layout {
            file,
            config,
            today,
            output,
            format,
            strict,
            quiet,
            diagnostics,
        } => {
            let diag = DiagnosticConfig {
                strict,
                quiet,
                ..Default::default()
            }
            .with_input(&file);
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            cmd_layout(&file, config.as_deref(), today, output.as_deref(), format, diag, diagnostics)?
        }
    };

    Ok(code.into())
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_check(
    file: &Path,
    config: Option<&Path>,
    diag: DiagnosticConfig,
    format: ReportFormat,
) -> Result<ExitCode> {
    // Loaded only so a broken config fails here rather than at layout time
    load_config(config)?;
    let raw = load_intervals(file)?;
    let normalized = normalize(&raw);
    let diagnostics = normalized.skipped.iter().map(|s| s.to_diagnostic());

    match format {
        ReportFormat::Text => {
            let mut emitter = TerminalEmitter::new(io::stderr().lock(), diag.clone());
            diagnostics.for_each(|d| emitter.emit(d));
            if !diag.quiet {
                println!(
                    "{}: {} intervals ok, {} skipped",
                    file.display(),
                    normalized.intervals.len(),
                    normalized.skipped.len()
                );
            }
            Ok(emitter.exit_code())
        }
        ReportFormat::Json => {
            let mut emitter = JsonEmitter::new(diag);
            diagnostics.for_each(|d| emitter.emit(d));
            let report = serde_json::json!({
                "file": file.display().to_string(),
                "intervals": normalized.intervals.len(),
                "skipped": normalized.skipped,
                "diagnostics": emitter.to_json_value(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(emitter.exit_code())
        }
    }
}

fn cmd_layout(
    file: &Path,
    config: Option<&Path>,
    today: NaiveDate,
    output: Option<&Path>,
    format: LayoutFormat,
    diag: DiagnosticConfig,
    diagnostics: ReportFormat,
) -> Result<ExitCode> {
    let config = load_config(config)?;
    let raw = load_intervals(file)?;
    debug!(records = raw.len(), %today, "building grid");

    let built = GridBuilder::new(config).build(&raw, today);

    let rendered = match format {
        LayoutFormat::Json => serde_json::to_string_pretty(&built.grid)?,
        LayoutFormat::Summary => render_summary(&built.grid),
    };
    match output {
        Some(path) => fs::write(path, rendered + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
        }
    }

    Ok(emit_build_diagnostics(&built, diag, diagnostics))
}

fn emit_build_diagnostics(
    built: &BuildOutput,
    diag: DiagnosticConfig,
    format: ReportFormat,
) -> ExitCode {
    match format {
        ReportFormat::Text => {
            let mut emitter = TerminalEmitter::new(io::stderr().lock(), diag);
            built.diagnostics().into_iter().for_each(|d| emitter.emit(d));
            emitter.exit_code()
        }
        ReportFormat::Json => {
            let mut emitter = JsonEmitter::new(diag);
            built.diagnostics().into_iter().for_each(|d| emitter.emit(d));
            eprintln!("{}", emitter.to_json_value());
            emitter.exit_code()
        }
    }
}

/// Plain-text row listing: one line per row, group label on its first row
fn render_summary(grid: &GridModel) -> String {
    let mut out = format!(
        "{} rows, columns {}..{} ({} .. {})\n",
        grid.row_count(),
        grid.columns.first_column(),
        grid.columns.last_column(),
        grid.columns.start(),
        grid.columns.end()
    );

    // Padding counts chars, not bytes
    let width = grid.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for run in grid.group_runs() {
        for (offset, row) in grid.rows[run.first_row..run.first_row + run.row_count]
            .iter()
            .enumerate()
        {
            let label = if offset == 0 { run.label.as_str() } else { "" };
            let cells: Vec<String> = row
                .intervals
                .iter()
                .map(|p| format!("{} [{}-{}]", p.interval.id, p.span.start, p.span.end))
                .collect();
            out.push_str(&format!("{:<width$}  {}\n", label, cells.join(", "), width = width));
        }
    }
    out.truncate(out.trim_end().len());
    out
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Deserialize)]
struct IntervalFile {
    #[serde(default)]
    intervals: Vec<RawInterval>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonIntervals {
    List(Vec<RawInterval>),
    File(IntervalFile),
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn load_intervals(path: &Path) -> Result<Vec<RawInterval>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if is_toml(path) {
        let file: IntervalFile =
            toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
        return Ok(file.intervals);
    }
    let parsed: JsonIntervals = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(match parsed {
        JsonIntervals::List(list) => list,
        JsonIntervals::File(file) => file.intervals,
    })
}

fn load_config(path: Option<&Path>) -> Result<GridConfig> {
    let Some(path) = path else {
        return Ok(GridConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: GridConfig = if is_toml(path) {
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?
    };
    if let Err(e) = config.validate() {
        bail!("invalid config {}: {}", path.display(), e);
    }
    Ok(config)
}
