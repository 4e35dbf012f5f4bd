use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{KpiResult, SalesColumn, StatsTable};
use crate::pipeline::SalesAnalysis;
use crate::processor::InputSource;
use crate::storage::{StorageManager, XLSX_MIME};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod charts;
mod config;
mod error;
mod models;
mod pipeline;
mod processor;
mod storage;

#[derive(Parser)]
#[command(
    name = "sales-analyzer",
    version,
    about = "Sales CSV analyzer: KPIs, charts and an Excel report"
)]
struct Cli {
    /// TOML file with an [analyzer] section
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a sales CSV (falls back to the configured default file)
    Analyze {
        input: Option<PathBuf>,

        /// Directory for the generated report, overrides the config
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also write both charts as SVG and as JSON chart specs
        #[arg(long)]
        charts: bool,
    },
    /// Print the data sheet of a previously generated report
    Inspect { report: PathBuf },
    /// Print the effective configuration as TOML
    Config {
        /// Check this TOML file on its own, without environment overrides
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match AnalyzerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Command::Config { file } = &cli.command {
        let shown = match file {
            Some(path) => AnalyzerConfig::from_file(path),
            None => Ok(config),
        };
        return match shown.and_then(|c| c.to_toml()) {
            Ok(text) => {
                print!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Configuration error: {:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = init_logging(&config.log_file) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    let (label, result) = match cli.command {
        Command::Analyze {
            input,
            out_dir,
            charts,
        } => {
            let label = input
                .as_deref()
                .unwrap_or(&config.default_input)
                .display()
                .to_string();
            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            (label, run_analyze(&config, input.as_deref(), &out_dir, charts))
        }
        Command::Inspect { report } => (report.display().to_string(), run_inspect(&report)),
        Command::Config { .. } => return ExitCode::SUCCESS,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, &label);
            ExitCode::FAILURE
        }
    }
}

/// Logs to stdout and to a log file truncated on every start.
fn init_logging(log_file: &Path) -> Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file: {}", log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

fn run_analyze(
    config: &AnalyzerConfig,
    input: Option<&Path>,
    out_dir: &Path,
    write_charts: bool,
) -> AnalyzerResult<()> {
    let source = InputSource::resolve(input, &config.default_input)?;
    if let InputSource::Default(path) = &source {
        println!("Loaded default file: {}", path.display());
    }

    let bytes = source.read_bytes()?;
    let analysis = SalesAnalysis::from_bytes(&bytes, config)?;
    let outputs = analysis.run()?;

    println!("== Data preview ({} rows) ==", analysis.table().len());
    println!("{}", analysis.frame().head(Some(config.preview_rows)));

    println!("\n== Key performance indicators ==");
    print_kpis(&outputs.kpis);

    println!("\n== Descriptive statistics ==");
    print_stats(&outputs.stats)?;

    let file_name = StorageManager::report_file_name(&config.report_prefix, source.path());
    let report_path = StorageManager::write_report(out_dir, &file_name, &outputs.report)?;
    println!("\nReport ({}): {}", XLSX_MIME, report_path.display());

    if write_charts {
        let stem = file_name.trim_end_matches(".xlsx");
        for (suffix, spec) in ["trend", "categories"].iter().zip(outputs.charts.iter()) {
            let svg = charts::render_svg(spec, charts::CHART_SIZE)?;
            let svg_path = out_dir.join(format!("{}_{}.svg", stem, suffix));
            std::fs::write(&svg_path, svg)
                .with_context(|| format!("Failed to write chart: {}", svg_path.display()))?;

            let json_path = out_dir.join(format!("{}_{}.json", stem, suffix));
            let json =
                serde_json::to_string_pretty(spec).context("Failed to serialize chart spec")?;
            std::fs::write(&json_path, json)
                .with_context(|| format!("Failed to write chart spec: {}", json_path.display()))?;

            println!("Chart: {}", svg_path.display());
        }
    }

    info!("Finished processing file: {}", source.path().display());
    Ok(())
}

fn run_inspect(report: &Path) -> AnalyzerResult<()> {
    let bytes = std::fs::read(report)
        .with_context(|| format!("Failed to read report: {}", report.display()))?;
    let table = storage::read_data_sheet(&bytes)?;

    println!("{}", table.to_dataframe()?);
    info!("Inspected {} rows from {}", table.len(), report.display());
    Ok(())
}

fn print_kpis(kpis: &KpiResult) {
    println!("Całkowita Sprzedaż:          {:.2} PLN", kpis.total_sales);
    println!("Średnia Wartość Transakcji:  {:.2} PLN", kpis.average_sale);
    println!("Top Produkt (ilościowo):     {}", kpis.top_product);
}

fn print_stats(stats: &StatsTable) -> AnalyzerResult<()> {
    println!("{}", stats.to_dataframe()?);
    Ok(())
}

fn report_failure(err: &AnalyzerError, label: &str) {
    match err {
        AnalyzerError::MissingFile(path) => {
            eprintln!(
                "Nie znaleziono domyślnego pliku `{}`. Wskaż plik CSV do analizy.",
                path.display()
            );
            let expected: Vec<&str> = SalesColumn::REQUIRED.iter().map(|c| c.label()).collect();
            eprintln!("Oczekiwane kolumny CSV: {}", expected.join(", "));
            error!("{}", err);
        }
        _ if err.is_recoverable() => {
            eprintln!("Błąd przetwarzania pliku: {}", err);
            error!("Validation or processing error for file {}: {}", label, err);
        }
        _ => {
            eprintln!("Wystąpił nieoczekiwany błąd podczas przetwarzania pliku {}.", label);
            error!("Unexpected application error for file {}: {:#}", label, err);
        }
    }
}
