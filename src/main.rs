use analytics::{apply_filters, StatisticsEngine};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use core_types::{DateRange, ExamResultRecord, FilterCriteria};
use datastore::ResultsRepository;
use reporting::{build_report, ReportOutcome};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Examiner results application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => handle_serve().await,
        Commands::Stats(args) => handle_stats(args).await,
        Commands::Export(args) => handle_export(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Reporting and export tooling for graded exam results.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP boundary serving results, exports and grading submissions.
    Serve,
    /// Print the descriptive statistics for a filtered result set.
    Stats(FilterArgs),
    /// Write the CSV, XLSX and PDF artifacts for a filtered result set.
    Export(ExportArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Restrict to these exam ids (repeat the flag for several exams).
    #[arg(long = "exam-id")]
    exam_ids: Vec<String>,

    /// The start of the date range (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The end of the date range (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Directory the artifacts are written into.
    #[arg(long, default_value = "exports")]
    out_dir: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve() -> anyhow::Result<()> {
    let settings = configuration::load_config()?;
    let addr: SocketAddr = settings
        .server
        .address()
        .parse()
        .context("invalid server.host/server.port configuration")?;
    tracing::info!(%addr, "Configuration loaded; starting the web server.");
    web_server::run_server(addr, settings).await
}

async fn handle_stats(args: FilterArgs) -> anyhow::Result<()> {
    let Some((records, criteria)) = load_filtered_input(&args).await? else {
        return Ok(());
    };

    let filtered = apply_filters(&records, &criteria)?;
    if filtered.is_empty() {
        println!("No results match the selected filters.");
        return Ok(());
    }

    let summary = StatisticsEngine::new().compute(&filtered)?.rounded();

    let mut table = Table::new();
    table.set_header(vec!["Métrica", "Valor"]);
    table.add_row(vec!["Total Exámenes".to_string(), summary.total.to_string()]);
    table.add_row(vec!["Promedio (%)".to_string(), format!("{:.2}", summary.mean)]);
    table.add_row(vec!["Máximo (%)".to_string(), format!("{:.2}", summary.max)]);
    table.add_row(vec!["Mínimo (%)".to_string(), format!("{:.2}", summary.min)]);
    table.add_row(vec![
        "Desviación estándar".to_string(),
        match summary.std_dev {
            Some(value) => format!("{value:.2}"),
            None => "no definida (menos de dos registros)".to_string(),
        },
    ]);
    println!("{table}");

    Ok(())
}

async fn handle_export(args: ExportArgs) -> anyhow::Result<()> {
    let Some((records, criteria)) = load_filtered_input(&args.filter).await? else {
        return Ok(());
    };

    let bundle = match build_report(&records, &criteria)? {
        ReportOutcome::NoMatches => {
            println!("No results match the selected filters; nothing to export.");
            return Ok(());
        }
        ReportOutcome::Report(bundle) => bundle,
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("could not create {}", args.out_dir.display()))?;

    let exports = bundle.exports;
    for artifact in [exports.csv, exports.workbook, exports.document] {
        let path = args.out_dir.join(artifact.filename);
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("could not write {}", path.display()))?;
        println!("Wrote {} ({} bytes)", path.display(), artifact.bytes.len());
    }

    Ok(())
}

/// Loads the full result set and assembles the filter criteria from the CLI
/// arguments. Returns `None` (after reporting it) when the datastore holds
/// no records at all.
async fn load_filtered_input(
    args: &FilterArgs,
) -> anyhow::Result<Option<(Vec<ExamResultRecord>, FilterCriteria)>> {
    let pool = datastore::connect().await?;
    let repo = ResultsRepository::new(pool);
    let records = repo.fetch_all_results().await?;

    if records.is_empty() {
        println!("The datastore holds no graded exams yet.");
        return Ok(None);
    }

    let span = DateRange::spanning(&records).expect("non-empty record set has a span");
    let date_range = DateRange::new(
        args.from.unwrap_or(span.start),
        args.to.unwrap_or(span.end),
    );
    let criteria = if args.exam_ids.is_empty() {
        FilterCriteria::all_exams(date_range)
    } else {
        FilterCriteria {
            exam_ids: Some(args.exam_ids.iter().cloned().collect::<BTreeSet<String>>()),
            date_range,
        }
    };

    Ok(Some((records, criteria)))
}
