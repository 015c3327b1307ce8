//! CLI entry point for the data quality monitor.

use anyhow::Result;
use clap::Parser;
use dq_monitor::{QualityError, QualityRunner, ReportGenerator, RunConfig, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Exit code used when the input tables have not been generated.
const EXIT_INPUTS_NOT_FOUND: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Rule-based data quality checks for workspace datasets",
    long_about = "Runs the fixed quality check suite over the occupancy, revenue and member \
                  tables and reports every finding.\n\n\
                  EXAMPLES:\n  \
                  # Check the tables in the current directory\n  \
                  dq-monitor\n\n  \
                  # Read from data/ and write the issue log to reports/\n  \
                  dq-monitor -d data -o reports/data_quality_report.csv\n\n  \
                  # Machine-readable report\n  \
                  dq-monitor --json --no-export"
)]
struct Args {
    /// Directory containing occupancy_data.csv, revenue_data.csv and member_data.csv
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Path of the CSV issue log (written only when issues are found)
    #[arg(short, long, default_value = dq_monitor::config::DEFAULT_ISSUE_LOG)]
    output: PathBuf,

    /// Do not write the CSV issue log
    #[arg(long)]
    no_export: bool,

    /// Output JSON to stdout instead of the human-readable summary
    ///
    /// Disables all logging; only the final JSON report is printed.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the report)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, args.json),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = RunConfig::builder()
        .data_dir(&args.data_dir)
        .issue_log_path(&args.output)
        .write_issue_log(!args.no_export)
        .build()?;

    info!("Starting data quality checks...");
    let outcome = QualityRunner::new(config).run()?;

    print_outcome(&outcome, args)
}

/// Print the report.
///
/// Uses `println!` intentionally: the report is the program's output and
/// must be visible regardless of log level.
fn print_outcome(outcome: &RunOutcome, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        return Ok(());
    }

    print!("{}", ReportGenerator::render_summary(&outcome.ledger));
    if let Some(ref path) = outcome.issue_log {
        println!("\nQuality report saved to: {}", path.display());
    }
    Ok(())
}

/// Print a failure and pick the exit code for it.
fn report_failure(err: &anyhow::Error, json: bool) -> ExitCode {
    let quality_error = err.downcast_ref::<QualityError>();

    if json {
        let payload = match quality_error {
            Some(e) => serde_json::to_string_pretty(e),
            None => serde_json::to_string_pretty(&serde_json::json!({
                "code": "INTERNAL_ERROR",
                "message": err.to_string(),
            })),
        };
        match payload {
            Ok(payload) => println!("{}", payload),
            Err(_) => eprintln!("Error: {}", err),
        }
    }

    match quality_error {
        Some(e) if e.is_inputs_not_found() => {
            if !json {
                eprintln!("Error: {}", e);
                eprintln!("Please run the data generator first to create the input tables.");
            }
            ExitCode::from(EXIT_INPUTS_NOT_FOUND)
        }
        _ => {
            error!("Quality check failed: {:#}", err);
            if !json {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
