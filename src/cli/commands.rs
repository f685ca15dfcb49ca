//! Command implementations for the CLI

use crate::cli::args::{Args, Commands, OutputFormat, ProcessArgs, ValidateArgs};
use crate::config::PipelineConfig;
use crate::models::RejectedRow;
use crate::processor::{self, ProcessingSummary, RemediationRun};
use crate::validation::{self, ValidationReport};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("maji_processor={}", log_level)));

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// Load the configuration file, or the built-in survey defaults
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            PipelineConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => {
            debug!("No configuration file given, using defaults");
            PipelineConfig::default()
        }
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the selected command; `Ok(false)` means the command ran but failed its checks
pub fn run(args: Args) -> Result<bool> {
    match args.command {
        Some(Commands::Process(process_args)) => run_process(&process_args).map(|_| true),
        Some(Commands::Validate(validate_args)) => run_validate(&validate_args),
        None => Ok(true),
    }
}

#[derive(Serialize)]
struct ProcessReport<'a> {
    summary: ProcessingSummary,
    field_rejected: &'a [RejectedRow],
    weather_rejected: &'a [RejectedRow],
}

pub fn run_process(args: &ProcessArgs) -> Result<ProcessingSummary> {
    setup_logging(args.verbose);
    let config = load_config(args.config.as_deref())?;

    let run = processor::run(&config).context("Remediation run failed")?;
    let summary = run.summary();

    match args.format {
        OutputFormat::Json => {
            let report = ProcessReport {
                summary: summary.clone(),
                field_rejected: run.field.rejected(),
                weather_rejected: run.weather.rejected(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print_summary(&summary);
            if args.show_rejected {
                print_rejected(&run);
            }
        }
    }

    Ok(summary)
}

pub fn run_validate(args: &ValidateArgs) -> Result<bool> {
    setup_logging(args.verbose);
    let config = load_config(args.config.as_deref())?;

    let run = processor::run(&config).context("Remediation run failed")?;
    let reports = vec![
        validation::check_field_frame(run.field.frame())?,
        validation::check_weather_frame(&run.weather.to_frame()?)?,
    ];
    let clean = reports.iter().all(ValidationReport::is_clean);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                print_report(report);
            }
        }
    }

    Ok(clean)
}

fn print_summary(summary: &ProcessingSummary) {
    println!("\n{}", "Maji Ndogo remediation complete".green().bold());
    println!("{}", "━".repeat(40));
    println!("{}", "Field survey:".bold());
    println!("   • Rows read: {}", summary.field_rows_in);
    println!("   • Rows kept: {}", summary.field_rows_out);
    if summary.field_rows_rejected > 0 {
        println!(
            "   • Rows rejected: {}",
            summary.field_rows_rejected.to_string().yellow()
        );
    }
    println!("{}", "Weather stations:".bold());
    println!("   • Messages read: {}", summary.weather_messages_in);
    println!("   • Measurements: {}", summary.weather_measurements_out);
    if summary.weather_unparsed > 0 {
        println!(
            "   • Unmatched messages: {}",
            summary.weather_unparsed.to_string().yellow()
        );
    }
    if summary.weather_invalid > 0 {
        println!(
            "   • Invalid values: {}",
            summary.weather_invalid.to_string().yellow()
        );
    }
    println!("   • Station mapping rows: {}", summary.station_mapping_rows);
    println!("   • Processing time: {}ms", summary.processing_time_ms);
    println!();
}

fn print_rejected(run: &RemediationRun) {
    let groups = [
        ("field", run.field.rejected()),
        ("weather", run.weather.rejected()),
    ];
    for (table, rows) in groups {
        for rejected in rows {
            println!(
                "{} {} row {} ({:?}): {}",
                "rejected".yellow(),
                table,
                rejected.row,
                rejected.kind,
                rejected.reason
            );
        }
    }
}

fn print_report(report: &ValidationReport) {
    if report.is_clean() {
        println!(
            "{} {} table: {} rows, all checks passed",
            "✓".green(),
            report.table,
            report.rows
        );
        return;
    }

    println!(
        "{} {} table: {} violations in {} rows",
        "✗".red(),
        report.table,
        report.violations.len(),
        report.rows
    );
    for violation in &report.violations {
        println!("   • [{}] {}", violation.check.yellow(), violation.detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_config_rejects_bad_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sql_query = 42").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Some(Path::new("/nonexistent/maji.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("maji.toml"));
    }
}
