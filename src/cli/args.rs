//! Command-line argument definitions for the Maji Ndogo processor

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Clean the Maji Ndogo field survey and weather station data
#[derive(Debug, Clone, Parser)]
#[command(
    name = "maji_processor",
    version,
    about = "Repair and validate the Maji Ndogo field survey and weather station datasets",
    long_about = "Loads the joined field survey from SQLite and the weather station messages \
                  from CSV, repairs the swapped yield/crop headers and crop name typos, \
                  classifies free-text weather messages into typed measurements, and checks \
                  the cleaned tables."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run both remediation pipelines and report what came out
    Process(ProcessArgs),
    /// Run both pipelines and check the cleaned tables
    Validate(ValidateArgs),
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// TOML configuration file; built-in survey defaults when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print every rejected row
    #[arg(long)]
    pub show_rejected: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// TOML configuration file; built-in survey defaults when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
