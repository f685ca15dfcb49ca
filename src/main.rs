use clap::Parser;
use maji_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(true) => process::exit(0),
        Ok(false) => {
            // Checks ran but found violations; they have already been reported
            process::exit(1);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Maji Ndogo Processor - Agricultural Survey Remediation");
    println!("======================================================");
    println!();
    println!("Repair the Maji Ndogo field survey and classify weather station");
    println!("messages into typed measurements ready for analysis.");
    println!();
    println!("USAGE:");
    println!("    maji_processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Run both remediation pipelines and report the results");
    println!("    validate    Run both pipelines and check the cleaned tables");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process with the built-in survey locations:");
    println!("    maji_processor process");
    println!();
    println!("    # Use a local configuration and print a JSON report:");
    println!("    maji_processor process --config maji.toml --format json");
    println!();
    println!("    # Check the cleaned tables:");
    println!("    maji_processor validate --config maji.toml");
}
