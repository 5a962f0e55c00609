mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compliance::ComplianceArgs;
use commands::rates::RateArgs;
use commands::schedule::ScheduleArgs;
use commands::simulate::SimulateArgs;

/// Microcredit loan simulation with decimal precision
#[derive(Parser)]
#[command(
    name = "mcs",
    version,
    about = "Microcredit loan simulation with decimal precision",
    long_about = "A CLI for microcredit quote calculations: French-method amortization \
                  schedules, effective-rate conversion, term-reduction estimates under \
                  extra payments, and usury-cap compliance by product tier."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full loan simulation (schedule, term reduction, compliance)
    Simulate(SimulateArgs),
    /// Build an amortization schedule from an already-periodic rate
    Schedule(ScheduleArgs),
    /// Convert between annual effective and periodic rates
    Rate(RateArgs),
    /// Classify a rate against product-tier usury caps
    Compliance(ComplianceArgs),
    /// List the product tiers and their caps
    Tiers,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Rate(args) => commands::rates::run_rate(args),
        Commands::Compliance(args) => commands::compliance::run_compliance(args),
        Commands::Tiers => commands::compliance::run_tiers(),
        Commands::Version => {
            println!("mcs {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
