mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::payments::PayArgs;
use commands::penalty::{AccrueArgs, SweepArgs};
use commands::schedule::ScheduleArgs;

/// Loan amortisation schedules and late-penalty accrual
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Loan amortisation schedules and late-penalty accrual",
    long_about = "Generates French-method (constant payment) amortisation schedules \
                  with decimal precision, and brings late penalties on overdue \
                  installments up to date. Input is read from --input, piped \
                  stdin JSON, or individual flags. Set RUST_LOG for diagnostics."
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
    /// Generate the installment schedule for a loan
    Schedule(ScheduleArgs),
    /// Accrue late penalty on a single installment
    Accrue(AccrueArgs),
    /// Accrue late penalties across a batch of installments
    Sweep(SweepArgs),
    /// Apply a payment to a loan's open installments, oldest first
    Pay(PayArgs),
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
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Accrue(args) => commands::penalty::run_accrue(args),
        Commands::Sweep(args) => commands::penalty::run_sweep(args),
        Commands::Pay(args) => commands::payments::run_pay(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
