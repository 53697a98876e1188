//! Payoff Engine CLI
//!
//! Reads a loan set from CSV, simulates paying it down with a monthly budget
//! and writes the resulting schedule to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- loans.csv --budget 500 --strategy avalanche > schedule.csv
//! cargo run -- loans.csv --budget 500 --compare
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use clap::{Parser, ValueEnum};
use log::info;
use payoff_engine::config::DEFAULT_MAX_MONTHS;
use payoff_engine::report::{write_json, write_schedule_csv, write_summary_csv};
use payoff_engine::{
    load_loans, PayoffEngine, PortfolioOverview, Result, ScheduleSummary, SimulationConfig,
    Strategy,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "payoff-engine",
    version,
    about = "Simulate a month-by-month debt payoff schedule"
)]
struct Cli {
    /// CSV file with columns id,name,balance,annual_rate_percent,minimum_payment
    loans: PathBuf,

    /// Total amount available for loan payments each month
    #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
    budget: Decimal,

    /// snowball, avalanche, highest_balance, lowest_payment, highest_payment or custom
    #[arg(long, default_value = "snowball", value_parser = parse_strategy)]
    strategy: Strategy,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Print a one-row summary instead of the full schedule
    #[arg(long, conflicts_with = "compare")]
    summary: bool,

    /// Print a summary row for every ranked strategy
    #[arg(long)]
    compare: bool,

    /// Stop after this many months if the debt is not paid off
    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    max_months: u32,
}

fn parse_amount(s: &str) -> std::result::Result<Decimal, String> {
    Decimal::from_str(s.trim()).map_err(|e| format!("'{}' is not an amount: {}", s, e))
}

fn parse_strategy(s: &str) -> std::result::Result<Strategy, String> {
    Ok(Strategy::parse(s))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let file = File::open(&cli.loans)?;
    let loans = load_loans(BufReader::new(file))?;

    let overview = PortfolioOverview::new(&loans, cli.budget)?;
    info!(
        "Loaded {} loans ({} active), total debt {}, minimums {}, surplus {}",
        overview.loan_count,
        overview.active_loan_count,
        overview.total_debt,
        overview.total_minimum_payment,
        overview.surplus
    );

    let engine =
        PayoffEngine::with_config(SimulationConfig::default().with_max_months(cli.max_months));

    let stdout = io::stdout();
    let handle = stdout.lock();

    if cli.compare {
        let summaries: Vec<ScheduleSummary> = engine
            .compare(&loans, cli.budget)?
            .iter()
            .map(|s| s.summary())
            .collect();
        return match cli.format {
            OutputFormat::Csv => write_summary_csv(&summaries, handle),
            OutputFormat::Json => write_json(&summaries, handle),
        };
    }

    let schedule = engine.simulate(&loans, cli.strategy, cli.budget)?;
    info!(
        "Strategy {} finished with status {} after {} months",
        schedule.strategy,
        schedule.status.as_str(),
        schedule.months.len()
    );

    if cli.summary {
        let summary = schedule.summary();
        return match cli.format {
            OutputFormat::Csv => write_summary_csv(&[summary], handle),
            OutputFormat::Json => write_json(&summary, handle),
        };
    }

    match cli.format {
        OutputFormat::Csv => write_schedule_csv(&schedule, handle),
        OutputFormat::Json => write_json(&schedule, handle),
    }
}
