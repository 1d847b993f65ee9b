mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analytics::{MixArgs, TrendArgs};
use commands::classify::ClassifyArgs;
use commands::report::{ReportArgs, SeasonsArgs};

/// Season financial reports from a flat table of line items
#[derive(Parser)]
#[command(
    name = "cfr",
    version,
    about = "Season financial reports: P&L rollups, variances and margins",
    long_about = "Reads a season table (Year, Type, Category, Item, Amount, IsActual, \
                  IsBudget, IsPriorYear) as CSV and produces item, category and type \
                  rollups with variance to budget and prior year, net profit margins, \
                  cash balance, category mix and season trends."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Report configuration file (.yaml, .yml or .json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log ingestion and rollup details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the seasons present in the table
    Seasons(SeasonsArgs),
    /// Full season report (all levels, margins, cash balance)
    Report(ReportArgs),
    /// P&L by category with variance to budget and prior year
    Pnl(ReportArgs),
    /// Item-level breakdown with category subtotals
    Breakdown(ReportArgs),
    /// Summary position: type totals, net profit and cash balance
    Summary(ReportArgs),
    /// Category mix for one type and series (top N plus Other)
    Mix(MixArgs),
    /// Series total per season
    Trend(TrendArgs),
    /// Classify a single variance and format it
    Classify(ClassifyArgs),
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

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Seasons(args) => commands::report::run_seasons(args, config),
        Commands::Report(args) => commands::report::run_report(args, config),
        Commands::Pnl(args) => commands::report::run_pnl(args, config),
        Commands::Breakdown(args) => commands::report::run_breakdown(args, config),
        Commands::Summary(args) => commands::report::run_summary(args, config),
        Commands::Mix(args) => commands::analytics::run_mix(args, config),
        Commands::Trend(args) => commands::analytics::run_trend(args, config),
        Commands::Classify(args) => commands::classify::run_classify(args, config),
        Commands::Version => {
            println!("cfr {}", env!("CARGO_PKG_VERSION"));
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
