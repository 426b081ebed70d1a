use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use indexa::cli::{calc::CalcOptions, compare::CompareOptions, series::SeriesOptions};
use indexa::core::calculator::parse_date;
use indexa::core::log::init_logging;
use indexa::core::{ScenarioMode, SeriesId};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct RangeArgs {
    /// First month of the period (YYYY-MM-DD or dd/mm/yyyy)
    #[arg(short, long, value_parser = parse_date_arg)]
    start: NaiveDate,

    /// Last month of the period (YYYY-MM-DD or dd/mm/yyyy)
    #[arg(short, long, value_parser = parse_date_arg)]
    end: NaiveDate,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Correct an amount by one scenario
    Calc {
        #[command(flatten)]
        range: RangeArgs,

        /// Scenario: ipca, selic or fixed
        #[arg(short, long)]
        mode: Option<ScenarioMode>,

        /// Initial amount
        #[arg(short, long)]
        principal: Option<f64>,

        /// Annual fixed rate in percent
        #[arg(short, long)]
        fixed_rate: Option<f64>,

        /// Skip the month by month table
        #[arg(long)]
        summary_only: bool,
    },
    /// Compare every scenario over the same period
    Compare {
        #[command(flatten)]
        range: RangeArgs,

        /// Initial amount
        #[arg(short, long)]
        principal: Option<f64>,

        /// Annual fixed rate in percent
        #[arg(short, long)]
        fixed_rate: Option<f64>,
    },
    /// Display the monthly rates of a series, including projected months
    Series {
        #[command(flatten)]
        range: RangeArgs,

        /// Series: ipca or selic
        #[arg(long, default_value = "ipca")]
        series: SeriesId,
    },
}

fn parse_date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input).map_err(|e| e.to_string())
}

impl From<Commands> for indexa::AppCommand {
    fn from(cmd: Commands) -> indexa::AppCommand {
        match cmd {
            Commands::Calc {
                range,
                mode,
                principal,
                fixed_rate,
                summary_only,
            } => indexa::AppCommand::Calc(CalcOptions {
                mode,
                principal,
                fixed_rate,
                start: range.start,
                end: range.end,
                json: range.json,
                summary_only,
            }),
            Commands::Compare {
                range,
                principal,
                fixed_rate,
            } => indexa::AppCommand::Compare(CompareOptions {
                principal,
                fixed_rate,
                start: range.start,
                end: range.end,
                json: range.json,
            }),
            Commands::Series { range, series } => indexa::AppCommand::Series(SeriesOptions {
                series,
                start: range.start,
                end: range.end,
                json: range.json,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => indexa::cli::setup::setup(),
        Some(cmd) => indexa::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
