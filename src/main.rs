use anyhow::Result;
use clap::{Parser, Subcommand};
use inr_usd_converter::core::Currency;
use inr_usd_converter::core::log::init_logging;
use inr_usd_converter::{AppCommand, RunOptions};

#[derive(Parser)]
#[command(version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Amount to convert, e.g. 100 or 1,250.50
    #[arg(allow_negative_numbers = true, value_parser = parse_amount, requires = "currency")]
    amount: Option<f64>,

    /// Currency the amount is in
    #[arg(value_enum, ignore_case = true)]
    currency: Option<Currency>,

    /// Display the current exchange rate
    #[arg(short, long, conflicts_with = "amount")]
    rate: bool,

    /// Use the cached/default rate without fetching a live one
    #[arg(long)]
    no_fetch: bool,

    /// Start the interactive converter
    #[arg(long, conflicts_with_all = ["amount", "rate"])]
    gui: bool,

    /// Decimal places to display
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=10))]
    precision: Option<u8>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
}

fn parse_amount(text: &str) -> Result<f64, String> {
    inr_usd_converter::cli::interactive::parse_amount(text)
        .ok_or_else(|| format!("'{text}' is not a valid amount"))
}

impl Cli {
    fn app_command(&self) -> AppCommand {
        match (self.amount, self.currency) {
            (Some(amount), Some(currency)) if !self.gui => AppCommand::Convert { amount, currency },
            _ if self.rate => AppCommand::Rate,
            _ => AppCommand::Interactive,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        None => {
            let options = RunOptions {
                config_path: cli.config_path.as_deref(),
                no_fetch: cli.no_fetch,
                precision: cli.precision.map(usize::from),
            };
            inr_usd_converter::run_command(cli.app_command(), &options).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> Result<()> {
    let path = inr_usd_converter::cli::setup::setup()?;
    println!("Created default configuration at {}", path.display());
    Ok(())
}
