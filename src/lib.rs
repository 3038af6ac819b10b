pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{Converter, Currency, RefreshPolicy};
use crate::providers::ExchangeRateApiProvider;
use anyhow::{Result, bail};
use std::sync::Arc;
use tracing::{debug, info};

/// Largest number of decimal places accepted for display.
pub const MAX_PRECISION: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    Convert { amount: f64, currency: Currency },
    Rate,
    Interactive,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions<'a> {
    pub config_path: Option<&'a str>,
    pub no_fetch: bool,
    pub precision: Option<usize>,
}

pub async fn run_command(command: AppCommand, options: &RunOptions<'_>) -> Result<()> {
    info!("INR-USD converter starting...");

    let config = match options.config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let precision = options.precision.unwrap_or(config.precision);
    if precision > MAX_PRECISION {
        bail!("Precision must be between 0 and {MAX_PRECISION}, got {precision}");
    }

    let api = &config.providers.exchangerate_api;
    if api.timeout_secs == 0 {
        bail!("Exchange rate API timeout must be at least 1 second, got 0");
    }
    let source = Arc::new(ExchangeRateApiProvider::new(&api.base_url, api.timeout()));

    // One-shot commands fetch explicitly up front, so only the interactive
    // session refreshes on its own.
    let policy = match command {
        AppCommand::Interactive if !options.no_fetch => RefreshPolicy::Background,
        _ => RefreshPolicy::Never,
    };
    let converter = Converter::new(source, config.converter_settings(policy))?;

    match command {
        AppCommand::Convert { amount, currency } => {
            if !options.no_fetch {
                cli::convert::fetch_with_feedback(&converter).await;
            }
            cli::convert::run(&converter, amount, currency, precision).await
        }
        AppCommand::Rate => {
            if !options.no_fetch {
                cli::convert::fetch_with_feedback(&converter).await;
            }
            cli::convert::run_rate(&converter, precision).await
        }
        AppCommand::Interactive => {
            cli::interactive::run(converter, precision, !options.no_fetch).await
        }
    }
}
