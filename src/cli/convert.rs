use super::ui;
use crate::core::{Converter, Currency, RateSnapshot};
use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment};
use tracing::debug;

/// Fetches the live rate with a spinner, warning on stderr when it fails.
pub async fn fetch_with_feedback(converter: &Converter) -> bool {
    let pb = ui::new_spinner("Fetching live exchange rate...");
    let fetched = converter.fetch_rate().await;
    pb.finish_and_clear();

    if !fetched {
        eprintln!(
            "{}",
            ui::style_text(
                "Warning: could not fetch live rate, using cached/default rate.",
                ui::StyleType::Warning
            )
        );
    }
    fetched
}

/// `$100.00 USD = ₹8,312.00 INR`
pub fn conversion_text(amount: f64, from: Currency, result: f64, precision: usize) -> String {
    format!(
        "{} = {}",
        ui::format_money(amount, from, precision),
        ui::format_money(result, from.other(), precision)
    )
}

pub fn rate_table(snapshot: &RateSnapshot, precision: usize) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Rate"),
        ui::header_cell("Inverse"),
        ui::header_cell("Source"),
        ui::header_cell("Last Updated"),
    ]);

    let updated = snapshot
        .updated_at
        .map_or("never".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());

    table.add_row(vec![
        Cell::new("USD/INR"),
        Cell::new(ui::format_amount(snapshot.rate, precision)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.6}", 1.0 / snapshot.rate)).set_alignment(CellAlignment::Right),
        Cell::new(ui::rate_status(snapshot)),
        Cell::new(updated),
    ]);

    table.to_string()
}

pub async fn run(
    converter: &Converter,
    amount: f64,
    currency: Currency,
    precision: usize,
) -> Result<()> {
    if !amount.is_finite() {
        bail!("Amount must be a finite number, got {}", amount);
    }

    let result = converter.convert(amount, currency.direction()).await;
    debug!(amount, %currency, result, "Converted amount");

    println!(
        "{}",
        ui::style_text(
            &conversion_text(amount, currency, result, precision),
            ui::StyleType::Value
        )
    );
    println!(
        "{}",
        ui::styled_rate_line(&converter.snapshot(), precision)
    );
    Ok(())
}

pub async fn run_rate(converter: &Converter, precision: usize) -> Result<()> {
    let rate = converter.get_rate().await;
    debug!(rate, "Displaying exchange rate");

    let snapshot = converter.snapshot();
    println!("{}\n", ui::styled_rate_line(&snapshot, precision));
    println!("{}", rate_table(&snapshot, precision));
    Ok(())
}
