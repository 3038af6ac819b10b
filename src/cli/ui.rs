use crate::core::{Currency, RateSnapshot};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Value,
    Success,
    Warning,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Success => style(text).green(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Creates a spinner shown while waiting on the network.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Formats a number with thousands separators, e.g. `8312.5` -> `8,312.50`.
pub fn format_amount(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", precision, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    // amounts that round to zero print without a sign
    let negative = value < 0.0 && formatted.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Formats an amount with its currency, e.g. `₹8,312.00 INR`.
pub fn format_money(value: f64, currency: Currency, precision: usize) -> String {
    format!(
        "{}{} {}",
        currency.symbol(),
        format_amount(value, precision),
        currency.code()
    )
}

/// Human readable status of where the rate came from.
pub fn rate_status(snapshot: &RateSnapshot) -> &'static str {
    if snapshot.is_live() {
        "live rate"
    } else {
        "default rate"
    }
}

/// The `1 USD = ₹83.12 INR (live rate)` line.
pub fn rate_line(snapshot: &RateSnapshot, precision: usize) -> String {
    format!(
        "1 USD = {} ({})",
        format_money(snapshot.rate, Currency::Inr, precision),
        rate_status(snapshot)
    )
}

/// Like [`rate_line`], dimmed when the rate is not live.
pub fn styled_rate_line(snapshot: &RateSnapshot, precision: usize) -> String {
    let line = rate_line(snapshot, precision);
    if snapshot.is_live() {
        style_text(&line, StyleType::Subtle)
    } else {
        style_text(&line, StyleType::Warning)
    }
}
