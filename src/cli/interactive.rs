//! Line based interactive converter.
//!
//! Type `100 usd` or `8000 inr` to convert, a bare amount to convert from the
//! last used currency, `r` to refresh the rate and `q` to quit.

use super::{convert, ui};
use crate::core::{Converter, Currency};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Convert {
        amount: f64,
        currency: Option<Currency>,
    },
    Clear,
    Refresh,
    Quit,
    /// Anything that is not a valid amount or command.
    Ignored,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Clear;
    }

    match line.to_lowercase().as_str() {
        "q" | "quit" | "exit" => return Input::Quit,
        "r" | "refresh" => return Input::Refresh,
        _ => {}
    }

    let mut tokens = line.split_whitespace();
    let Some(amount) = tokens.next().and_then(parse_amount) else {
        return Input::Ignored;
    };
    let currency = match tokens.next() {
        None => None,
        Some(code) => match code.parse::<Currency>() {
            Ok(currency) => Some(currency),
            Err(_) => return Input::Ignored,
        },
    };
    if tokens.next().is_some() {
        return Input::Ignored;
    }

    Input::Convert { amount, currency }
}

/// Parses `1,234.5` style amounts. Rejects NaN and infinities.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

pub struct Session {
    converter: Converter,
    precision: usize,
    side: Currency,
    last_amount: Option<f64>,
}

impl Session {
    pub fn new(converter: Converter, precision: usize) -> Self {
        Session {
            converter,
            precision,
            side: Currency::Usd,
            last_amount: None,
        }
    }

    pub fn banner(&self) -> String {
        format!(
            "{}\n{} ({}) ⇄ {} ({})\n\n{}\n{}",
            ui::style_text("Currency Converter", ui::StyleType::Title),
            Currency::Usd.name(),
            Currency::Usd,
            Currency::Inr.name(),
            Currency::Inr,
            ui::styled_rate_line(&self.converter.snapshot(), self.precision),
            ui::style_text(
                "Enter an amount followed by usd or inr. r to refresh, q to quit.",
                ui::StyleType::Subtle
            )
        )
    }

    /// Applies one input and returns the text to show, if any.
    pub async fn handle(&mut self, input: Input) -> Option<String> {
        match input {
            Input::Convert { amount, currency } => {
                if let Some(currency) = currency {
                    self.side = currency;
                }
                self.last_amount = Some(amount);
                self.convert_last().await
            }
            Input::Clear => {
                self.last_amount = None;
                None
            }
            Input::Refresh => Some(self.refresh().await),
            Input::Quit | Input::Ignored => None,
        }
    }

    async fn convert_last(&self) -> Option<String> {
        let amount = self.last_amount?;
        let result = self.converter.convert(amount, self.side.direction()).await;
        Some(convert::conversion_text(
            amount,
            self.side,
            result,
            self.precision,
        ))
    }

    async fn refresh(&self) -> String {
        let mut lines = Vec::new();
        if self.converter.fetch_rate().await {
            lines.push(ui::style_text(
                "Exchange rate updated successfully!",
                ui::StyleType::Success,
            ));
            lines.push(ui::styled_rate_line(
                &self.converter.snapshot(),
                self.precision,
            ));
            if let Some(reconverted) = self.convert_last().await {
                lines.push(reconverted);
            }
        } else {
            lines.push(ui::style_text(
                "Failed to fetch rate. Using cached/default rate.",
                ui::StyleType::Error,
            ));
            lines.push(ui::styled_rate_line(
                &self.converter.snapshot(),
                self.precision,
            ));
        }
        lines.join("\n")
    }
}

/// Reads inputs until quit or end of input, writing responses to `out`.
pub async fn drive<R, W>(session: &mut Session, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            writeln!(out)?;
            break;
        };

        let input = parse_input(&line);
        debug!(?input, "Interactive input");
        if input == Input::Quit {
            break;
        }
        if let Some(text) = session.handle(input).await {
            writeln!(out, "{text}")?;
        }
    }
    Ok(())
}

pub async fn run(converter: Converter, precision: usize, fetch_on_start: bool) -> Result<()> {
    if fetch_on_start {
        convert::fetch_with_feedback(&converter).await;
    }

    let mut session = Session::new(converter, precision);
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}\n", session.banner())?;

    drive(&mut session, BufReader::new(tokio::io::stdin()), &mut stdout).await
}
