//! Currency and exchange rate source abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Currency {
    Usd,
    Inr,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Inr => "Indian Rupee",
        }
    }

    /// Direction of a conversion that starts from this currency.
    pub fn direction(&self) -> Direction {
        match self {
            Currency::Usd => Direction::ToTarget,
            Currency::Inr => Direction::ToSource,
        }
    }

    pub fn other(&self) -> Currency {
        match self {
            Currency::Usd => Currency::Inr,
            Currency::Inr => Currency::Usd,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "INR" => Ok(Currency::Inr),
            _ => Err(anyhow::anyhow!("Invalid currency: {}", s)),
        }
    }
}

/// USD is the source currency and INR the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// USD to INR
    ToTarget,
    /// INR to USD
    ToSource,
}

/// A single place to fetch the current INR per USD rate from.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self) -> Result<f64>;
}
