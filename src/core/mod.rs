//! Core business logic abstractions

pub mod config;
pub mod converter;
pub mod currency;
pub mod log;

// Re-export main types for cleaner imports
pub use converter::{Converter, ConverterSettings, RateSnapshot, RefreshPolicy};
pub use currency::{Currency, Direction, RateSource};
