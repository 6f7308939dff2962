//! Rental quote CLI
//!
//! Prices and validates a booking draft supplied as JSON, the way the booking
//! page would, and renders the result as a JSON report. It never submits.

pub mod config;
pub mod report;

use thiserror::Error;

use core_kernel::{CoreError, LocalizationError};
use domain_booking::BookingError;

pub use crate::config::{AppConfig, LogFormat};
pub use crate::report::{build_report, QuoteInput, QuoteReport, ValidationReport};

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Localization error: {0}")]
    Localization(#[from] LocalizationError),

    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    #[error("Invalid input: {0}")]
    Input(#[from] serde_json::Error),
}
