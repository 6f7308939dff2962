//! Rental Booking Engine - Quote CLI
//!
//! Prices and validates a booking draft and prints a JSON report.
//!
//! # Usage
//!
//! ```bash
//! # Read the draft from a file
//! rental-quote draft.json
//!
//! # Read the draft from stdin, show prices in USD
//! RENTAL_DISPLAY_CURRENCY=USD rental-quote < draft.json
//! ```
//!
//! The input is `{ "car": {..}, "draft": {..}, "locales": ["de-DE"], "currency": "USD" }`;
//! every key is optional.
//!
//! # Environment Variables
//!
//! * `RENTAL_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `RENTAL_LOG_FORMAT` - `text` or `json` (default: text)
//! * `RENTAL_DEFAULT_LOCALE` - Fallback message locale (default: en-US)
//! * `RENTAL_DISPLAY_CURRENCY` - Currency quotes are shown in (default: EUR)
//! * `RENTAL_BASE_CURRENCY` - Currency car rates are quoted in (default: EUR)
//! * `RENTAL_EXCHANGE_RATES__<CODE>` - Rate from the base currency to `<CODE>`
//! * `RENTAL_CHALLENGE_TOKEN_TTL_SECS` - Challenge token lifetime (default: 300)
//! * `RENTAL_ALLOWED_LOCATIONS` - Comma-separated pick-up/return locations
//!
//! `RUST_LOG` takes precedence over `RENTAL_LOG_LEVEL`. Logs go to stderr.

use anyhow::Context;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_booking::SystemClock;
use interface_cli::{build_report, AppConfig, LogFormat, QuoteInput};

fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("loading configuration")?;

    init_tracing(&config.log_level, config.log_format);

    let path = std::env::args().nth(1);
    let raw = read_input(path.as_deref())?;
    let input: QuoteInput = serde_json::from_str(&raw).context("parsing quote input")?;

    let report = build_report(&config, input, Arc::new(SystemClock))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Reads the input document from `path`, or stdin when absent or `-`
fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != "-" => {
            tracing::debug!(path, "reading quote input from file");
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path))
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("reading quote input from stdin")?;
            Ok(raw)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
/// * `format` - Human-readable text or one JSON object per line
fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
