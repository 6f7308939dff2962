//! Quote and validation report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use core_kernel::{CoreError, Currency};
use domain_booking::{
    BookingDraft, BookingSession, Clock, GateState, HeadlessWidget, SessionContext,
};
use domain_pricing::{CarSummary, QuoteSummary};
use crate::config::AppConfig;
use crate::CliError;

/// What the CLI reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteInput {
    pub car: Option<CarSummary>,
    pub draft: BookingDraft,
    /// Preferred locales, most preferred first
    pub locales: Vec<String>,
    /// Overrides the configured display currency
    pub currency: Option<Currency>,
}

/// Outcome of validating the draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Field name to localized message
    pub errors: BTreeMap<String, String>,
}

/// What the CLI prints
#[derive(Debug, Clone, Serialize)]
pub struct QuoteReport {
    pub locale: String,
    pub quote: QuoteSummary,
    pub validation: ValidationReport,
    /// Gate state the booking page would be in after validating
    pub gate_state: GateState,
}

/// Prices and validates `input` as a fresh session would
pub fn build_report(
    config: &AppConfig,
    input: QuoteInput,
    clock: Arc<dyn Clock>,
) -> Result<QuoteReport, CliError> {
    let rates = config.exchange_rates()?;
    let display_currency = match input.currency {
        Some(currency) => {
            rates.rate(currency).map_err(CoreError::from)?;
            currency
        }
        None => config.display_currency()?,
    };
    let localizer = config.localizer(&input.locales)?;
    let locale = localizer.locale().to_string();

    let context = SessionContext::new(localizer, display_currency, rates, config.rules())
        .with_clock(clock);
    let mut session = BookingSession::new(context, Box::new(HeadlessWidget));

    if let Some(car) = input.car {
        session.select_car(car)?;
    }
    let draft = input.draft;
    session.edit(move |current| *current = draft)?;

    let quote = session.quote_summary()?;
    let result = session.validate()?;
    let errors = result
        .errors()
        .map(|errors| errors.messages(&session.context().localizer))
        .unwrap_or_default();

    tracing::info!(
        session_id = %session.context().session_id.short(),
        rental_days = quote.rental_days,
        valid = result.is_valid(),
        error_count = errors.len(),
        "quote report built"
    );

    Ok(QuoteReport {
        locale,
        quote,
        validation: ValidationReport {
            valid: result.is_valid(),
            errors,
        },
        gate_state: session.gate_state(),
    })
}
