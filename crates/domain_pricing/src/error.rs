//! Pricing domain errors

use thiserror::Error;

use core_kernel::MoneyError;

/// Errors raised while parsing pricing inputs or presenting a quote
///
/// The calculator itself never fails; malformed requests degrade to a zero quote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Unknown insurance tier: {0}")]
    UnknownInsuranceTier(String),

    #[error("Unknown add-on service: {0}")]
    UnknownService(String),

    #[error("Cannot present quote: {0}")]
    Presentation(#[from] MoneyError),
}
