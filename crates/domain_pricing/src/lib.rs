//! Rental Pricing Domain
//!
//! Turns a car's daily rate, a rental period, an insurance tier and a set of
//! add-on services into an itemized quote, and renders that quote for display.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::{Currency, Money};
//! use domain_pricing::{AddOnService, InsuranceTier, PriceCalculator, RentalQuoteRequest};
//! use rust_decimal_macros::dec;
//!
//! let request = RentalQuoteRequest::new(Money::new(dec!(30), Currency::EUR), 3, InsuranceTier::Full)
//!     .with_services([AddOnService::Wifi, AddOnService::AirportPickup]);
//!
//! let quote = PriceCalculator::new(Currency::EUR).compute_quote(Some(&request));
//! assert_eq!(quote.total.amount(), dec!(166));
//! ```

pub mod tariff;
pub mod request;
pub mod calculator;
pub mod presentation;
pub mod error;

pub use tariff::{AddOnService, InsuranceTier, ServiceCharge};
pub use request::{rental_days, CarSummary, RentalQuoteRequest};
pub use calculator::{LineKind, PriceBreakdown, PriceCalculator, PriceLine};
pub use presentation::{display_amount, DisplayLine, QuoteSummary};
pub use error::PricingError;
