//! Core Kernel - Foundational types for the rental booking engine
//!
//! This crate provides the building blocks shared by the pricing and booking
//! domains:
//! - Money with precise decimal arithmetic and exchange-rate conversion
//! - Strongly-typed identifiers
//! - Localized message rendering
//! - The error type returned by outbound ports

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod i18n;
pub mod error;

pub use money::{Money, Currency, ExchangeRates, MoneyError};
pub use identifiers::{CarId, BookingId, DocumentId, SessionId};
pub use ports::{PortError, DomainPort};
pub use i18n::{Localizer, LocalizationError};
pub use error::CoreError;

pub use fluent::FluentArgs;
