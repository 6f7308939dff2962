//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the booking flow. These fixtures are
//! consistent and predictable so unit tests can assert exact amounts.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use core_kernel::{CarId, Currency, DocumentId, ExchangeRates, Money};
use domain_booking::DocumentRef;
use domain_pricing::CarSummary;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for catalog cars
pub struct CarFixtures;

impl CarFixtures {
    /// Deterministic id of the economy car
    pub fn economy_id() -> CarId {
        CarId::from_uuid(Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440001))
    }

    /// Economy car at € 30 per day
    pub fn economy() -> CarSummary {
        CarSummary {
            id: Self::economy_id(),
            name: "Fiat Panda".to_string(),
            daily_rate: Money::new(dec!(30), Currency::EUR),
        }
    }

    /// Premium car at € 95.50 per day
    pub fn premium() -> CarSummary {
        CarSummary {
            id: CarId::from_uuid(Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440002)),
            name: "BMW 5 Series".to_string(),
            daily_rate: Money::new(dec!(95.50), Currency::EUR),
        }
    }

    /// Car with a daily rate in a currency other than the base
    pub fn priced_in_usd() -> CarSummary {
        CarSummary {
            id: CarId::new(),
            name: "Ford Mustang".to_string(),
            daily_rate: Money::new(dec!(80), Currency::USD),
        }
    }
}

/// Fixture for uploaded documents
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// A 200 KB JPEG scan of an ID card
    pub fn id_card() -> DocumentRef {
        Self::document("id-card.jpg", "image/jpeg", 200 * 1024)
    }

    /// A 1 MB PDF passport scan
    pub fn passport() -> DocumentRef {
        Self::document("passport.pdf", "application/pdf", 1024 * 1024)
    }

    /// A PNG one byte over the 5 MiB limit
    pub fn oversized() -> DocumentRef {
        Self::document("huge.png", "image/png", 5 * 1024 * 1024 + 1)
    }

    /// A GIF, which is not an accepted type
    pub fn unsupported_type() -> DocumentRef {
        Self::document("animated.gif", "image/gif", 10 * 1024)
    }

    /// An upload that never received any bytes
    pub fn empty() -> DocumentRef {
        Self::document("empty.pdf", "application/pdf", 0)
    }

    pub fn document(file_name: &str, content_type: &str, size_bytes: u64) -> DocumentRef {
        DocumentRef {
            id: DocumentId::new(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
        }
    }
}

/// Fixture for dates and instants
pub struct DateFixtures;

impl DateFixtures {
    /// The date tests treat as "today" (Jun 1, 2026)
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    /// 09:00 UTC on [`Self::today`]
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap()
    }

    /// A week from today
    pub fn pickup() -> NaiveDate {
        Self::days_after_today(7)
    }

    /// `days` after [`Self::pickup`]
    pub fn return_after(days: u64) -> NaiveDate {
        Self::pickup().checked_add_days(Days::new(days)).unwrap()
    }

    pub fn yesterday() -> NaiveDate {
        Self::today().checked_sub_days(Days::new(1)).unwrap()
    }

    pub fn days_after_today(days: u64) -> NaiveDate {
        Self::today().checked_add_days(Days::new(days)).unwrap()
    }
}

/// Fixture for exchange rates
pub struct RateFixtures;

impl RateFixtures {
    /// EUR base with USD 1.08, GBP 0.85 and CHF 0.95
    pub fn eur_base() -> ExchangeRates {
        ExchangeRates::new(Currency::EUR)
            .with_rate(Currency::USD, dec!(1.08))
            .and_then(|rates| rates.with_rate(Currency::GBP, dec!(0.85)))
            .and_then(|rates| rates.with_rate(Currency::CHF, dec!(0.95)))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_fixtures_ordering() {
        assert!(DateFixtures::yesterday() < DateFixtures::today());
        assert!(DateFixtures::today() < DateFixtures::pickup());
        assert!(DateFixtures::pickup() < DateFixtures::return_after(1));
        assert_eq!(DateFixtures::now().date_naive(), DateFixtures::today());
    }

    #[test]
    fn test_car_fixtures_are_deterministic() {
        assert_eq!(CarFixtures::economy().id, CarFixtures::economy_id());
        assert_eq!(CarFixtures::economy().daily_rate.currency(), Currency::EUR);
    }

    #[test]
    fn test_rate_fixtures() {
        let rates = RateFixtures::eur_base();
        assert_eq!(rates.rate(Currency::USD).unwrap(), dec!(1.08));
        assert_eq!(rates.rate(Currency::EUR).unwrap(), dec!(1));
    }
}
