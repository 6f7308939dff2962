//! Quote request inputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{CarId, Money};
use crate::tariff::{AddOnService, InsuranceTier};

/// The catalog's view of a car, as far as pricing is concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSummary {
    pub id: CarId,
    pub name: String,
    /// Price per rental day in the base currency
    pub daily_rate: Money,
}

/// Input to the price calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalQuoteRequest {
    pub daily_rate: Money,
    pub rental_days: u32,
    pub insurance_tier: InsuranceTier,
    pub add_on_services: BTreeSet<AddOnService>,
}

impl RentalQuoteRequest {
    pub fn new(daily_rate: Money, rental_days: u32, insurance_tier: InsuranceTier) -> Self {
        Self {
            daily_rate,
            rental_days,
            insurance_tier,
            add_on_services: BTreeSet::new(),
        }
    }

    /// Adds a service; adding the same service twice has no effect
    pub fn with_service(mut self, service: AddOnService) -> Self {
        self.add_on_services.insert(service);
        self
    }

    pub fn with_services(mut self, services: impl IntoIterator<Item = AddOnService>) -> Self {
        self.add_on_services.extend(services);
        self
    }

    /// Builds a request for a car between two dates
    pub fn for_dates(
        car: &CarSummary,
        pickup: NaiveDate,
        return_date: NaiveDate,
        insurance_tier: InsuranceTier,
    ) -> Self {
        Self::new(car.daily_rate, rental_days(pickup, return_date), insurance_tier)
    }
}

/// Whole days between pick-up and return; 0 when the return is not after the pick-up
pub fn rental_days(pickup: NaiveDate, return_date: NaiveDate) -> u32 {
    let days = (return_date - pickup).num_days();
    u32::try_from(days).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rental_days() {
        assert_eq!(rental_days(date(2026, 3, 1), date(2026, 3, 4)), 3);
        assert_eq!(rental_days(date(2026, 2, 27), date(2026, 3, 1)), 2);
    }

    #[test]
    fn test_rental_days_same_or_reversed_dates() {
        assert_eq!(rental_days(date(2026, 3, 1), date(2026, 3, 1)), 0);
        assert_eq!(rental_days(date(2026, 3, 5), date(2026, 3, 1)), 0);
    }

    #[test]
    fn test_services_are_a_set() {
        let request = RentalQuoteRequest::new(Money::new(dec!(30), Currency::EUR), 3, InsuranceTier::None)
            .with_service(AddOnService::Wifi)
            .with_service(AddOnService::Wifi);
        assert_eq!(request.add_on_services.len(), 1);
    }
}
