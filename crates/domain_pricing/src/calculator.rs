//! Rental price calculation
//!
//! [`PriceCalculator::compute_quote`] is pure and total: it runs on every
//! input change in the booking form, so malformed input (no car yet, zero
//! days, a negative rate) yields an all-zero [`PriceBreakdown`] instead of an
//! error.
//!
//! ```text
//! base        = daily_rate × days
//! insurance   = tier rate × days
//! services    = Σ metered rate × days
//! one-time    = Σ flat fees
//! total       = base + insurance + services + one-time
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, MoneyError};
use crate::request::RentalQuoteRequest;
use crate::tariff::{AddOnService, InsuranceTier, ServiceCharge};

/// What a quote line charges for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum LineKind {
    Rental,
    Insurance(InsuranceTier),
    Service(AddOnService),
}

/// A single itemized charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLine {
    pub kind: LineKind,
    pub unit_price: Money,
    /// Rental days for metered lines, 1 for one-time fees
    pub quantity: u32,
    pub amount: Money,
    pub one_time: bool,
}

/// Itemized price of a prospective booking, in the base currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub rental_days: u32,
    pub base_price: Money,
    pub insurance_price: Money,
    pub services_price: Money,
    pub one_time_fees: Money,
    pub total: Money,
    pub lines: Vec<PriceLine>,
}

impl PriceBreakdown {
    /// The quote shown while the form is incomplete
    pub fn zero(currency: Currency) -> Self {
        Self {
            rental_days: 0,
            base_price: Money::zero(currency),
            insurance_price: Money::zero(currency),
            services_price: Money::zero(currency),
            one_time_fees: Money::zero(currency),
            total: Money::zero(currency),
            lines: Vec::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.total.currency()
    }

    pub fn is_zero(&self) -> bool {
        self.total.is_zero() && self.lines.is_empty()
    }

    /// Sum of the four components; always equal to `total`
    pub fn component_sum(&self) -> Result<Money, MoneyError> {
        self.base_price
            .checked_add(&self.insurance_price)?
            .checked_add(&self.services_price)?
            .checked_add(&self.one_time_fees)
    }

    /// Amount a single line contributes, if present
    pub fn line(&self, kind: LineKind) -> Option<&PriceLine> {
        self.lines.iter().find(|line| line.kind == kind)
    }
}

/// Prices rental requests in a single base currency
#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    base_currency: Currency,
}

impl PriceCalculator {
    pub fn new(base_currency: Currency) -> Self {
        Self { base_currency }
    }

    pub fn base_currency(&self) -> Currency {
        self.base_currency
    }

    /// Computes the itemized quote for a request
    ///
    /// Returns [`PriceBreakdown::zero`] when the request is absent, covers
    /// fewer than one day, carries a negative rate, is quoted in another
    /// currency, or would overflow.
    pub fn compute_quote(&self, request: Option<&RentalQuoteRequest>) -> PriceBreakdown {
        let Some(request) = request else {
            tracing::debug!("no quote request, returning zero quote");
            return PriceBreakdown::zero(self.base_currency);
        };

        if request.rental_days < 1 {
            tracing::debug!(rental_days = request.rental_days, "rental shorter than a day, returning zero quote");
            return PriceBreakdown::zero(self.base_currency);
        }
        if request.daily_rate.is_negative() {
            tracing::debug!("negative daily rate, returning zero quote");
            return PriceBreakdown::zero(self.base_currency);
        }
        if request.daily_rate.currency() != self.base_currency {
            tracing::debug!(
                rate_currency = %request.daily_rate.currency(),
                base_currency = %self.base_currency,
                "daily rate not in base currency, returning zero quote"
            );
            return PriceBreakdown::zero(self.base_currency);
        }

        match self.itemize(request) {
            Some(breakdown) => {
                tracing::debug!(
                    rental_days = breakdown.rental_days,
                    total = %breakdown.total.amount(),
                    "quote computed"
                );
                breakdown
            }
            None => {
                tracing::debug!("quote arithmetic overflowed, returning zero quote");
                PriceBreakdown::zero(self.base_currency)
            }
        }
    }

    fn itemize(&self, request: &RentalQuoteRequest) -> Option<PriceBreakdown> {
        let currency = self.base_currency;
        let days = request.rental_days;
        let mut lines = Vec::new();

        let base = metered_line(LineKind::Rental, request.daily_rate.amount(), days, currency)?;
        let base_price = base.amount;
        lines.push(base);

        let tier = request.insurance_tier;
        let insurance = metered_line(LineKind::Insurance(tier), tier.daily_rate(), days, currency)?;
        let insurance_price = insurance.amount;
        if tier != InsuranceTier::None {
            lines.push(insurance);
        }

        let mut services = Decimal::ZERO;
        let mut one_time = Decimal::ZERO;
        let mut one_time_lines = Vec::new();
        for service in &request.add_on_services {
            match service.charge() {
                ServiceCharge::PerDay(rate) => {
                    let line = metered_line(LineKind::Service(*service), rate, days, currency)?;
                    services = services.checked_add(line.amount.amount())?;
                    lines.push(line);
                }
                ServiceCharge::OneTime(fee) => {
                    one_time = one_time.checked_add(fee)?;
                    one_time_lines.push(PriceLine {
                        kind: LineKind::Service(*service),
                        unit_price: Money::new(fee, currency),
                        quantity: 1,
                        amount: Money::new(fee, currency),
                        one_time: true,
                    });
                }
            }
        }
        lines.extend(one_time_lines);

        let total = base_price
            .amount()
            .checked_add(insurance_price.amount())?
            .checked_add(services)?
            .checked_add(one_time)?;

        Some(PriceBreakdown {
            rental_days: days,
            base_price,
            insurance_price,
            services_price: Money::new(services, currency),
            one_time_fees: Money::new(one_time, currency),
            total: Money::new(total, currency),
            lines,
        })
    }
}

fn metered_line(kind: LineKind, rate: Decimal, days: u32, currency: Currency) -> Option<PriceLine> {
    let amount = rate.checked_mul(Decimal::from(days))?;
    Some(PriceLine {
        kind,
        unit_price: Money::new(rate, currency),
        quantity: days,
        amount: Money::new(amount, currency),
        one_time: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn calculator() -> PriceCalculator {
        PriceCalculator::new(Currency::EUR)
    }

    fn request(rate: Decimal, days: u32, tier: InsuranceTier) -> RentalQuoteRequest {
        RentalQuoteRequest::new(Money::new(rate, Currency::EUR), days, tier)
    }

    #[test]
    fn test_worked_example() {
        let req = request(dec!(30), 3, InsuranceTier::Full)
            .with_services([AddOnService::Wifi, AddOnService::AirportPickup]);
        let quote = calculator().compute_quote(Some(&req));

        assert_eq!(quote.base_price.amount(), dec!(90));
        assert_eq!(quote.insurance_price.amount(), dec!(45));
        assert_eq!(quote.services_price.amount(), dec!(6));
        assert_eq!(quote.one_time_fees.amount(), dec!(25));
        assert_eq!(quote.total.amount(), dec!(166));
    }

    #[test]
    fn test_lines_are_ordered() {
        let req = request(dec!(30), 2, InsuranceTier::Basic).with_services([
            AddOnService::AirportPickup,
            AddOnService::ChildSeat,
            AddOnService::Phone,
        ]);
        let kinds: Vec<LineKind> = calculator()
            .compute_quote(Some(&req))
            .lines
            .iter()
            .map(|l| l.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Rental,
                LineKind::Insurance(InsuranceTier::Basic),
                LineKind::Service(AddOnService::Phone),
                LineKind::Service(AddOnService::ChildSeat),
                LineKind::Service(AddOnService::AirportPickup),
            ]
        );
    }

    #[test]
    fn test_no_insurance_has_no_line() {
        let quote = calculator().compute_quote(Some(&request(dec!(40), 2, InsuranceTier::None)));
        assert!(quote.insurance_price.is_zero());
        assert_eq!(quote.lines.len(), 1);
    }

    #[test]
    fn test_missing_request_is_zero() {
        let quote = calculator().compute_quote(None);
        assert!(quote.is_zero());
        assert_eq!(quote.currency(), Currency::EUR);
    }

    #[test]
    fn test_zero_days_is_zero() {
        let req = request(dec!(30), 0, InsuranceTier::Premium).with_service(AddOnService::AirportPickup);
        assert!(calculator().compute_quote(Some(&req)).is_zero());
    }

    #[test]
    fn test_negative_rate_is_zero() {
        assert!(calculator()
            .compute_quote(Some(&request(dec!(-1), 3, InsuranceTier::Basic)))
            .is_zero());
    }

    #[test]
    fn test_foreign_currency_rate_is_zero() {
        let req = RentalQuoteRequest::new(Money::new(dec!(30), Currency::USD), 3, InsuranceTier::Basic);
        assert!(calculator().compute_quote(Some(&req)).is_zero());
    }

    #[test]
    fn test_overflow_is_zero() {
        let req = request(Decimal::MAX, 2, InsuranceTier::None);
        assert!(calculator().compute_quote(Some(&req)).is_zero());
    }

    #[test]
    fn test_free_car_still_prices_extras() {
        let req = request(dec!(0), 2, InsuranceTier::Basic).with_service(AddOnService::Gps);
        let quote = calculator().compute_quote(Some(&req));
        assert_eq!(quote.total.amount(), dec!(14));
    }
}
