//! Display-ready quote summaries
//!
//! Converts a base-currency [`PriceBreakdown`] into the user's display
//! currency with localized line labels. Each amount is converted at full
//! precision and rounded once, at the end. The displayed total is the rounded
//! converted total, not the sum of the rounded lines.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, ExchangeRates, FluentArgs, Localizer, Money};
use crate::calculator::{LineKind, PriceBreakdown, PriceLine};
use crate::error::PricingError;

/// Converts a base-currency amount for display, rounded to the minor unit
pub fn display_amount(
    amount: &Money,
    target: Currency,
    rates: &ExchangeRates,
) -> Result<Money, PricingError> {
    Ok(rates.convert(amount, target)?.round_to_currency())
}

/// One rendered quote line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLine {
    pub kind: LineKind,
    pub label: String,
    pub amount: Money,
    pub formatted: String,
}

/// A quote ready to be rendered by the booking page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub currency: Currency,
    pub rental_days: u32,
    pub lines: Vec<DisplayLine>,
    pub total_label: String,
    pub total: Money,
    pub total_formatted: String,
}

impl QuoteSummary {
    pub fn present(
        breakdown: &PriceBreakdown,
        rates: &ExchangeRates,
        target: Currency,
        localizer: &Localizer,
    ) -> Result<Self, PricingError> {
        let lines = breakdown
            .lines
            .iter()
            .map(|line| {
                let amount = display_amount(&line.amount, target, rates)?;
                Ok(DisplayLine {
                    kind: line.kind,
                    label: line_label(line, localizer),
                    amount,
                    formatted: amount.to_string(),
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let total = display_amount(&breakdown.total, target, rates)?;

        Ok(Self {
            currency: target,
            rental_days: breakdown.rental_days,
            lines,
            total_label: localizer.format("quote-total", None),
            total,
            total_formatted: total.to_string(),
        })
    }
}

fn line_label(line: &PriceLine, localizer: &Localizer) -> String {
    let mut args = FluentArgs::new();
    args.set("days", line.quantity);

    match line.kind {
        LineKind::Rental => localizer.format("quote-line-rental", Some(&args)),
        LineKind::Insurance(tier) => {
            args.set("name", localizer.format(tier.message_id(), None));
            localizer.format("quote-line-per-day", Some(&args))
        }
        LineKind::Service(service) => {
            args.set("name", localizer.format(service.message_id(), None));
            if line.one_time {
                localizer.format("quote-line-one-time", Some(&args))
            } else {
                localizer.format("quote-line-per-day", Some(&args))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::PriceCalculator;
    use crate::request::RentalQuoteRequest;
    use crate::tariff::{AddOnService, InsuranceTier};
    use core_kernel::MoneyError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rates() -> ExchangeRates {
        ExchangeRates::new(Currency::EUR)
            .with_rate(Currency::USD, dec!(1.08))
            .unwrap()
    }

    fn quote() -> PriceBreakdown {
        let req = RentalQuoteRequest::new(Money::new(dec!(30), Currency::EUR), 3, InsuranceTier::Full)
            .with_services([AddOnService::Wifi, AddOnService::AirportPickup]);
        PriceCalculator::new(Currency::EUR).compute_quote(Some(&req))
    }

    #[test]
    fn test_present_in_base_currency() {
        let localizer = Localizer::negotiate(&["en-US"]).unwrap();
        let summary = QuoteSummary::present(&quote(), &rates(), Currency::EUR, &localizer).unwrap();

        assert_eq!(summary.total.amount(), dec!(166));
        assert_eq!(summary.total_formatted, "€ 166.00");
        assert_eq!(summary.lines[0].label, "Car rental (3 days)");
        assert_eq!(summary.lines[1].label, "Full cover (3 days)");
        assert_eq!(summary.lines[2].label, "Wi-Fi hotspot (3 days)");
        assert_eq!(summary.lines[3].label, "Airport pick-up (one-time fee)");
    }

    #[test]
    fn test_present_converted() {
        let localizer = Localizer::negotiate(&["de-DE"]).unwrap();
        let summary = QuoteSummary::present(&quote(), &rates(), Currency::USD, &localizer).unwrap();

        assert_eq!(summary.currency, Currency::USD);
        assert_eq!(summary.total.amount(), dec!(179.28));
        assert_eq!(summary.total_label, "Gesamt");
        assert_eq!(summary.lines[0].label, "Mietwagen (3 Tage)");
    }

    #[test]
    fn test_present_unknown_currency() {
        let localizer = Localizer::negotiate(&["en-US"]).unwrap();
        let result = QuoteSummary::present(&quote(), &rates(), Currency::GBP, &localizer);
        assert!(matches!(result, Err(PricingError::Presentation(_))));
    }

    #[test]
    fn test_present_overflowing_conversion() {
        let localizer = Localizer::negotiate(&["en-US"]).unwrap();
        let daily_rate = Money::new(Decimal::MAX / dec!(1.05), Currency::EUR);
        let req = RentalQuoteRequest::new(daily_rate, 1, InsuranceTier::None);
        let quote = PriceCalculator::new(Currency::EUR).compute_quote(Some(&req));
        assert!(!quote.is_zero());

        let result = QuoteSummary::present(&quote, &rates(), Currency::USD, &localizer);
        assert_eq!(
            result,
            Err(PricingError::Presentation(MoneyError::Overflow("USD".to_string())))
        );
    }

    #[test]
    fn test_display_amount_rounds_once() {
        let amount = Money::new(dec!(10.004), Currency::EUR);
        let shown = display_amount(&amount, Currency::USD, &rates()).unwrap();
        // 10.004 × 1.08 = 10.80432
        assert_eq!(shown.amount(), dec!(10.80));
    }
}
