//! Money types with precise decimal arithmetic
//!
//! Amounts are carried at full `rust_decimal` precision in the base currency.
//! Rounding to the currency's minor unit happens only when a value is
//! presented, via [`Money::round_to_currency`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    EUR,
    USD,
    GBP,
    CHF,
    AUD,
    CAD,
}

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 6] = [
        Currency::EUR,
        Currency::USD,
        Currency::GBP,
        Currency::CHF,
        Currency::AUD,
        Currency::CAD,
    ];

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::USD => "$",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
            Currency::AUD => "A$",
            Currency::CAD => "C$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::AUD => "AUD",
            Currency::CAD => "CAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| MoneyError::UnknownCurrency(s.to_string()))
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("No exchange rate from {from} to {to}")]
    UnknownExchangeRate { from: String, to: String },

    #[error("Invalid exchange rate for {0}: rates must be positive")]
    InvalidExchangeRate(String),

    #[error("Amount overflow in {0}")]
    Overflow(String),
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value without rounding
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, currency.decimal_places()), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Rounds half away from zero to the currency's minor unit
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| MoneyError::Overflow(self.currency.to_string()))?;
        Ok(Self::new(amount, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.round_to_currency().amount,
            dp = dp as usize
        )
    }
}

/// Exchange rates quoted against a single base currency
///
/// A rate of `1.08` for USD means one unit of the base currency buys 1.08 USD.
/// The base currency always converts to itself at rate 1, whether or not it is
/// listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    base: Currency,
    rates: BTreeMap<Currency, Decimal>,
}

impl ExchangeRates {
    /// Creates an empty rate table for the given base currency
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: BTreeMap::new(),
        }
    }

    /// Adds or replaces a rate
    pub fn with_rate(mut self, currency: Currency, rate: Decimal) -> Result<Self, MoneyError> {
        self.set_rate(currency, rate)?;
        Ok(self)
    }

    /// Adds or replaces a rate in place
    pub fn set_rate(&mut self, currency: Currency, rate: Decimal) -> Result<(), MoneyError> {
        if rate <= Decimal::ZERO {
            return Err(MoneyError::InvalidExchangeRate(currency.to_string()));
        }
        self.rates.insert(currency, rate);
        Ok(())
    }

    /// Returns the base currency
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Returns the rate from the base currency to `target`
    pub fn rate(&self, target: Currency) -> Result<Decimal, MoneyError> {
        if target == self.base {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&target)
            .copied()
            .ok_or_else(|| MoneyError::UnknownExchangeRate {
                from: self.base.to_string(),
                to: target.to_string(),
            })
    }

    /// Converts a base-currency amount into `target` at full precision
    pub fn convert(&self, money: &Money, target: Currency) -> Result<Money, MoneyError> {
        if money.currency() != self.base {
            return Err(MoneyError::CurrencyMismatch(
                money.currency().to_string(),
                self.base.to_string(),
            ));
        }
        let rate = self.rate(target)?;
        let amount = money
            .amount()
            .checked_mul(rate)
            .ok_or_else(|| MoneyError::Overflow(target.to_string()))?;
        Ok(Money::new(amount, target))
    }

    /// Currencies a base amount can be converted into
    pub fn supported(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self.rates.keys().copied().collect();
        if !currencies.contains(&self.base) {
            currencies.push(self.base);
        }
        currencies.sort();
        currencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_keeps_full_precision() {
        let m = Money::new(dec!(100.123456789), Currency::EUR);
        assert_eq!(m.amount(), dec!(100.123456789));
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(10050, Currency::USD);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_round_to_currency_half_away_from_zero() {
        let m = Money::new(dec!(10.005), Currency::EUR);
        assert_eq!(m.round_to_currency().amount(), dec!(10.01));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(dec!(100.00), Currency::USD);
        let eur = Money::new(dec!(100.00), Currency::EUR);

        let result = usd.checked_add(&eur);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::new(Decimal::MAX, Currency::EUR);
        let result = max.checked_add(&Money::new(dec!(1), Currency::EUR));
        assert_eq!(result, Err(MoneyError::Overflow("EUR".to_string())));
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_display_rounds() {
        let m = Money::new(dec!(166.666), Currency::EUR);
        assert_eq!(m.to_string(), "€ 166.67");
    }

    #[test]
    fn test_exchange_base_to_base_is_identity() {
        let rates = ExchangeRates::new(Currency::EUR);
        let m = Money::new(dec!(42.5), Currency::EUR);
        assert_eq!(rates.convert(&m, Currency::EUR).unwrap(), m);
    }

    #[test]
    fn test_exchange_conversion() {
        let rates = ExchangeRates::new(Currency::EUR)
            .with_rate(Currency::USD, dec!(1.08))
            .unwrap();
        let converted = rates
            .convert(&Money::new(dec!(166), Currency::EUR), Currency::USD)
            .unwrap();
        assert_eq!(converted.amount(), dec!(179.28));
        assert_eq!(converted.currency(), Currency::USD);
    }

    #[test]
    fn test_exchange_overflow_is_an_error() {
        let rates = ExchangeRates::new(Currency::EUR)
            .with_rate(Currency::USD, dec!(1.08))
            .unwrap();
        let near_max = Money::new(Decimal::MAX / dec!(1.05), Currency::EUR);

        let result = rates.convert(&near_max, Currency::USD);
        assert_eq!(result, Err(MoneyError::Overflow("USD".to_string())));
    }

    #[test]
    fn test_exchange_unknown_target() {
        let rates = ExchangeRates::new(Currency::EUR);
        let result = rates.rate(Currency::GBP);
        assert!(matches!(result, Err(MoneyError::UnknownExchangeRate { .. })));
    }

    #[test]
    fn test_exchange_rejects_non_positive_rate() {
        let result = ExchangeRates::new(Currency::EUR).with_rate(Currency::USD, dec!(0));
        assert_eq!(
            result.unwrap_err(),
            MoneyError::InvalidExchangeRate("USD".to_string())
        );
    }
}
