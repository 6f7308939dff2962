//! CLI configuration
//!
//! Loaded from `RENTAL_`-prefixed environment variables layered over the
//! defaults below. Nested keys use `__`, e.g. `RENTAL_EXCHANGE_RATES__USD=1.10`;
//! lists are comma separated, e.g. `RENTAL_ALLOWED_LOCATIONS=airport,port`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use core_kernel::{CoreError, Currency, ExchangeRates, Localizer, LocalizationError};
use domain_booking::BookingRules;

const ENV_PREFIX: &str = "RENTAL";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    pub log_format: LogFormat,
    /// Locale used when the input requests none we support
    pub default_locale: String,
    pub display_currency: String,
    /// Currency car rates and tariffs are quoted in
    pub base_currency: String,
    /// Currency code to rate against the base currency
    pub exchange_rates: BTreeMap<String, Decimal>,
    pub challenge_token_ttl_secs: u64,
    pub allowed_locations: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let rules = BookingRules::default();
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            default_locale: "en-US".to_string(),
            display_currency: "EUR".to_string(),
            base_currency: "EUR".to_string(),
            exchange_rates: [
                ("eur", Decimal::ONE),
                ("usd", Decimal::new(108, 2)),
                ("gbp", Decimal::new(85, 2)),
                ("chf", Decimal::new(95, 2)),
            ]
            .into_iter()
            .map(|(code, rate)| (code.to_string(), rate))
            .collect(),
            challenge_token_ttl_secs: rules.challenge_token_ttl_secs,
            allowed_locations: rules.allowed_locations.into_iter().collect(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(Self::environment())
    }

    /// Loads configuration from an explicit set of variables
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self, config::ConfigError> {
        Self::from_source(Self::environment().source(Some(vars)))
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("allowed_locations")
    }

    fn from_source(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn base_currency(&self) -> Result<Currency, CoreError> {
        Ok(Currency::from_str(&self.base_currency)?)
    }

    /// Display currency; it must have a configured rate
    pub fn display_currency(&self) -> Result<Currency, CoreError> {
        let currency = Currency::from_str(&self.display_currency)?;
        self.exchange_rates()?.rate(currency)?;
        Ok(currency)
    }

    /// Rate table against the base currency; the base entry, if listed, must be 1
    pub fn exchange_rates(&self) -> Result<ExchangeRates, CoreError> {
        let base = self.base_currency()?;
        let mut rates = ExchangeRates::new(base);

        for (code, rate) in &self.exchange_rates {
            let currency = Currency::from_str(code)?;
            if currency == base {
                if *rate != Decimal::ONE {
                    return Err(CoreError::configuration(format!(
                        "base currency {} must have rate 1, got {}",
                        base, rate
                    )));
                }
                continue;
            }
            rates.set_rate(currency, *rate)?;
        }
        Ok(rates)
    }

    pub fn rules(&self) -> BookingRules {
        BookingRules {
            allowed_locations: self
                .allowed_locations
                .iter()
                .map(|location| location.trim().to_string())
                .filter(|location| !location.is_empty())
                .collect(),
            challenge_token_ttl_secs: self.challenge_token_ttl_secs,
            ..BookingRules::default()
        }
    }

    /// Negotiates `requested` locales, then the configured default
    pub fn localizer(&self, requested: &[String]) -> Result<Localizer, LocalizationError> {
        let mut locales = requested.to_vec();
        locales.push(self.default_locale.clone());
        Localizer::negotiate(&locales)
    }
}
