//! Insurance and add-on service tariffs
//!
//! Both lookups are exhaustive matches over closed enums, so adding a tier or
//! a service without a price fails to compile.
//!
//! # Canonical tariff (per rental day unless noted)
//!
//! | Item            | Price        |
//! |-----------------|--------------|
//! | No insurance    | 0            |
//! | Basic cover     | 5            |
//! | Full cover      | 15           |
//! | Premium cover   | 35           |
//! | Mobile phone    | 3            |
//! | Wi-Fi hotspot   | 2            |
//! | GPS navigation  | 2            |
//! | Child seat      | 1            |
//! | Airport pick-up | 25, once     |
//!
//! The insurance rows are a product decision rather than a copy of either
//! legacy rate sheet. One sheet priced `basic/cdw/full` at 0/15/35, the other
//! priced `basic/full/premium` at 5/10/15. Basic keeps 5 and full is 15 so the
//! published example quote (3 days, full cover, Wi-Fi, airport pick-up on a
//! 30/day car) still totals 166. Premium takes the top rate of 35 so it stays
//! above full cover.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PricingError;

/// Insurance cover chosen for the rental
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceTier {
    None,
    Basic,
    Full,
    Premium,
}

impl InsuranceTier {
    pub const ALL: [InsuranceTier; 4] = [
        InsuranceTier::None,
        InsuranceTier::Basic,
        InsuranceTier::Full,
        InsuranceTier::Premium,
    ];

    /// Price per rental day in the base currency
    pub fn daily_rate(&self) -> Decimal {
        match self {
            InsuranceTier::None => dec!(0),
            InsuranceTier::Basic => dec!(5),
            InsuranceTier::Full => dec!(15),
            InsuranceTier::Premium => dec!(35),
        }
    }

    /// Form value for this tier
    pub fn code(&self) -> &'static str {
        match self {
            InsuranceTier::None => "none",
            InsuranceTier::Basic => "basic",
            InsuranceTier::Full => "full",
            InsuranceTier::Premium => "premium",
        }
    }

    /// Message id of the display name
    pub fn message_id(&self) -> &'static str {
        match self {
            InsuranceTier::None => "insurance-none",
            InsuranceTier::Basic => "insurance-basic",
            InsuranceTier::Full => "insurance-full",
            InsuranceTier::Premium => "insurance-premium",
        }
    }
}

impl fmt::Display for InsuranceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for InsuranceTier {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        InsuranceTier::ALL
            .into_iter()
            .find(|tier| tier.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| PricingError::UnknownInsuranceTier(s.to_string()))
    }
}

/// How an add-on is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCharge {
    /// Metered: price multiplied by the number of rental days
    PerDay(Decimal),
    /// Flat fee charged once per booking
    OneTime(Decimal),
}

/// Optional extras that can be added to a rental
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOnService {
    Phone,
    Wifi,
    Gps,
    ChildSeat,
    AirportPickup,
}

impl AddOnService {
    pub const ALL: [AddOnService; 5] = [
        AddOnService::Phone,
        AddOnService::Wifi,
        AddOnService::Gps,
        AddOnService::ChildSeat,
        AddOnService::AirportPickup,
    ];

    pub fn charge(&self) -> ServiceCharge {
        match self {
            AddOnService::Phone => ServiceCharge::PerDay(dec!(3)),
            AddOnService::Wifi => ServiceCharge::PerDay(dec!(2)),
            AddOnService::Gps => ServiceCharge::PerDay(dec!(2)),
            AddOnService::ChildSeat => ServiceCharge::PerDay(dec!(1)),
            AddOnService::AirportPickup => ServiceCharge::OneTime(dec!(25)),
        }
    }

    /// True for services priced per rental day
    pub fn is_metered(&self) -> bool {
        matches!(self.charge(), ServiceCharge::PerDay(_))
    }

    /// Form value for this service
    pub fn code(&self) -> &'static str {
        match self {
            AddOnService::Phone => "phone",
            AddOnService::Wifi => "wifi",
            AddOnService::Gps => "gps",
            AddOnService::ChildSeat => "child_seat",
            AddOnService::AirportPickup => "airport_pickup",
        }
    }

    /// Message id of the display name
    pub fn message_id(&self) -> &'static str {
        match self {
            AddOnService::Phone => "service-phone",
            AddOnService::Wifi => "service-wifi",
            AddOnService::Gps => "service-gps",
            AddOnService::ChildSeat => "service-child-seat",
            AddOnService::AirportPickup => "service-airport-pickup",
        }
    }
}

impl fmt::Display for AddOnService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AddOnService {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Older forms post camelCase values ("childSeat")
        let normalized: String = s
            .trim()
            .chars()
            .flat_map(|c| {
                if c.is_ascii_uppercase() {
                    vec!['_', c.to_ascii_lowercase()]
                } else {
                    vec![c]
                }
            })
            .collect();
        AddOnService::ALL
            .into_iter()
            .find(|service| service.code() == normalized)
            .ok_or_else(|| PricingError::UnknownService(s.to_string()))
    }
}
