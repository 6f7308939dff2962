//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random quote inputs that
//! maintain domain invariants.

use core_kernel::{Currency, Money};
use domain_pricing::{AddOnService, InsuranceTier, RentalQuoteRequest};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Strategy for generating supported Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    proptest::sample::select(Currency::ALL.to_vec())
}

/// Strategy for generating non-negative amounts in minor units (up to 10,000.00)
pub fn daily_rate_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..1_000_000i64
}

/// Strategy for generating EUR daily rates
pub fn daily_rate_strategy() -> impl Strategy<Value = Money> {
    daily_rate_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::EUR))
}

/// Strategy for generating positive Money values in any currency
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64, currency_strategy())
        .prop_map(|(minor, currency)| Money::from_minor(minor, currency))
}

/// Strategy for generating exchange rates (0.01 to 100.00)
pub fn exchange_rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for generating rental lengths of one day to a year
pub fn rental_days_strategy() -> impl Strategy<Value = u32> {
    1u32..=365u32
}

pub fn insurance_tier_strategy() -> impl Strategy<Value = InsuranceTier> {
    proptest::sample::select(InsuranceTier::ALL.to_vec())
}

pub fn add_on_service_strategy() -> impl Strategy<Value = AddOnService> {
    proptest::sample::select(AddOnService::ALL.to_vec())
}

/// Strategy for generating metered (per-day) services only
pub fn metered_service_strategy() -> impl Strategy<Value = AddOnService> {
    let metered: Vec<AddOnService> = AddOnService::ALL
        .into_iter()
        .filter(AddOnService::is_metered)
        .collect();
    proptest::sample::select(metered)
}

pub fn add_on_services_strategy() -> impl Strategy<Value = BTreeSet<AddOnService>> {
    proptest::collection::btree_set(add_on_service_strategy(), 0..=AddOnService::ALL.len())
}

/// Strategy for generating valid EUR quote requests
pub fn quote_request_strategy() -> impl Strategy<Value = RentalQuoteRequest> {
    (
        daily_rate_strategy(),
        rental_days_strategy(),
        insurance_tier_strategy(),
        add_on_services_strategy(),
    )
        .prop_map(|(rate, days, tier, services)| {
            RentalQuoteRequest::new(rate, days, tier).with_services(services)
        })
}
