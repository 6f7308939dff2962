//! Quote report tests
//!
//! # Test Organization
//!
//! - `report_tests` - end-to-end report building from JSON input

use std::sync::Arc;

use core_kernel::Currency;
use domain_booking::{FixedClock, GateState};
use domain_pricing::{AddOnService, InsuranceTier};
use interface_cli::{build_report, AppConfig, CliError, QuoteInput};
use rust_decimal_macros::dec;
use test_utils::{CarFixtures, DateFixtures, DraftBuilder};

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(DateFixtures::now()))
}

fn input() -> QuoteInput {
    QuoteInput {
        car: Some(CarFixtures::economy()),
        draft: DraftBuilder::new()
            .with_insurance(Some(InsuranceTier::Full))
            .with_service(AddOnService::Wifi)
            .with_service(AddOnService::AirportPickup)
            .build(),
        locales: vec!["en-US".to_string()],
        currency: None,
    }
}

mod report_tests {
    use super::*;

    #[test]
    fn test_valid_draft_report() {
        let report = build_report(&AppConfig::default(), input(), clock()).unwrap();

        assert_eq!(report.locale, "en-US");
        assert_eq!(report.quote.total.amount(), dec!(166));
        assert_eq!(report.quote.total_formatted, "€ 166.00");
        assert!(report.validation.valid);
        assert!(report.validation.errors.is_empty());
        assert_eq!(report.gate_state, GateState::ChallengePending);
    }

    #[test]
    fn test_invalid_draft_report() {
        let mut input = input();
        input.draft.customer.email = "nope".to_string();
        input.draft.age_confirmed = false;
        input.locales = vec!["de-DE".to_string()];

        let report = build_report(&AppConfig::default(), input, clock()).unwrap();
        assert!(!report.validation.valid);
        assert_eq!(report.validation.errors.len(), 2);
        assert!(report.validation.errors["age_confirmed"].contains("21"));
        assert_eq!(report.gate_state, GateState::Editing);
        assert_eq!(report.locale, "de-DE");
    }

    #[test]
    fn test_report_without_car_flags_car() {
        let mut input = input();
        input.car = None;

        let report = build_report(&AppConfig::default(), input, clock()).unwrap();
        assert!(!report.validation.valid);
        assert_eq!(report.validation.errors["car"], "Choose a car before booking.");
        assert_eq!(report.validation.errors.len(), 1);
        assert_eq!(report.gate_state, GateState::Editing);
    }

    #[test]
    fn test_currency_override() {
        let mut input = input();
        input.currency = Some(Currency::USD);

        let report = build_report(&AppConfig::default(), input, clock()).unwrap();
        assert_eq!(report.quote.currency, Currency::USD);
        assert_eq!(report.quote.total.amount(), dec!(179.28));
    }

    #[test]
    fn test_currency_without_rate_is_rejected() {
        let mut input = input();
        input.currency = Some(Currency::AUD);

        let result = build_report(&AppConfig::default(), input, clock());
        assert!(matches!(result, Err(CliError::Core(_))));
    }

    #[test]
    fn test_empty_input_quotes_zero() {
        let report = build_report(&AppConfig::default(), QuoteInput::default(), clock()).unwrap();
        assert!(report.quote.total.is_zero());
        assert!(report.quote.lines.is_empty());
        assert!(!report.validation.valid);
    }

    #[test]
    fn test_input_parses_from_json() {
        let raw = r#"{
            "car": {"id": "550e8400-e29b-41d4-a716-446655440001", "name": "Fiat Panda",
                    "daily_rate": {"amount": "30", "currency": "EUR"}},
            "draft": {"pickup_date": "2026-06-08", "return_date": "2026-06-10", "insurance": "basic"},
            "currency": "GBP"
        }"#;
        let input: QuoteInput = serde_json::from_str(raw).unwrap();
        let report = build_report(&AppConfig::default(), input, clock()).unwrap();

        // (30 + 5) × 2 = 70 EUR → 59.50 GBP
        assert_eq!(report.quote.total.amount(), dec!(59.50));
        assert_eq!(report.quote.rental_days, 2);
    }

    #[test]
    fn test_report_serializes() {
        let report = build_report(&AppConfig::default(), input(), clock()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["validation"]["valid"], true);
        assert_eq!(json["gate_state"], "challenge_pending");
        assert_eq!(json["quote"]["lines"].as_array().map(Vec::len), Some(4));
    }
}
