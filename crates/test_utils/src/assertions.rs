//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_booking::{BookingField, FieldError, ValidationResult};
use domain_pricing::PriceBreakdown;
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that money values sum exactly to a total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Money sum failed")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts that a breakdown's components and its lines both add up to its total
pub fn assert_breakdown_consistent(breakdown: &PriceBreakdown) {
    assert_money_sum_equals(
        &[
            breakdown.base_price,
            breakdown.insurance_price,
            breakdown.services_price,
            breakdown.one_time_fees,
        ],
        &breakdown.total,
    );

    let lines: Vec<Money> = breakdown.lines.iter().map(|line| line.amount).collect();
    assert_money_sum_equals(&lines, &breakdown.total);
}

/// Asserts that a breakdown is the all-zero quote
pub fn assert_zero_quote(breakdown: &PriceBreakdown) {
    assert!(
        breakdown.is_zero(),
        "Expected zero quote, got total {} with {} lines",
        breakdown.total.amount(),
        breakdown.lines.len()
    );
    assert_money_zero(&breakdown.base_price);
    assert_money_zero(&breakdown.insurance_price);
    assert_money_zero(&breakdown.services_price);
    assert_money_zero(&breakdown.one_time_fees);
}

/// Asserts that validation rejected `field` with exactly `expected`
pub fn assert_field_error(result: &ValidationResult, field: BookingField, expected: FieldError) {
    let errors = result
        .errors()
        .unwrap_or_else(|| panic!("Expected {} to be rejected, but the draft is valid", field));
    assert_eq!(
        errors.get(field),
        Some(expected),
        "Unexpected error for {}; all errors: {:?}",
        field,
        errors
    );
}

/// Asserts that validation did not flag `field`
pub fn assert_field_ok(result: &ValidationResult, field: BookingField) {
    if let Some(errors) = result.errors() {
        assert!(
            !errors.contains(field),
            "Expected {} to pass, got {:?}",
            field,
            errors.get(field)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_assert_money_approx_eq_passes() {
        let a = Money::new(dec!(100.00), Currency::EUR);
        let b = Money::new(dec!(100.005), Currency::EUR);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    #[should_panic(expected = "Currency mismatch")]
    fn test_assert_money_approx_eq_currency_mismatch() {
        let a = Money::new(dec!(100), Currency::EUR);
        let b = Money::new(dec!(100), Currency::USD);
        assert_money_approx_eq(&a, &b, dec!(0.01));
    }

    #[test]
    fn test_assert_zero_quote() {
        assert_zero_quote(&PriceBreakdown::zero(Currency::EUR));
    }
}
