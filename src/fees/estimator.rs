//! Custom Fee Estimator
//!
//! Bound checks a user-entered gas price and gas limit, computes the
//! resulting fee in native and fiat units, and classifies it into a
//! settlement tier of the current schedule.

use super::amount::{format_plain, parse_decimal, parse_integer, truncate_fiat, AmountParseError};
use super::config::FeeSettings;
use super::types::*;
use crate::error::{FeeError, FeeResult};
use rust_decimal::Decimal;

// =============================================================================
// Validation
// =============================================================================

/// Check price text against the session bounds
///
/// Empty or non-numeric text is `Incomplete`; a value outside
/// `[price_min, price_max]`, including one too large to represent, is
/// `OutOfRange` with both bounds attached.
pub fn validate_price(text: &str, bounds: &FeeBounds) -> ValidationOutcome<Decimal> {
    let out_of_range = || ValidationOutcome::OutOfRange {
        violation: RangeViolation {
            field: Field::Price,
            value: text.trim().to_string(),
            min: format_plain(bounds.price_min),
            max: format_plain(bounds.price_max),
        },
    };

    match parse_decimal(text) {
        Ok(price) if price < bounds.price_min || price > bounds.price_max => out_of_range(),
        Ok(price) => ValidationOutcome::Valid { value: price },
        Err(AmountParseError::Overflow(_)) => out_of_range(),
        Err(_) => ValidationOutcome::Incomplete,
    }
}

/// Check limit text against the session bounds
pub fn validate_limit(text: &str, bounds: &FeeBounds) -> ValidationOutcome<u64> {
    let out_of_range = || ValidationOutcome::OutOfRange {
        violation: RangeViolation {
            field: Field::Limit,
            value: text.trim().to_string(),
            min: bounds.limit_min.to_string(),
            max: bounds.limit_max.to_string(),
        },
    };

    match parse_integer(text) {
        Ok(limit) if limit < bounds.limit_min || limit > bounds.limit_max => out_of_range(),
        Ok(limit) => ValidationOutcome::Valid { value: limit },
        Err(AmountParseError::Overflow(_)) => out_of_range(),
        Err(_) => ValidationOutcome::Incomplete,
    }
}

/// Validate both fields at once
pub fn validate_input(input: &CustomFeeInput, bounds: &FeeBounds) -> ValidationResult {
    ValidationResult {
        price_valid: validate_price(&input.price, bounds).is_valid(),
        limit_valid: validate_limit(&input.limit, bounds).is_valid(),
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Compute the fee for an already validated price and limit
pub fn compute_fee(
    price: Decimal,
    limit: u64,
    schedule: &FeeSchedule,
    settings: &FeeSettings,
) -> FeeResult<ComputedFee> {
    let native_amount = native_amount(price, limit, settings)?;
    let fiat_amount = truncate_fiat(fiat_amount(native_amount, schedule)?);
    let tier = classify_tier(native_amount, schedule);

    Ok(ComputedFee {
        native_amount,
        fiat_amount,
        tier,
        settlement_minutes: schedule.tier(tier).settlement_minutes,
    })
}

/// `price * limit / 10^rate_decimals`
pub fn native_amount(price: Decimal, limit: u64, settings: &FeeSettings) -> FeeResult<Decimal> {
    price
        .checked_mul(Decimal::from(limit))
        .and_then(|raw| raw.checked_div(settings.rate_scale()))
        .ok_or_else(|| {
            FeeError::overflow("Fee amount overflows")
                .with_details(format!("price={}, limit={}", format_plain(price), limit))
        })
}

/// Convert a native amount to fiat using the fast tier's own fee/fiat pair
///
/// Multiplies before dividing so amounts that convert exactly stay exact.
/// A fast tier with a zero fee carries no rate; the fiat amount is zero.
pub fn fiat_amount(native: Decimal, schedule: &FeeSchedule) -> FeeResult<Decimal> {
    let reference = &schedule.fast;
    if reference.fee_amount.is_zero() {
        return Ok(Decimal::ZERO);
    }

    native
        .checked_mul(reference.fiat_amount)
        .and_then(|scaled| scaled.checked_div(reference.fee_amount))
        .ok_or_else(|| FeeError::overflow("Fiat amount overflows"))
}

/// Descending threshold scan: fast, then normal, slow catches the rest
///
/// Each threshold is inclusive. Relies on the schedule being ordered.
pub fn classify_tier(native: Decimal, schedule: &FeeSchedule) -> FeeTierKind {
    if native >= schedule.fast.fee_amount {
        FeeTierKind::Fast
    } else if native >= schedule.normal.fee_amount {
        FeeTierKind::Normal
    } else {
        FeeTierKind::Slow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bounds() -> FeeBounds {
        FeeBounds::new(&FeeSettings::default(), 21000, dec("5")).unwrap()
    }

    fn schedule() -> FeeSchedule {
        FeeSchedule::new(
            FeeTier::new(dec("1"), dec("0.000000021"), dec("0.05"), 1),
            FeeTier::new(dec("0.8"), dec("0.0000000168"), dec("0.04"), 3),
            FeeTier::new(dec("0.5"), dec("0.0000000105"), dec("0.02"), 10),
        )
    }

    #[test]
    fn test_validate_price_in_range() {
        assert_eq!(validate_price("1", &bounds()), ValidationOutcome::Valid { value: dec("1") });
        assert!(validate_price("0.4", &bounds()).is_valid());
        assert!(validate_price("5", &bounds()).is_valid());
    }

    #[test]
    fn test_validate_price_below_floor() {
        let outcome = validate_price("0.3", &bounds());
        assert!(!outcome.is_valid());
        assert_eq!(outcome.message().unwrap(), "Gas price must be between 0.4 and 5");
    }

    #[test]
    fn test_validate_price_above_ceiling() {
        let outcome = validate_price("5.01", &bounds());
        assert_eq!(outcome.violation().unwrap().value, "5.01");
    }

    #[test]
    fn test_validate_price_silent_cases() {
        assert_eq!(validate_price("", &bounds()), ValidationOutcome::Incomplete);
        assert_eq!(validate_price("abc", &bounds()), ValidationOutcome::Incomplete);
        assert_eq!(validate_price("-1", &bounds()), ValidationOutcome::Incomplete);
    }

    #[test]
    fn test_oversized_numbers_are_out_of_range() {
        let outcome = validate_limit("99999999999999999999", &bounds());
        assert_eq!(outcome.message().unwrap(), "Gas limit must be between 21000 and 210000");
        assert_eq!(outcome.violation().unwrap().value, "99999999999999999999");

        let huge = "9".repeat(40);
        let outcome = validate_price(&huge, &bounds());
        assert_eq!(outcome.message().unwrap(), "Gas price must be between 0.4 and 5");
        assert_eq!(outcome.violation().unwrap().value, huge);
    }

    #[test]
    fn test_validate_price_zero_is_out_of_range() {
        assert!(validate_price("0", &bounds()).violation().is_some());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit("21000", &bounds()).is_valid());
        assert!(validate_limit("210000", &bounds()).is_valid());
        assert_eq!(validate_limit("", &bounds()), ValidationOutcome::Incomplete);
        assert_eq!(validate_limit("21000.5", &bounds()), ValidationOutcome::Incomplete);

        let outcome = validate_limit("210001", &bounds());
        assert_eq!(outcome.message().unwrap(), "Gas limit must be between 21000 and 210000");

        let outcome = validate_limit("20999", &bounds());
        assert!(outcome.violation().is_some());
    }

    #[test]
    fn test_validate_input() {
        let input = CustomFeeInput {
            price: "1".to_string(),
            limit: "1".to_string(),
        };
        let result = validate_input(&input, &bounds());
        assert!(result.price_valid);
        assert!(!result.limit_valid);
        assert!(!result.both_valid());
    }

    #[test]
    fn test_compute_fee_reference_example() {
        let fee = compute_fee(dec("1"), 21000, &schedule(), &FeeSettings::default()).unwrap();
        assert_eq!(fee.native_text(), "0.000021");
        // 0.000021 * 0.05 / 0.000000021
        assert_eq!(fee.fiat_text(), "50");
        assert_eq!(fee.tier, FeeTierKind::Fast);
        assert_eq!(fee.settlement_minutes, 1);
    }

    #[test]
    fn test_fiat_is_truncated_not_rounded() {
        // 0.000029 * 0.05 / 0.000000021 = 69.047619...
        let fee = compute_fee(dec("1"), 29000, &schedule(), &FeeSettings::default()).unwrap();
        assert_eq!(fee.fiat_text(), "69.04");
    }

    #[test]
    fn test_classify_tier_boundaries() {
        let schedule = schedule();
        assert_eq!(classify_tier(dec("0.000000021"), &schedule), FeeTierKind::Fast);
        assert_eq!(classify_tier(dec("0.0000000209"), &schedule), FeeTierKind::Normal);
        assert_eq!(classify_tier(dec("0.0000000168"), &schedule), FeeTierKind::Normal);
        assert_eq!(classify_tier(dec("0.0000000167"), &schedule), FeeTierKind::Slow);
        assert_eq!(classify_tier(Decimal::ZERO, &schedule), FeeTierKind::Slow);
    }

    #[test]
    fn test_fiat_with_zero_reference_fee() {
        let mut schedule = schedule();
        schedule.fast.fee_amount = Decimal::ZERO;
        assert_eq!(fiat_amount(dec("0.000021"), &schedule).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_native_amount_overflow() {
        let err = native_amount(Decimal::MAX, u64::MAX, &FeeSettings::default()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::AmountOverflow);
    }
}
