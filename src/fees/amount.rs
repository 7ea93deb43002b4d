//! Decimal parsing and display helpers for fee amounts
//!
//! Everything here is locale independent: `.` is the only decimal
//! separator and output never uses exponent notation.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Fractional digits kept in fiat amounts
pub const FIAT_DECIMALS: u32 = 2;

/// Why user text could not be read as an amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("Amount is empty")]
    Empty,

    #[error("Not a plain decimal number: {0}")]
    Malformed(String),

    #[error("Amount out of representable range: {0}")]
    Overflow(String),
}

/// Parse a non-negative plain decimal such as `1`, `0.4`, `.5` or `86.`
pub fn parse_decimal(text: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in trimmed.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return Err(AmountParseError::Malformed(trimmed.to_string())),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(AmountParseError::Malformed(trimmed.to_string()));
    }

    let mut canonical = String::with_capacity(trimmed.len() + 1);
    if trimmed.starts_with('.') {
        canonical.push('0');
    }
    canonical.push_str(trimmed.strip_suffix('.').unwrap_or(trimmed));

    Decimal::from_str(&canonical).map_err(|_| AmountParseError::Overflow(trimmed.to_string()))
}

/// Parse a non-negative integer made of ASCII digits only
pub fn parse_integer(text: &str) -> Result<u64, AmountParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountParseError::Malformed(trimmed.to_string()));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| AmountParseError::Overflow(trimmed.to_string()))
}

/// Parse a fiat figure as reported by the wallet bridge, e.g. `"4.71 USD"`
///
/// Only the leading amount is used; the currency code is dropped.
pub fn parse_fiat_text(text: &str) -> Result<Decimal, AmountParseError> {
    let amount = text.split_whitespace().next().ok_or(AmountParseError::Empty)?;
    parse_decimal(&amount.replace(',', ""))
}

/// Render a decimal without exponent and without trailing zeros
pub fn format_plain(value: Decimal) -> String {
    let normalized = value.normalize();
    if normalized.is_zero() {
        // normalize() keeps the sign of -0
        return "0".to_string();
    }
    normalized.to_string()
}

/// Truncate toward zero to two fractional digits, then strip trailing zeros
///
/// `1.509` becomes `1.5`, `2.001` becomes `2`.
pub fn truncate_fiat(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(FIAT_DECIMALS, RoundingStrategy::ToZero)
        .normalize()
}

/// Whole-unit part of a rate, used to pre-fill the price field
pub fn integer_part(value: Decimal) -> String {
    format_plain(value.trunc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal_accepts_plain_forms() {
        assert_eq!(parse_decimal("1").unwrap(), dec("1"));
        assert_eq!(parse_decimal(" 0.4 ").unwrap(), dec("0.4"));
        assert_eq!(parse_decimal(".5").unwrap(), dec("0.5"));
        assert_eq!(parse_decimal("86.").unwrap(), dec("86"));
    }

    #[test]
    fn test_parse_decimal_rejects_other_forms() {
        assert_eq!(parse_decimal(""), Err(AmountParseError::Empty));
        assert_eq!(parse_decimal("   "), Err(AmountParseError::Empty));
        assert!(matches!(parse_decimal("-1"), Err(AmountParseError::Malformed(_))));
        assert!(matches!(parse_decimal("1e9"), Err(AmountParseError::Malformed(_))));
        assert!(matches!(parse_decimal("1.2.3"), Err(AmountParseError::Malformed(_))));
        assert!(matches!(parse_decimal("."), Err(AmountParseError::Malformed(_))));
        assert!(matches!(parse_decimal("1,5"), Err(AmountParseError::Malformed(_))));
    }

    #[test]
    fn test_parse_decimal_overflow() {
        let huge = "9".repeat(40);
        assert!(matches!(parse_decimal(&huge), Err(AmountParseError::Overflow(_))));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("21000").unwrap(), 21000);
        assert_eq!(parse_integer(" 7 ").unwrap(), 7);
        assert_eq!(parse_integer(""), Err(AmountParseError::Empty));
        assert!(matches!(parse_integer("21000.5"), Err(AmountParseError::Malformed(_))));
        assert!(matches!(parse_integer("+5"), Err(AmountParseError::Malformed(_))));
        assert!(matches!(
            parse_integer("99999999999999999999999"),
            Err(AmountParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_parse_fiat_text() {
        assert_eq!(parse_fiat_text("4.71 USD").unwrap(), dec("4.71"));
        assert_eq!(parse_fiat_text("0.05").unwrap(), dec("0.05"));
        assert_eq!(parse_fiat_text("1,204.10 CNY").unwrap(), dec("1204.10"));
        assert_eq!(parse_fiat_text(""), Err(AmountParseError::Empty));
    }

    #[test]
    fn test_format_plain_never_uses_exponent() {
        assert_eq!(format_plain(dec("0.000021")), "0.000021");
        assert_eq!(format_plain(dec("0.000000021")), "0.000000021");
        assert_eq!(format_plain(dec("5.000")), "5");
        assert_eq!(format_plain(dec("0.00")), "0");
        assert_eq!(format_plain(dec("120")), "120");
    }

    #[test]
    fn test_truncate_fiat() {
        assert_eq!(format_plain(truncate_fiat(dec("1.50"))), "1.5");
        assert_eq!(format_plain(truncate_fiat(dec("2.00"))), "2");
        assert_eq!(format_plain(truncate_fiat(dec("1.509"))), "1.5");
        assert_eq!(format_plain(truncate_fiat(dec("0.0099"))), "0");
        assert_eq!(format_plain(truncate_fiat(dec("49.999999"))), "49.99");
    }

    #[test]
    fn test_integer_part() {
        assert_eq!(integer_part(dec("86.7")), "86");
        assert_eq!(integer_part(dec("20")), "20");
        assert_eq!(integer_part(dec("0.9")), "0");
    }
}
