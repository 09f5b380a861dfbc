//! # Amounts
//!
//! Native currency is counted in base units as a plain `u64`; one whole unit
//! is [`UNIT`](crate::config::UNIT) base units. Humans type and read
//! decimal strings, so this module converts between the two without ever
//! going through floating point.

use thiserror::Error;

use crate::config::{BPS_DENOMINATOR, DECIMALS, UNIT};

/// Base units of the native currency.
pub type Amount = u64;

/// Errors produced while parsing a decimal amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountParseError {
    /// The input was empty.
    #[error("amount must not be empty")]
    Empty,

    /// The input contained something other than digits and one dot.
    #[error("invalid amount: {0:?}")]
    Invalid(String),

    /// More fractional digits than the currency supports.
    #[error("too many decimal places: {found} (max {max})")]
    TooPrecise {
        /// Fractional digits present in the input.
        found: usize,
        /// Supported fractional digits.
        max: u8,
    },

    /// The value does not fit in a `u64` of base units.
    #[error("amount overflows u64 base units: {0}")]
    Overflow(String),
}

/// Parses a decimal string such as `"0.01"` into base units.
///
/// # Errors
///
/// Returns [`AmountParseError`] for malformed input, more than
/// [`DECIMALS`] fractional digits, or values above `u64::MAX` base units.
pub fn parse_amount(input: &str) -> Result<Amount, AmountParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountParseError::Empty);
    }

    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return Err(AmountParseError::Invalid(input.to_string()));
    }
    if frac.len() > DECIMALS as usize {
        return Err(AmountParseError::TooPrecise {
            found: frac.len(),
            max: DECIMALS,
        });
    }

    let overflow = || AmountParseError::Overflow(input.to_string());

    let whole_units: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| overflow())?
    };
    let frac_units: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
        padded.parse().map_err(|_| overflow())?
    };

    whole_units
        .checked_mul(UNIT)
        .and_then(|v| v.checked_add(frac_units))
        .ok_or_else(overflow)
}

/// Renders base units as a fixed-precision decimal string.
///
/// `format_amount(1_000_000) == "0.01000000"`.
pub fn format_amount(amount: Amount) -> String {
    format!(
        "{}.{:0width$}",
        amount / UNIT,
        amount % UNIT,
        width = DECIMALS as usize
    )
}

/// Computes `amount * bps / 10_000`, rounding down.
///
/// Returns `None` if `bps` exceeds the denominator. The intermediate
/// product is widened to `u128`, so the multiplication itself cannot
/// overflow.
pub fn share_bps(amount: Amount, bps: u32) -> Option<Amount> {
    if bps > BPS_DENOMINATOR {
        return None;
    }
    let share = (amount as u128) * (bps as u128) / (BPS_DENOMINATOR as u128);
    u64::try_from(share).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_values() {
        assert_eq!(parse_amount("1").unwrap(), UNIT);
        assert_eq!(parse_amount("0.01").unwrap(), 1_000_000);
        assert_eq!(parse_amount(".5").unwrap(), UNIT / 2);
        assert_eq!(parse_amount("2.").unwrap(), 2 * UNIT);
        assert_eq!(parse_amount("0.00000001").unwrap(), 1);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_amount(""), Err(AmountParseError::Empty));
        assert!(matches!(parse_amount("."), Err(AmountParseError::Invalid(_))));
        assert!(matches!(parse_amount("1.2.3"), Err(AmountParseError::Invalid(_))));
        assert!(matches!(parse_amount("-1"), Err(AmountParseError::Invalid(_))));
        assert!(matches!(parse_amount("abc"), Err(AmountParseError::Invalid(_))));
    }

    #[test]
    fn rejects_excess_precision_and_overflow() {
        assert_eq!(
            parse_amount("0.000000001"),
            Err(AmountParseError::TooPrecise { found: 9, max: 8 })
        );
        assert!(matches!(
            parse_amount("999999999999999999"),
            Err(AmountParseError::Overflow(_))
        ));
    }

    #[test]
    fn formats_with_fixed_precision() {
        assert_eq!(format_amount(1_000_000), "0.01000000");
        assert_eq!(format_amount(3 * UNIT + 5), "3.00000005");
        assert_eq!(format_amount(0), "0.00000000");
    }

    #[test]
    fn share_rounds_down() {
        assert_eq!(share_bps(1_000_000, 1_000), Some(100_000));
        assert_eq!(share_bps(999, 1_000), Some(99));
        assert_eq!(share_bps(u64::MAX, 10_000), Some(u64::MAX));
        assert_eq!(share_bps(100, 10_001), None);
    }
}
