//! Fixed-point factor helpers.
//!
//! Protocol factors are unsigned integers scaled by `10^30`. All invariant
//! arithmetic stays in [`U256`]; conversion to `f64` or [`Decimal`] only
//! happens for human-readable diagnostics.

use alloy::primitives::U256;
use rust_decimal::Decimal;

/// Number of decimals of a fixed-point factor.
pub const FLOAT_PRECISION_DECIMALS: u32 = 30;

pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// `10^exp` as a [`U256`].
pub fn pow10(exp: u32) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// `1.0` at factor precision.
pub fn float_precision() -> U256 {
    pow10(FLOAT_PRECISION_DECIMALS)
}

/// `value * 10^-decimals` expressed as a factor, e.g. `decimal_to_float(5, 4)`
/// is 0.05%.
///
/// `decimals` above 30 truncate towards zero.
pub fn decimal_to_float(value: u64, decimals: u32) -> U256 {
    if decimals <= FLOAT_PRECISION_DECIMALS {
        U256::from(value) * pow10(FLOAT_PRECISION_DECIMALS - decimals)
    } else {
        U256::from(value) / pow10(decimals - FLOAT_PRECISION_DECIMALS)
    }
}

/// `value * 10^decimals`, the raw amount of a token with `decimals` precision.
pub fn expand_decimals(value: u64, decimals: u32) -> U256 {
    U256::from(value) * pow10(decimals)
}

/// Lossy conversion of a raw integer to `f64`.
pub fn to_f64(value: U256) -> f64 {
    match u128::try_from(value) {
        Ok(v) => v as f64,
        Err(_) => value.to_string().parse().unwrap_or(f64::INFINITY),
    }
}

/// Lossy conversion of a factor to its real value (`factor / 10^30`).
pub fn factor_to_f64(value: U256) -> f64 {
    to_f64(value) / 1e30
}

/// Render `value / 10^decimals` as a [`Decimal`] keeping at most
/// `display_decimals` fractional digits (truncated).
///
/// Returns `None` if the truncated value does not fit a `Decimal` mantissa.
pub fn to_decimal(value: U256, decimals: u32, display_decimals: u32) -> Option<Decimal> {
    let display = display_decimals.min(decimals).min(28);
    let truncated = value / pow10(decimals - display);
    let raw = u128::try_from(truncated).ok()?;
    let raw = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(raw, display)
        .ok()
        .map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_to_float_one() {
        assert_eq!(decimal_to_float(1, 0), float_precision());
        assert_eq!(
            float_precision().to_string(),
            "1000000000000000000000000000000"
        );
    }

    #[test]
    fn test_decimal_to_float_fraction() {
        // 12e-11 at 30 decimals = 12 * 10^19
        assert_eq!(decimal_to_float(12, 11), U256::from(12u64) * pow10(19));
        // 0.05% = 5e-4
        assert_eq!(decimal_to_float(5, 4), U256::from(5u64) * pow10(26));
    }

    #[test]
    fn test_decimal_to_float_beyond_precision() {
        assert_eq!(decimal_to_float(1234, 32), U256::from(12u64));
    }

    #[test]
    fn test_expand_decimals() {
        assert_eq!(expand_decimals(350, 8), U256::from(35_000_000_000u64));
        assert_eq!(expand_decimals(0, 18), U256::ZERO);
    }

    #[test]
    fn test_seconds_per_year() {
        assert_eq!(SECONDS_PER_YEAR, 31_536_000);
    }

    #[test]
    fn test_factor_to_f64() {
        assert_eq!(factor_to_f64(decimal_to_float(2, 0)), 2.0);
        let v = factor_to_f64(decimal_to_float(12, 11));
        assert!((v - 1.2e-10).abs() / 1.2e-10 < 1e-12);
    }

    #[test]
    fn test_to_f64_beyond_u128() {
        let big = pow10(40);
        assert!((to_f64(big) - 1e40).abs() / 1e40 < 1e-12);
    }

    #[test]
    fn test_to_decimal_percentage() {
        // 15.768% expressed as factor, shown as percent with 28 decimals
        let rate = decimal_to_float(15768, 5);
        assert_eq!(to_decimal(rate, 28, 4), Some(dec!(15.768)));
    }

    #[test]
    fn test_to_decimal_truncates() {
        let v = decimal_to_float(123456, 6); // 0.123456
        assert_eq!(to_decimal(v, 30, 3), Some(dec!(0.123)));
    }

    #[test]
    fn test_to_decimal_overflow() {
        assert_eq!(to_decimal(U256::MAX, 0, 0), None);
    }
}
