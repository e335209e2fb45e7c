//! Price impact curve.
//!
//! Impact in USD for an imbalance of `size` USD is `factor * size^exponent`,
//! so impact as a fraction of size is `factor * size^(exponent - 1)`.

use alloy::primitives::U256;

use crate::factor::factor_to_f64;

/// Impact levels reported for every market, in basis points.
pub const PRICE_IMPACT_BPS_LEVELS: [u32; 3] = [1, 5, 10];

/// Trade size in USD at which impact reaches `price_impact_bps`.
///
/// `None` when the exponent is not above 1 or the factor is zero.
pub fn trade_size_for_impact(
    price_impact_bps: u32,
    exponent_factor: U256,
    impact_factor: U256,
) -> Option<f64> {
    let exponent = factor_to_f64(exponent_factor);
    let factor = factor_to_f64(impact_factor);
    if exponent <= 1.0 || factor <= 0.0 {
        return None;
    }

    let target = f64::from(price_impact_bps) / 10_000.0;
    Some((target / factor).powf(1.0 / (exponent - 1.0)))
}

/// Impact as a fraction of size for a trade of `size_usd`.
pub fn price_impact_for_size(size_usd: f64, exponent_factor: U256, impact_factor: U256) -> f64 {
    factor_to_f64(impact_factor) * size_usd.powf(factor_to_f64(exponent_factor) - 1.0)
}
