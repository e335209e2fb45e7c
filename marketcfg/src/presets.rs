//! Default factor sets shared by the declared market tables.

use alloy::primitives::U256;

use crate::factor::{decimal_to_float, expand_decimals};
use crate::types::{FactorOverrides, MarketFactors, Network};

/// Defaults for production networks.
pub fn base_factors() -> MarketFactors {
    MarketFactors {
        reserve_factor_longs: decimal_to_float(90, 2),
        reserve_factor_shorts: decimal_to_float(90, 2),
        open_interest_reserve_factor_longs: decimal_to_float(8, 1),
        open_interest_reserve_factor_shorts: decimal_to_float(8, 1),

        min_collateral_factor: decimal_to_float(1, 2),
        min_collateral_factor_for_open_interest_multiplier_long: U256::ZERO,
        min_collateral_factor_for_open_interest_multiplier_short: U256::ZERO,

        max_long_token_pool_amount: expand_decimals(1_000_000_000, 18),
        max_short_token_pool_amount: expand_decimals(1_000_000_000, 18),
        max_long_token_pool_amount_for_deposit: expand_decimals(1_000_000_000, 18),
        max_short_token_pool_amount_for_deposit: expand_decimals(1_000_000_000, 18),
        max_open_interest_for_longs: decimal_to_float(1_000_000_000, 0),
        max_open_interest_for_shorts: decimal_to_float(1_000_000_000, 0),

        max_pnl_factor_for_traders_longs: decimal_to_float(8, 1),
        max_pnl_factor_for_traders_shorts: decimal_to_float(8, 1),
        // no ADL until normal operation
        max_pnl_factor_for_adl_longs: decimal_to_float(1, 0),
        max_pnl_factor_for_adl_shorts: decimal_to_float(1, 0),
        min_pnl_factor_after_adl_longs: decimal_to_float(8, 1),
        min_pnl_factor_after_adl_shorts: decimal_to_float(8, 1),
        max_pnl_factor_for_deposits_longs: decimal_to_float(8, 1),
        max_pnl_factor_for_deposits_shorts: decimal_to_float(8, 1),
        max_pnl_factor_for_withdrawals_longs: decimal_to_float(8, 1),
        max_pnl_factor_for_withdrawals_shorts: decimal_to_float(8, 1),

        position_fee_factor_for_positive_impact: decimal_to_float(5, 4),
        position_fee_factor_for_negative_impact: decimal_to_float(7, 4),
        negative_position_impact_factor: decimal_to_float(1, 7),
        positive_position_impact_factor: decimal_to_float(5, 8),
        position_impact_exponent_factor: decimal_to_float(2, 0),
        negative_max_position_impact_factor: decimal_to_float(1, 2),
        positive_max_position_impact_factor: decimal_to_float(1, 2),
        max_position_impact_factor_for_liquidations: decimal_to_float(1, 2),

        swap_fee_factor_for_positive_impact: decimal_to_float(5, 4),
        swap_fee_factor_for_negative_impact: decimal_to_float(7, 4),
        negative_swap_impact_factor: decimal_to_float(1, 5),
        positive_swap_impact_factor: decimal_to_float(5, 6),
        swap_impact_exponent_factor: decimal_to_float(2, 0),

        min_collateral_usd: decimal_to_float(1, 0),

        // 625e-11 * 80% OI reserve = 5e-9 per second, ~15.77% a year at full utilization
        borrowing_factor_for_longs: decimal_to_float(625, 11),
        borrowing_factor_for_shorts: decimal_to_float(625, 11),
        borrowing_exponent_factor_for_longs: decimal_to_float(1, 0),
        borrowing_exponent_factor_for_shorts: decimal_to_float(1, 0),

        // ~63% a year at 100% skew
        funding_factor: decimal_to_float(2, 8),
        funding_exponent_factor: decimal_to_float(1, 0),
    }
}

/// Tighter reserve and PnL limits for markets whose index token is synthetic.
pub fn synthetic_overrides() -> FactorOverrides {
    FactorOverrides {
        reserve_factor_longs: Some(decimal_to_float(7, 1)),
        reserve_factor_shorts: Some(decimal_to_float(7, 1)),
        open_interest_reserve_factor_longs: Some(decimal_to_float(5, 1)),
        open_interest_reserve_factor_shorts: Some(decimal_to_float(5, 1)),
        ..pnl_overrides()
    }
}

/// Fees and impact for stablecoin-to-stablecoin swap markets.
pub fn stablecoin_swap_overrides() -> FactorOverrides {
    FactorOverrides {
        swap_fee_factor_for_positive_impact: Some(decimal_to_float(1, 4)),
        swap_fee_factor_for_negative_impact: Some(decimal_to_float(1, 4)),
        // 0.01% for 200,000 USD of imbalance
        negative_swap_impact_factor: Some(decimal_to_float(5, 10)),
        positive_swap_impact_factor: Some(decimal_to_float(5, 10)),
        ..Default::default()
    }
}

/// Relaxed limits for local development chains.
pub fn ephemeral_overrides() -> FactorOverrides {
    FactorOverrides {
        reserve_factor_longs: Some(decimal_to_float(5, 1)),
        reserve_factor_shorts: Some(decimal_to_float(5, 1)),
        open_interest_reserve_factor_longs: Some(decimal_to_float(5, 1)),
        open_interest_reserve_factor_shorts: Some(decimal_to_float(5, 1)),
        positive_max_position_impact_factor: Some(decimal_to_float(2, 2)),
        negative_max_position_impact_factor: Some(decimal_to_float(2, 2)),
        max_position_impact_factor_for_liquidations: Some(decimal_to_float(1, 2)),
        ..pnl_overrides()
    }
}

fn pnl_overrides() -> FactorOverrides {
    FactorOverrides {
        max_pnl_factor_for_traders_longs: Some(decimal_to_float(5, 1)),
        max_pnl_factor_for_traders_shorts: Some(decimal_to_float(5, 1)),
        max_pnl_factor_for_adl_longs: Some(decimal_to_float(45, 2)),
        max_pnl_factor_for_adl_shorts: Some(decimal_to_float(45, 2)),
        min_pnl_factor_after_adl_longs: Some(decimal_to_float(4, 1)),
        min_pnl_factor_after_adl_shorts: Some(decimal_to_float(4, 1)),
        max_pnl_factor_for_deposits_longs: Some(decimal_to_float(6, 1)),
        max_pnl_factor_for_deposits_shorts: Some(decimal_to_float(6, 1)),
        max_pnl_factor_for_withdrawals_longs: Some(decimal_to_float(3, 1)),
        max_pnl_factor_for_withdrawals_shorts: Some(decimal_to_float(3, 1)),
        ..Default::default()
    }
}

/// Complete default set used to fill undeclared factors on `network`.
pub fn default_factors(network: Network) -> MarketFactors {
    let base = base_factors();
    if network.is_ephemeral() {
        base.apply(&ephemeral_overrides())
    } else {
        base
    }
}
