use std::fmt;

use alloy::primitives::{Address, B256, U256};

/// Token roles of a market, by symbol.
///
/// `index_token` is `None` for swap-only markets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketTokens {
    pub index_token: Option<String>,
    pub long_token: String,
    pub short_token: String,
}

impl MarketTokens {
    pub fn perp(index: &str, long: &str, short: &str) -> Self {
        Self {
            index_token: Some(index.to_string()),
            long_token: long.to_string(),
            short_token: short.to_string(),
        }
    }

    pub fn swap(long: &str, short: &str) -> Self {
        Self {
            index_token: None,
            long_token: long.to_string(),
            short_token: short.to_string(),
        }
    }

    pub fn is_swap_only(&self) -> bool {
        self.index_token.is_none()
    }

    /// Declared symbols in role order: index (if any), long, short.
    pub fn symbols(&self) -> Vec<&str> {
        self.index_token
            .as_deref()
            .into_iter()
            .chain([self.long_token.as_str(), self.short_token.as_str()])
            .collect()
    }
}

/// `INDEX:LONG:SHORT`, or `LONG:SHORT` for swap-only markets.
impl fmt::Display for MarketTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols().join(":"))
    }
}

/// On-chain identity of a market: token addresses by role.
///
/// Swap-only markets use the zero address as index token. Two markets with
/// the same tokens in different roles have different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarketKey {
    pub index_token: Address,
    pub long_token: Address,
    pub short_token: Address,
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.index_token, self.long_token, self.short_token)
    }
}

/// Complete risk factor set of a market. Factors are 30-decimal fixed point;
/// pool amounts are raw token amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketFactors {
    // Reserve.
    pub reserve_factor_longs: U256,
    pub reserve_factor_shorts: U256,
    pub open_interest_reserve_factor_longs: U256,
    pub open_interest_reserve_factor_shorts: U256,

    // Collateral.
    pub min_collateral_factor: U256,
    pub min_collateral_factor_for_open_interest_multiplier_long: U256,
    pub min_collateral_factor_for_open_interest_multiplier_short: U256,

    // Pool and open interest caps.
    pub max_long_token_pool_amount: U256,
    pub max_short_token_pool_amount: U256,
    pub max_long_token_pool_amount_for_deposit: U256,
    pub max_short_token_pool_amount_for_deposit: U256,
    pub max_open_interest_for_longs: U256,
    pub max_open_interest_for_shorts: U256,

    // PnL factors.
    pub max_pnl_factor_for_traders_longs: U256,
    pub max_pnl_factor_for_traders_shorts: U256,
    pub max_pnl_factor_for_adl_longs: U256,
    pub max_pnl_factor_for_adl_shorts: U256,
    pub min_pnl_factor_after_adl_longs: U256,
    pub min_pnl_factor_after_adl_shorts: U256,
    pub max_pnl_factor_for_deposits_longs: U256,
    pub max_pnl_factor_for_deposits_shorts: U256,
    pub max_pnl_factor_for_withdrawals_longs: U256,
    pub max_pnl_factor_for_withdrawals_shorts: U256,

    // Position fees and impact.
    pub position_fee_factor_for_positive_impact: U256,
    pub position_fee_factor_for_negative_impact: U256,
    pub negative_position_impact_factor: U256,
    pub positive_position_impact_factor: U256,
    pub position_impact_exponent_factor: U256,
    pub negative_max_position_impact_factor: U256,
    pub positive_max_position_impact_factor: U256,
    pub max_position_impact_factor_for_liquidations: U256,

    // Swap fees and impact.
    pub swap_fee_factor_for_positive_impact: U256,
    pub swap_fee_factor_for_negative_impact: U256,
    pub negative_swap_impact_factor: U256,
    pub positive_swap_impact_factor: U256,
    pub swap_impact_exponent_factor: U256,

    // Position size.
    pub min_collateral_usd: U256,

    // Borrowing.
    pub borrowing_factor_for_longs: U256,
    pub borrowing_factor_for_shorts: U256,
    pub borrowing_exponent_factor_for_longs: U256,
    pub borrowing_exponent_factor_for_shorts: U256,

    // Funding.
    pub funding_factor: U256,
    pub funding_exponent_factor: U256,
}

impl MarketFactors {
    /// Field-by-field merge: every factor set in `overrides` replaces the
    /// value in `self`.
    pub fn apply(&self, overrides: &FactorOverrides) -> MarketFactors {
        MarketFactors {
            reserve_factor_longs: overrides
                .reserve_factor_longs
                .unwrap_or(self.reserve_factor_longs),
            reserve_factor_shorts: overrides
                .reserve_factor_shorts
                .unwrap_or(self.reserve_factor_shorts),
            open_interest_reserve_factor_longs: overrides
                .open_interest_reserve_factor_longs
                .unwrap_or(self.open_interest_reserve_factor_longs),
            open_interest_reserve_factor_shorts: overrides
                .open_interest_reserve_factor_shorts
                .unwrap_or(self.open_interest_reserve_factor_shorts),
            min_collateral_factor: overrides
                .min_collateral_factor
                .unwrap_or(self.min_collateral_factor),
            min_collateral_factor_for_open_interest_multiplier_long: overrides
                .min_collateral_factor_for_open_interest_multiplier_long
                .unwrap_or(self.min_collateral_factor_for_open_interest_multiplier_long),
            min_collateral_factor_for_open_interest_multiplier_short: overrides
                .min_collateral_factor_for_open_interest_multiplier_short
                .unwrap_or(self.min_collateral_factor_for_open_interest_multiplier_short),
            max_long_token_pool_amount: overrides
                .max_long_token_pool_amount
                .unwrap_or(self.max_long_token_pool_amount),
            max_short_token_pool_amount: overrides
                .max_short_token_pool_amount
                .unwrap_or(self.max_short_token_pool_amount),
            max_long_token_pool_amount_for_deposit: overrides
                .max_long_token_pool_amount_for_deposit
                .unwrap_or(self.max_long_token_pool_amount_for_deposit),
            max_short_token_pool_amount_for_deposit: overrides
                .max_short_token_pool_amount_for_deposit
                .unwrap_or(self.max_short_token_pool_amount_for_deposit),
            max_open_interest_for_longs: overrides
                .max_open_interest_for_longs
                .unwrap_or(self.max_open_interest_for_longs),
            max_open_interest_for_shorts: overrides
                .max_open_interest_for_shorts
                .unwrap_or(self.max_open_interest_for_shorts),
            max_pnl_factor_for_traders_longs: overrides
                .max_pnl_factor_for_traders_longs
                .unwrap_or(self.max_pnl_factor_for_traders_longs),
            max_pnl_factor_for_traders_shorts: overrides
                .max_pnl_factor_for_traders_shorts
                .unwrap_or(self.max_pnl_factor_for_traders_shorts),
            max_pnl_factor_for_adl_longs: overrides
                .max_pnl_factor_for_adl_longs
                .unwrap_or(self.max_pnl_factor_for_adl_longs),
            max_pnl_factor_for_adl_shorts: overrides
                .max_pnl_factor_for_adl_shorts
                .unwrap_or(self.max_pnl_factor_for_adl_shorts),
            min_pnl_factor_after_adl_longs: overrides
                .min_pnl_factor_after_adl_longs
                .unwrap_or(self.min_pnl_factor_after_adl_longs),
            min_pnl_factor_after_adl_shorts: overrides
                .min_pnl_factor_after_adl_shorts
                .unwrap_or(self.min_pnl_factor_after_adl_shorts),
            max_pnl_factor_for_deposits_longs: overrides
                .max_pnl_factor_for_deposits_longs
                .unwrap_or(self.max_pnl_factor_for_deposits_longs),
            max_pnl_factor_for_deposits_shorts: overrides
                .max_pnl_factor_for_deposits_shorts
                .unwrap_or(self.max_pnl_factor_for_deposits_shorts),
            max_pnl_factor_for_withdrawals_longs: overrides
                .max_pnl_factor_for_withdrawals_longs
                .unwrap_or(self.max_pnl_factor_for_withdrawals_longs),
            max_pnl_factor_for_withdrawals_shorts: overrides
                .max_pnl_factor_for_withdrawals_shorts
                .unwrap_or(self.max_pnl_factor_for_withdrawals_shorts),
            position_fee_factor_for_positive_impact: overrides
                .position_fee_factor_for_positive_impact
                .unwrap_or(self.position_fee_factor_for_positive_impact),
            position_fee_factor_for_negative_impact: overrides
                .position_fee_factor_for_negative_impact
                .unwrap_or(self.position_fee_factor_for_negative_impact),
            negative_position_impact_factor: overrides
                .negative_position_impact_factor
                .unwrap_or(self.negative_position_impact_factor),
            positive_position_impact_factor: overrides
                .positive_position_impact_factor
                .unwrap_or(self.positive_position_impact_factor),
            position_impact_exponent_factor: overrides
                .position_impact_exponent_factor
                .unwrap_or(self.position_impact_exponent_factor),
            negative_max_position_impact_factor: overrides
                .negative_max_position_impact_factor
                .unwrap_or(self.negative_max_position_impact_factor),
            positive_max_position_impact_factor: overrides
                .positive_max_position_impact_factor
                .unwrap_or(self.positive_max_position_impact_factor),
            max_position_impact_factor_for_liquidations: overrides
                .max_position_impact_factor_for_liquidations
                .unwrap_or(self.max_position_impact_factor_for_liquidations),
            swap_fee_factor_for_positive_impact: overrides
                .swap_fee_factor_for_positive_impact
                .unwrap_or(self.swap_fee_factor_for_positive_impact),
            swap_fee_factor_for_negative_impact: overrides
                .swap_fee_factor_for_negative_impact
                .unwrap_or(self.swap_fee_factor_for_negative_impact),
            negative_swap_impact_factor: overrides
                .negative_swap_impact_factor
                .unwrap_or(self.negative_swap_impact_factor),
            positive_swap_impact_factor: overrides
                .positive_swap_impact_factor
                .unwrap_or(self.positive_swap_impact_factor),
            swap_impact_exponent_factor: overrides
                .swap_impact_exponent_factor
                .unwrap_or(self.swap_impact_exponent_factor),
            min_collateral_usd: overrides.min_collateral_usd.unwrap_or(self.min_collateral_usd),
            borrowing_factor_for_longs: overrides
                .borrowing_factor_for_longs
                .unwrap_or(self.borrowing_factor_for_longs),
            borrowing_factor_for_shorts: overrides
                .borrowing_factor_for_shorts
                .unwrap_or(self.borrowing_factor_for_shorts),
            borrowing_exponent_factor_for_longs: overrides
                .borrowing_exponent_factor_for_longs
                .unwrap_or(self.borrowing_exponent_factor_for_longs),
            borrowing_exponent_factor_for_shorts: overrides
                .borrowing_exponent_factor_for_shorts
                .unwrap_or(self.borrowing_exponent_factor_for_shorts),
            funding_factor: overrides.funding_factor.unwrap_or(self.funding_factor),
            funding_exponent_factor: overrides
                .funding_exponent_factor
                .unwrap_or(self.funding_exponent_factor),
        }
    }
}

/// Partial factor set. Unset fields inherit from whatever it is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorOverrides {
    // Reserve.
    pub reserve_factor_longs: Option<U256>,
    pub reserve_factor_shorts: Option<U256>,
    pub open_interest_reserve_factor_longs: Option<U256>,
    pub open_interest_reserve_factor_shorts: Option<U256>,

    // Collateral.
    pub min_collateral_factor: Option<U256>,
    pub min_collateral_factor_for_open_interest_multiplier_long: Option<U256>,
    pub min_collateral_factor_for_open_interest_multiplier_short: Option<U256>,

    // Pool and open interest caps.
    pub max_long_token_pool_amount: Option<U256>,
    pub max_short_token_pool_amount: Option<U256>,
    pub max_long_token_pool_amount_for_deposit: Option<U256>,
    pub max_short_token_pool_amount_for_deposit: Option<U256>,
    pub max_open_interest_for_longs: Option<U256>,
    pub max_open_interest_for_shorts: Option<U256>,

    // PnL factors.
    pub max_pnl_factor_for_traders_longs: Option<U256>,
    pub max_pnl_factor_for_traders_shorts: Option<U256>,
    pub max_pnl_factor_for_adl_longs: Option<U256>,
    pub max_pnl_factor_for_adl_shorts: Option<U256>,
    pub min_pnl_factor_after_adl_longs: Option<U256>,
    pub min_pnl_factor_after_adl_shorts: Option<U256>,
    pub max_pnl_factor_for_deposits_longs: Option<U256>,
    pub max_pnl_factor_for_deposits_shorts: Option<U256>,
    pub max_pnl_factor_for_withdrawals_longs: Option<U256>,
    pub max_pnl_factor_for_withdrawals_shorts: Option<U256>,

    // Position fees and impact.
    pub position_fee_factor_for_positive_impact: Option<U256>,
    pub position_fee_factor_for_negative_impact: Option<U256>,
    pub negative_position_impact_factor: Option<U256>,
    pub positive_position_impact_factor: Option<U256>,
    pub position_impact_exponent_factor: Option<U256>,
    pub negative_max_position_impact_factor: Option<U256>,
    pub positive_max_position_impact_factor: Option<U256>,
    pub max_position_impact_factor_for_liquidations: Option<U256>,

    // Swap fees and impact.
    pub swap_fee_factor_for_positive_impact: Option<U256>,
    pub swap_fee_factor_for_negative_impact: Option<U256>,
    pub negative_swap_impact_factor: Option<U256>,
    pub positive_swap_impact_factor: Option<U256>,
    pub swap_impact_exponent_factor: Option<U256>,

    // Position size.
    pub min_collateral_usd: Option<U256>,

    // Borrowing.
    pub borrowing_factor_for_longs: Option<U256>,
    pub borrowing_factor_for_shorts: Option<U256>,
    pub borrowing_exponent_factor_for_longs: Option<U256>,
    pub borrowing_exponent_factor_for_shorts: Option<U256>,

    // Funding.
    pub funding_factor: Option<U256>,
    pub funding_exponent_factor: Option<U256>,
}

impl FactorOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn then(&self, other: &FactorOverrides) -> FactorOverrides {
        FactorOverrides {
            reserve_factor_longs: other.reserve_factor_longs.or(self.reserve_factor_longs),
            reserve_factor_shorts: other.reserve_factor_shorts.or(self.reserve_factor_shorts),
            open_interest_reserve_factor_longs: other
                .open_interest_reserve_factor_longs
                .or(self.open_interest_reserve_factor_longs),
            open_interest_reserve_factor_shorts: other
                .open_interest_reserve_factor_shorts
                .or(self.open_interest_reserve_factor_shorts),
            min_collateral_factor: other.min_collateral_factor.or(self.min_collateral_factor),
            min_collateral_factor_for_open_interest_multiplier_long: other
                .min_collateral_factor_for_open_interest_multiplier_long
                .or(self.min_collateral_factor_for_open_interest_multiplier_long),
            min_collateral_factor_for_open_interest_multiplier_short: other
                .min_collateral_factor_for_open_interest_multiplier_short
                .or(self.min_collateral_factor_for_open_interest_multiplier_short),
            max_long_token_pool_amount: other
                .max_long_token_pool_amount
                .or(self.max_long_token_pool_amount),
            max_short_token_pool_amount: other
                .max_short_token_pool_amount
                .or(self.max_short_token_pool_amount),
            max_long_token_pool_amount_for_deposit: other
                .max_long_token_pool_amount_for_deposit
                .or(self.max_long_token_pool_amount_for_deposit),
            max_short_token_pool_amount_for_deposit: other
                .max_short_token_pool_amount_for_deposit
                .or(self.max_short_token_pool_amount_for_deposit),
            max_open_interest_for_longs: other
                .max_open_interest_for_longs
                .or(self.max_open_interest_for_longs),
            max_open_interest_for_shorts: other
                .max_open_interest_for_shorts
                .or(self.max_open_interest_for_shorts),
            max_pnl_factor_for_traders_longs: other
                .max_pnl_factor_for_traders_longs
                .or(self.max_pnl_factor_for_traders_longs),
            max_pnl_factor_for_traders_shorts: other
                .max_pnl_factor_for_traders_shorts
                .or(self.max_pnl_factor_for_traders_shorts),
            max_pnl_factor_for_adl_longs: other
                .max_pnl_factor_for_adl_longs
                .or(self.max_pnl_factor_for_adl_longs),
            max_pnl_factor_for_adl_shorts: other
                .max_pnl_factor_for_adl_shorts
                .or(self.max_pnl_factor_for_adl_shorts),
            min_pnl_factor_after_adl_longs: other
                .min_pnl_factor_after_adl_longs
                .or(self.min_pnl_factor_after_adl_longs),
            min_pnl_factor_after_adl_shorts: other
                .min_pnl_factor_after_adl_shorts
                .or(self.min_pnl_factor_after_adl_shorts),
            max_pnl_factor_for_deposits_longs: other
                .max_pnl_factor_for_deposits_longs
                .or(self.max_pnl_factor_for_deposits_longs),
            max_pnl_factor_for_deposits_shorts: other
                .max_pnl_factor_for_deposits_shorts
                .or(self.max_pnl_factor_for_deposits_shorts),
            max_pnl_factor_for_withdrawals_longs: other
                .max_pnl_factor_for_withdrawals_longs
                .or(self.max_pnl_factor_for_withdrawals_longs),
            max_pnl_factor_for_withdrawals_shorts: other
                .max_pnl_factor_for_withdrawals_shorts
                .or(self.max_pnl_factor_for_withdrawals_shorts),
            position_fee_factor_for_positive_impact: other
                .position_fee_factor_for_positive_impact
                .or(self.position_fee_factor_for_positive_impact),
            position_fee_factor_for_negative_impact: other
                .position_fee_factor_for_negative_impact
                .or(self.position_fee_factor_for_negative_impact),
            negative_position_impact_factor: other
                .negative_position_impact_factor
                .or(self.negative_position_impact_factor),
            positive_position_impact_factor: other
                .positive_position_impact_factor
                .or(self.positive_position_impact_factor),
            position_impact_exponent_factor: other
                .position_impact_exponent_factor
                .or(self.position_impact_exponent_factor),
            negative_max_position_impact_factor: other
                .negative_max_position_impact_factor
                .or(self.negative_max_position_impact_factor),
            positive_max_position_impact_factor: other
                .positive_max_position_impact_factor
                .or(self.positive_max_position_impact_factor),
            max_position_impact_factor_for_liquidations: other
                .max_position_impact_factor_for_liquidations
                .or(self.max_position_impact_factor_for_liquidations),
            swap_fee_factor_for_positive_impact: other
                .swap_fee_factor_for_positive_impact
                .or(self.swap_fee_factor_for_positive_impact),
            swap_fee_factor_for_negative_impact: other
                .swap_fee_factor_for_negative_impact
                .or(self.swap_fee_factor_for_negative_impact),
            negative_swap_impact_factor: other
                .negative_swap_impact_factor
                .or(self.negative_swap_impact_factor),
            positive_swap_impact_factor: other
                .positive_swap_impact_factor
                .or(self.positive_swap_impact_factor),
            swap_impact_exponent_factor: other
                .swap_impact_exponent_factor
                .or(self.swap_impact_exponent_factor),
            min_collateral_usd: other.min_collateral_usd.or(self.min_collateral_usd),
            borrowing_factor_for_longs: other
                .borrowing_factor_for_longs
                .or(self.borrowing_factor_for_longs),
            borrowing_factor_for_shorts: other
                .borrowing_factor_for_shorts
                .or(self.borrowing_factor_for_shorts),
            borrowing_exponent_factor_for_longs: other
                .borrowing_exponent_factor_for_longs
                .or(self.borrowing_exponent_factor_for_longs),
            borrowing_exponent_factor_for_shorts: other
                .borrowing_exponent_factor_for_shorts
                .or(self.borrowing_exponent_factor_for_shorts),
            funding_factor: other.funding_factor.or(self.funding_factor),
            funding_exponent_factor: other.funding_exponent_factor.or(self.funding_exponent_factor),
        }
    }
}

/// A market as declared for a network, before defaults are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDeclaration {
    pub tokens: MarketTokens,
    pub overrides: FactorOverrides,
    pub virtual_market_id: Option<B256>,
    pub virtual_token_id_for_index_token: Option<B256>,
    pub is_disabled: bool,
}

impl MarketDeclaration {
    pub fn new(tokens: MarketTokens, overrides: FactorOverrides) -> Self {
        Self {
            tokens,
            overrides,
            virtual_market_id: None,
            virtual_token_id_for_index_token: None,
            is_disabled: false,
        }
    }

    pub fn with_virtual_ids(mut self, market_id: B256, index_token_id: B256) -> Self {
        self.virtual_market_id = Some(market_id);
        self.virtual_token_id_for_index_token = Some(index_token_id);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_disabled = true;
        self
    }
}

/// Fully materialized market configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub tokens: MarketTokens,
    pub factors: MarketFactors,
    pub virtual_market_id: Option<B256>,
    pub virtual_token_id_for_index_token: Option<B256>,
    pub is_disabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_in_role_order() {
        let perp = MarketTokens::perp("BTC", "WBTC.e", "USDC");
        assert_eq!(perp.symbols(), vec!["BTC", "WBTC.e", "USDC"]);
        assert_eq!(perp.to_string(), "BTC:WBTC.e:USDC");
        assert!(!perp.is_swap_only());

        let swap = MarketTokens::swap("USDC", "USDT");
        assert_eq!(swap.symbols(), vec!["USDC", "USDT"]);
        assert_eq!(swap.to_string(), "USDC:USDT");
        assert!(swap.is_swap_only());
    }

    #[test]
    fn test_overrides_then_later_wins() {
        let base = FactorOverrides {
            funding_factor: Some(U256::from(1u64)),
            reserve_factor_longs: Some(U256::from(2u64)),
            ..Default::default()
        };
        let top = FactorOverrides {
            funding_factor: Some(U256::from(9u64)),
            ..Default::default()
        };
        let merged = base.then(&top);
        assert_eq!(merged.funding_factor, Some(U256::from(9u64)));
        assert_eq!(merged.reserve_factor_longs, Some(U256::from(2u64)));
        assert_eq!(merged.reserve_factor_shorts, None);
    }

    #[test]
    fn test_market_key_role_sensitive() {
        let a = Address::repeat_byte(0x11);
        let b = Address::repeat_byte(0x22);
        let k1 = MarketKey {
            index_token: a,
            long_token: a,
            short_token: b,
        };
        let k2 = MarketKey {
            index_token: a,
            long_token: b,
            short_token: a,
        };
        assert_ne!(k1, k2);
    }
}
