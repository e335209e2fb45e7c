//! Declared market tables per network.
//!
//! Declarations only carry the factors that differ from the network
//! defaults; [`crate::registry::materialize`] fills in the rest.

use alloy::primitives::{b256, B256};

use crate::factor::{decimal_to_float, expand_decimals};
use crate::keys::hash_string;
use crate::presets::{stablecoin_swap_overrides, synthetic_overrides};
use crate::types::{FactorOverrides, MarketDeclaration, MarketTokens, Network};

/// Merge override layers left to right; later layers win.
fn layers(parts: &[FactorOverrides]) -> FactorOverrides {
    parts
        .iter()
        .fold(FactorOverrides::default(), |acc, part| acc.then(part))
}

fn pool_caps(long: u64, long_decimals: u32, short: u64, short_decimals: u32) -> FactorOverrides {
    FactorOverrides {
        max_long_token_pool_amount: Some(expand_decimals(long, long_decimals)),
        max_short_token_pool_amount: Some(expand_decimals(short, short_decimals)),
        max_long_token_pool_amount_for_deposit: Some(expand_decimals(long, long_decimals)),
        max_short_token_pool_amount_for_deposit: Some(expand_decimals(short, short_decimals)),
        ..Default::default()
    }
}

/// Negative and positive factors, each given as `(value, decimals)`.
fn position_impact(negative: (u64, u32), positive: (u64, u32)) -> FactorOverrides {
    FactorOverrides {
        negative_position_impact_factor: Some(decimal_to_float(negative.0, negative.1)),
        positive_position_impact_factor: Some(decimal_to_float(positive.0, positive.1)),
        ..Default::default()
    }
}

fn swap_impact(negative: (u64, u32), positive: (u64, u32)) -> FactorOverrides {
    FactorOverrides {
        negative_swap_impact_factor: Some(decimal_to_float(negative.0, negative.1)),
        positive_swap_impact_factor: Some(decimal_to_float(positive.0, positive.1)),
        ..Default::default()
    }
}

fn swap_fees(positive: (u64, u32), negative: (u64, u32)) -> FactorOverrides {
    FactorOverrides {
        swap_fee_factor_for_positive_impact: Some(decimal_to_float(positive.0, positive.1)),
        swap_fee_factor_for_negative_impact: Some(decimal_to_float(negative.0, negative.1)),
        ..Default::default()
    }
}

fn oi_collateral_multiplier(value: u64, decimals: u32) -> FactorOverrides {
    FactorOverrides {
        min_collateral_factor_for_open_interest_multiplier_long: Some(decimal_to_float(
            value, decimals,
        )),
        min_collateral_factor_for_open_interest_multiplier_short: Some(decimal_to_float(
            value, decimals,
        )),
        ..Default::default()
    }
}

fn borrowing(value: u64, decimals: u32) -> FactorOverrides {
    FactorOverrides {
        borrowing_factor_for_longs: Some(decimal_to_float(value, decimals)),
        borrowing_factor_for_shorts: Some(decimal_to_float(value, decimals)),
        ..Default::default()
    }
}

/// High borrowing and funding used to exercise fee paths on testnets.
fn testnet_high_fees() -> FactorOverrides {
    FactorOverrides {
        funding_factor: Some(decimal_to_float(16, 7)),
        ..borrowing(3, 7)
    }
}

/// Fast ADL and small pools for the `TEST` index token.
fn testnet_test_market() -> FactorOverrides {
    layers(&[
        position_impact((25, 6), (125, 7)),
        swap_impact((1, 5), (5, 6)),
        pool_caps(10, 18, 300_000, 6),
        FactorOverrides {
            position_impact_exponent_factor: Some(decimal_to_float(2, 0)),
            swap_impact_exponent_factor: Some(decimal_to_float(2, 0)),
            max_pnl_factor_for_adl_longs: Some(decimal_to_float(2, 2)),
            max_pnl_factor_for_adl_shorts: Some(decimal_to_float(2, 2)),
            min_pnl_factor_after_adl_longs: Some(decimal_to_float(1, 2)),
            min_pnl_factor_after_adl_shorts: Some(decimal_to_float(1, 2)),
            ..Default::default()
        },
    ])
}

/// Perp market with the `PERP:<ticker>/USD` and `SPOT:<ticker>/USD` virtual ids.
fn perp(
    index: &str,
    long: &str,
    short: &str,
    ticker: &str,
    overrides: FactorOverrides,
) -> MarketDeclaration {
    MarketDeclaration::new(MarketTokens::perp(index, long, short), overrides).with_virtual_ids(
        hash_string(&format!("SPOT:{ticker}/USD")),
        hash_string(&format!("PERP:{ticker}/USD")),
    )
}

fn stable_swap(long: &str, short: &str, overrides: FactorOverrides) -> MarketDeclaration {
    MarketDeclaration::new(
        MarketTokens::swap(long, short),
        stablecoin_swap_overrides().then(&overrides),
    )
}

fn plain(index: &str, long: &str, short: &str) -> MarketDeclaration {
    MarketDeclaration::new(MarketTokens::perp(index, long, short), FactorOverrides::default())
}

const TESTNET_ETH_MARKET_ID: B256 =
    b256!("04533437e2e8ae1c70c421e7a0dd36e023e0d6217198f889f9eb9c2a6727481d");
const TESTNET_BTC_MARKET_ID: B256 =
    b256!("11111137e2e8ae1c70c421e7a0dd36e023e0d6217198f889f9eb9c2a6727481f");
const TESTNET_BTC_TOKEN_ID: B256 =
    b256!("04533137e2e8ae1c11111111a0dd36e023e0d6217198f889f9eb9c2a6727481d");
const TESTNET_ETH_TOKEN_ID: B256 =
    b256!("275d2a6e341e6a078d4eee59b08907d1e50825031c5481f9551284f4b7ee2fb9");

fn with_market_id(mut declaration: MarketDeclaration, id: B256) -> MarketDeclaration {
    declaration.virtual_market_id = Some(id);
    declaration
}

fn with_token_id(mut declaration: MarketDeclaration, id: B256) -> MarketDeclaration {
    declaration.virtual_token_id_for_index_token = Some(id);
    declaration
}

/// Declared markets for `network`, in declaration order.
pub fn declared(network: Network) -> Vec<MarketDeclaration> {
    match network {
        Network::Arbitrum => arbitrum(),
        Network::Avalanche => avalanche(),
        Network::ArbitrumGoerli => testnet("WBTC", true),
        Network::AvalancheFuji => avalanche_fuji(),
        Network::Hardhat => hardhat(),
        Network::Localhost => localhost(),
    }
}

fn arbitrum() -> Vec<MarketDeclaration> {
    // Synthetic perps backed by WETH/USDC share one shape.
    let synthetic_on_weth = |oi_multiplier: (u64, u32)| {
        layers(&[
            synthetic_overrides(),
            pool_caps(500, 18, 1_000_000, 6),
            position_impact((8, 9), (4, 9)),
            // impact of WETH-stablecoin swaps
            swap_impact((5, 9), (5, 9)),
            oi_collateral_multiplier(oi_multiplier.0, oi_multiplier.1),
            // 50% OI reserve: 7.5e-9 per second, ~23.65% a year at full utilization
            borrowing(15, 9),
        ])
    };
    let stable_pair = |short_decimals: u32, impact: (u64, u32)| {
        layers(&[
            pool_caps(10_000_000, 6, 10_000_000, short_decimals),
            swap_impact(impact, impact),
            swap_fees((5, 5), (2, 4)),
        ])
    };

    vec![
        perp(
            "BTC",
            "WBTC.e",
            "USDC",
            "BTC",
            layers(&[
                pool_caps(350, 8, 10_000_000, 6),
                // 0.05% for ~4,200,000 USD of imbalance
                position_impact((12, 11), (12, 11)),
                swap_impact((2, 10), (2, 10)),
                oi_collateral_multiplier(2, 10),
            ]),
        ),
        perp(
            "WETH",
            "WETH",
            "USDC",
            "ETH",
            layers(&[
                pool_caps(10_000, 18, 17_500_000, 6),
                position_impact((12, 11), (12, 11)),
                swap_impact((2, 10), (2, 10)),
                oi_collateral_multiplier(2, 10),
            ]),
        ),
        perp("XRP", "WETH", "USDC", "XRP", synthetic_on_weth((2, 9))),
        perp("DOGE", "WETH", "USDC", "DOGE", synthetic_on_weth((5, 9))),
        perp(
            "SOL",
            "SOL",
            "USDC",
            "SOL",
            layers(&[
                pool_caps(50_000, 9, 1_000_000, 6),
                position_impact((1, 8), (5, 9)),
                swap_impact((1, 8), (5, 9)),
                oi_collateral_multiplier(5, 9),
                borrowing(94, 10),
            ]),
        ),
        perp("LTC", "WETH", "USDC", "LTC", synthetic_on_weth((25, 10))),
        perp(
            "UNI",
            "UNI",
            "USDC",
            "UNI",
            layers(&[
                pool_caps(200_000, 18, 1_000_000, 6),
                position_impact((3, 8), (15, 9)),
                swap_impact((3, 8), (15, 9)),
                oi_collateral_multiplier(4, 8),
                borrowing(94, 10),
            ]),
        ),
        perp(
            "LINK",
            "LINK",
            "USDC",
            "LINK",
            layers(&[
                pool_caps(227_000, 18, 1_500_000, 6),
                position_impact((8, 9), (4, 9)),
                swap_impact((8, 9), (4, 9)),
                oi_collateral_multiplier(1, 8),
                borrowing(94, 10),
            ]),
        ),
        perp(
            "ARB",
            "ARB",
            "USDC",
            "ARB",
            layers(&[
                pool_caps(1_500_000, 18, 1_250_000, 6),
                position_impact((8, 9), (4, 9)),
                swap_impact((8, 9), (4, 9)),
                oi_collateral_multiplier(1, 8),
                borrowing(94, 10),
            ]),
        ),
        stable_swap("USDC", "USDC.e", stable_pair(6, (15, 10))),
        stable_swap("USDC", "USDT", stable_pair(6, (5, 9))),
        stable_swap("USDC", "DAI", stable_pair(18, (5, 9))),
    ]
}

fn avalanche() -> Vec<MarketDeclaration> {
    let synthetic_on_wavax = |oi_multiplier: (u64, u32)| {
        layers(&[
            synthetic_overrides(),
            pool_caps(75_000, 18, 1_000_000, 6),
            position_impact((8, 9), (4, 9)),
            // impact of WAVAX-stablecoin swaps
            swap_impact((1, 8), (5, 9)),
            oi_collateral_multiplier(oi_multiplier.0, oi_multiplier.1),
        ])
    };
    let majors = |long_cap: u64, long_decimals: u32| {
        layers(&[
            pool_caps(long_cap, long_decimals, 10_000_000, 6),
            position_impact((12, 11), (12, 11)),
            swap_impact((12, 11), (12, 11)),
            oi_collateral_multiplier(2, 10),
        ])
    };

    vec![
        perp("BTC.b", "BTC.b", "USDC", "BTC", majors(350, 8)),
        perp("WETH.e", "WETH.e", "USDC", "ETH", majors(5000, 18)),
        perp("XRP", "WAVAX", "USDC", "XRP", synthetic_on_wavax((2, 9))),
        perp("DOGE", "WAVAX", "USDC", "DOGE", synthetic_on_wavax((5, 9))),
        perp(
            "SOL",
            "SOL",
            "USDC",
            "SOL",
            layers(&[
                pool_caps(50_000, 9, 1_000_000, 6),
                position_impact((1, 8), (5, 9)),
                swap_impact((1, 8), (5, 9)),
                oi_collateral_multiplier(5, 9),
            ]),
        ),
        perp("LTC", "WAVAX", "USDC", "LTC", synthetic_on_wavax((25, 10))),
        perp(
            "WAVAX",
            "WAVAX",
            "USDC",
            "AVAX",
            layers(&[
                pool_caps(200_000, 18, 1_000_000, 6),
                position_impact((1, 8), (5, 9)),
                swap_impact((1, 8), (5, 9)),
                oi_collateral_multiplier(2, 8),
            ]),
        ),
        stable_swap("USDC", "USDT.e", pool_caps(10_000_000, 6, 10_000_000, 6)),
        stable_swap("USDC", "USDC.e", pool_caps(10_000_000, 6, 10_000_000, 6)),
        stable_swap("USDT", "USDT.e", pool_caps(10_000_000, 6, 10_000_000, 6)),
        stable_swap("USDC", "DAI.e", pool_caps(10_000_000, 6, 10_000_000, 18)),
    ]
}

/// Testnet table shared by arbitrumGoerli and avalancheFuji; `collateral` is
/// the volatile long token of the synthetic markets.
fn testnet(collateral: &str, disable_unlisted: bool) -> Vec<MarketDeclaration> {
    let unlisted = |index: &str, short: &str| {
        let declaration = plain(index, collateral, short);
        if disable_unlisted {
            declaration.disabled()
        } else {
            declaration
        }
    };

    vec![
        with_market_id(plain("WETH", "WETH", "USDC"), TESTNET_ETH_MARKET_ID),
        with_market_id(plain("WETH", "WETH", "DAI"), TESTNET_ETH_MARKET_ID),
        plain("WETH", "USDC", "USDC"),
        with_token_id(
            with_market_id(plain("WBTC", "WBTC", "USDC"), TESTNET_BTC_MARKET_ID),
            TESTNET_BTC_TOKEN_ID,
        ),
        plain("WBTC", "WBTC", "DAI"),
        plain("SOL", collateral, "USDC"),
        MarketDeclaration::new(MarketTokens::swap("USDC", "USDT"), FactorOverrides::default()),
        plain("DOGE", collateral, "DAI"),
        plain("LINK", collateral, "DAI"),
        unlisted("BNB", "DAI"),
        unlisted("ADA", "DAI"),
        unlisted("TRX", "DAI"),
        unlisted("MATIC", "USDC"),
        unlisted("DOT", "USDC"),
        unlisted("UNI", "USDC"),
        MarketDeclaration::new(
            MarketTokens::perp("TEST", collateral, "USDC"),
            testnet_test_market(),
        ),
        MarketDeclaration::new(MarketTokens::perp("WBTC", "USDC", "USDT"), testnet_high_fees()),
        MarketDeclaration::new(MarketTokens::perp("WETH", "USDC", "DAI"), testnet_high_fees()),
    ]
}

fn avalanche_fuji() -> Vec<MarketDeclaration> {
    let mut markets = vec![plain("WAVAX", "WAVAX", "USDC")];
    markets.extend(testnet("WETH", false).into_iter().map(|declaration| {
        // Fuji carries extra virtual ids on a few markets.
        match declaration.tokens.to_string().as_str() {
            "WETH:WETH:DAI" | "WETH:USDC:USDC" => with_token_id(declaration, TESTNET_ETH_TOKEN_ID),
            "WBTC:WBTC:DAI" => with_market_id(declaration, TESTNET_BTC_MARKET_ID),
            "SOL:WETH:USDC" => with_market_id(declaration, TESTNET_ETH_MARKET_ID),
            _ => declaration,
        }
    }));
    markets
}

fn hardhat() -> Vec<MarketDeclaration> {
    vec![
        plain("WETH", "WETH", "USDC"),
        plain("WETH", "WETH", "USDT"),
        MarketDeclaration::new(MarketTokens::swap("WETH", "USDC"), FactorOverrides::default()),
        plain("WBTC", "WBTC", "USDC"),
        plain("SOL", "WETH", "USDC"),
        plain("WETH", "USDC", "USDC"),
    ]
}

fn localhost() -> Vec<MarketDeclaration> {
    vec![
        plain("WETH", "WETH", "USDC"),
        MarketDeclaration::new(MarketTokens::swap("WETH", "USDC"), FactorOverrides::default()),
        plain("SOL", "WETH", "USDC"),
    ]
}
