//! Recommended impact policy per network.
//!
//! Each entry gives the smallest safe negative impact factor for a token and
//! the expected ratio between negative and positive impact.

use std::collections::{BTreeMap, BTreeSet};

use alloy::primitives::U256;
use serde::Serialize;

use crate::error::{MarketCfgError, Result};
use crate::factor::decimal_to_float;
use crate::types::Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedConfig {
    #[serde(serialize_with = "crate::report::serialize_u256")]
    pub negative_impact_factor: U256,
    pub expected_impact_ratio: u64,
}

impl RecommendedConfig {
    /// Floor at half of `value * 10^-decimals`.
    fn halved(value: u64, decimals: u32, expected_impact_ratio: u64) -> Self {
        Self {
            negative_impact_factor: decimal_to_float(value, decimals) / U256::from(2u64),
            expected_impact_ratio,
        }
    }

    fn is_empty(&self) -> bool {
        self.negative_impact_factor.is_zero()
    }
}

/// Policy lookups for every network.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    by_network: BTreeMap<&'static str, BTreeMap<String, RecommendedConfig>>,
    /// Symbols resolved through another symbol's entry, e.g. a bridged
    /// token using the policy of its underlying.
    remap: BTreeMap<&'static str, BTreeMap<String, String>>,
    stablecoins: BTreeSet<String>,
    stablecoin_swap: RecommendedConfig,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PolicyTable {
    /// Empty table with the given stablecoin set and stablecoin swap policy.
    pub fn new<I, S>(stablecoins: I, stablecoin_swap: RecommendedConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            by_network: BTreeMap::new(),
            remap: BTreeMap::new(),
            stablecoins: stablecoins.into_iter().map(Into::into).collect(),
            stablecoin_swap,
        }
    }

    pub fn insert(&mut self, network: Network, symbol: &str, config: RecommendedConfig) {
        self.by_network
            .entry(network.name())
            .or_default()
            .insert(symbol.to_string(), config);
    }

    pub fn insert_remap(&mut self, network: Network, from: &str, to: &str) {
        self.remap
            .entry(network.name())
            .or_default()
            .insert(from.to_string(), to.to_string());
    }

    pub fn builtin() -> Self {
        let mut table = Self::new(
            ["USDC", "USDC.e", "USDT", "USDT.e", "DAI", "DAI.e"],
            RecommendedConfig::halved(1, 9, 1),
        );

        let arbitrum = [
            ("BTC", RecommendedConfig::halved(5, 11, 1)),
            ("WETH", RecommendedConfig::halved(5, 11, 1)),
            ("LINK", RecommendedConfig::halved(8, 9, 2)),
            ("ARB", RecommendedConfig::halved(8, 9, 2)),
            ("UNI", RecommendedConfig::halved(4, 8, 2)),
            ("LTC", RecommendedConfig::halved(8, 9, 2)),
            ("DOGE", RecommendedConfig::halved(8, 9, 2)),
            ("SOL", RecommendedConfig::halved(5, 9, 2)),
            ("XRP", RecommendedConfig::halved(5, 9, 2)),
        ];
        for (symbol, config) in arbitrum {
            table.insert(Network::Arbitrum, symbol, config);
        }
        table.insert_remap(Network::Arbitrum, "WBTC.e", "BTC");

        let avalanche = [
            ("BTC.b", RecommendedConfig::halved(5, 11, 1)),
            ("WETH.e", RecommendedConfig::halved(5, 11, 1)),
            ("WAVAX", RecommendedConfig::halved(1, 8, 2)),
            ("LTC", RecommendedConfig::halved(8, 9, 2)),
            ("DOGE", RecommendedConfig::halved(8, 9, 2)),
            ("SOL", RecommendedConfig::halved(5, 9, 2)),
            ("XRP", RecommendedConfig::halved(5, 9, 2)),
        ];
        for (symbol, config) in avalanche {
            table.insert(Network::Avalanche, symbol, config);
        }

        table
    }

    pub fn is_stablecoin(&self, symbol: &str) -> bool {
        self.stablecoins.contains(symbol)
    }

    /// Direct entry for `symbol`, else the entry of its remapped symbol.
    pub fn resolve(&self, network: Network, symbol: &str) -> Option<&RecommendedConfig> {
        let entries = self.by_network.get(network.name())?;
        let direct = entries.get(symbol).filter(|c| !c.is_empty());
        direct.or_else(|| {
            let target = self.remap.get(network.name())?.get(symbol)?;
            entries.get(target).filter(|c| !c.is_empty())
        })
    }

    /// Policy for the position impact of a perp market.
    pub fn perp_policy(&self, network: Network, index_symbol: &str) -> Result<RecommendedConfig> {
        self.resolve(network, index_symbol)
            .copied()
            .ok_or_else(|| MarketCfgError::MissingPolicy {
                kind: "perp",
                symbol: index_symbol.to_string(),
            })
    }

    /// Policy for the swap impact of a market's long/short pair.
    ///
    /// The short side must be a stablecoin. Stablecoin pairs use the
    /// stablecoin swap policy, others the long token's policy.
    pub fn swap_policy(
        &self,
        network: Network,
        long_symbol: &str,
        short_symbol: &str,
    ) -> Result<RecommendedConfig> {
        let config = if self.is_stablecoin(long_symbol) && self.is_stablecoin(short_symbol) {
            Some(self.stablecoin_swap).filter(|c| !c.is_empty())
        } else {
            self.resolve(network, long_symbol).copied()
        };

        let config = config.ok_or_else(|| MarketCfgError::MissingPolicy {
            kind: "swap",
            symbol: long_symbol.to_string(),
        })?;

        if !self.is_stablecoin(short_symbol) {
            return Err(MarketCfgError::ShortTokenNotStablecoin(short_symbol.to_string()));
        }

        Ok(config)
    }
}
