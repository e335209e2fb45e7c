//! Materialized market configuration for one network.

use std::collections::{HashMap, HashSet};

use alloy::primitives::Address;
use tracing::debug;

use crate::error::{MarketCfgError, Result};
use crate::presets::default_factors;
use crate::types::{MarketConfig, MarketDeclaration, MarketKey, MarketTokens, Network, TokenTable};

/// Check and complete the declared markets of `network`.
///
/// Markets keep their declaration order. Fails on the first market whose
/// symbol triple was already declared, or that names a token missing from
/// `tokens`.
pub fn materialize(
    network: Network,
    declarations: &[MarketDeclaration],
    tokens: &TokenTable,
) -> Result<Vec<MarketConfig>> {
    let defaults = default_factors(network);
    let mut seen = HashSet::new();
    let mut markets = Vec::with_capacity(declarations.len());

    for declaration in declarations {
        let key = declaration.tokens.to_string();
        if !seen.insert(key.clone()) {
            return Err(MarketCfgError::DuplicateMarket(key));
        }

        for symbol in declaration.tokens.symbols() {
            if !tokens.contains(symbol) {
                return Err(MarketCfgError::UnknownToken {
                    market: key,
                    symbol: symbol.to_string(),
                });
            }
        }

        markets.push(MarketConfig {
            tokens: declaration.tokens.clone(),
            factors: defaults.apply(&declaration.overrides),
            virtual_market_id: declaration.virtual_market_id,
            virtual_token_id_for_index_token: declaration.virtual_token_id_for_index_token,
            is_disabled: declaration.is_disabled,
        });
    }

    debug!(network = %network, markets = markets.len(), "materialized market configs");
    Ok(markets)
}

/// On-chain key of a declared market.
pub fn market_key(tokens: &MarketTokens, table: &TokenTable) -> Result<MarketKey> {
    let index_token = match &tokens.index_token {
        Some(symbol) => table.address_of(symbol)?,
        None => Address::ZERO,
    };
    Ok(MarketKey {
        index_token,
        long_token: table.address_of(&tokens.long_token)?,
        short_token: table.address_of(&tokens.short_token)?,
    })
}

/// Index materialized markets by their on-chain key.
pub fn market_config_by_key(
    markets: &[MarketConfig],
    table: &TokenTable,
) -> Result<HashMap<MarketKey, MarketConfig>> {
    markets
        .iter()
        .map(|market| Ok((market_key(&market.tokens, table)?, market.clone())))
        .collect()
}
