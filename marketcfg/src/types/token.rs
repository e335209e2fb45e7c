use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::Deserialize;

use crate::error::{MarketCfgError, Result};

/// A token known to the protocol on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// `None` for tokens only deployed by local test fixtures.
    pub address: Option<Address>,
    pub decimals: u8,
    /// Synthetic tokens have no on-chain contract and serve as index tokens only.
    pub synthetic: bool,
}

impl TokenInfo {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self {
            address: Some(address),
            decimals,
            synthetic: false,
        }
    }

    pub fn synthetic(address: Address, decimals: u8) -> Self {
        Self {
            address: Some(address),
            decimals,
            synthetic: true,
        }
    }

    pub fn unaddressed(decimals: u8) -> Self {
        Self {
            address: None,
            decimals,
            synthetic: false,
        }
    }
}

/// Wire shape of a token table file entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenEntry {
    #[serde(default)]
    address: Option<String>,
    decimals: u8,
    #[serde(default)]
    synthetic: bool,
}

/// Symbol to token lookup for one network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTable {
    tokens: BTreeMap<String, TokenInfo>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, info: TokenInfo) {
        self.tokens.insert(symbol.to_string(), info);
    }

    pub fn with(mut self, symbol: &str, info: TokenInfo) -> Self {
        self.insert(symbol, info);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.tokens.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Address of a known token.
    ///
    /// # Errors
    ///
    /// `TokenAddressUnknown` if the symbol is missing or has no address.
    pub fn address_of(&self, symbol: &str) -> Result<Address> {
        self.get(symbol)
            .and_then(|t| t.address)
            .ok_or_else(|| MarketCfgError::TokenAddressUnknown(symbol.to_string()))
    }

    /// Reverse lookup over every token that has an address.
    pub fn symbols_by_address(&self) -> HashMap<Address, String> {
        self.tokens
            .iter()
            .filter_map(|(symbol, info)| info.address.map(|a| (a, symbol.clone())))
            .collect()
    }

    /// Parse a JSON object of `symbol -> { address?, decimals, synthetic? }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, TokenEntry> = serde_json::from_str(json)?;
        let mut table = TokenTable::new();
        for (symbol, entry) in entries {
            let address = entry
                .address
                .as_deref()
                .map(|a| {
                    Address::from_str(a).map_err(|e| MarketCfgError::InvalidAddress {
                        value: a.to_string(),
                        reason: e.to_string(),
                    })
                })
                .transpose()?;
            table.insert(
                &symbol,
                TokenInfo {
                    address,
                    decimals: entry.decimals,
                    synthetic: entry.synthetic,
                },
            );
        }
        Ok(table)
    }

    /// Load a token table file (see [`TokenTable::from_json`]).
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "WETH": { "address": "0x82af49447d8a07e3bd95bd0d56f35241523fbab1", "decimals": 18 },
            "BTC": { "address": "0x47904963fc8b2340414262125af798b9655e58cd", "decimals": 8, "synthetic": true },
            "USDC": { "decimals": 6 }
        }"#;

        let table = TokenTable::from_json(json).unwrap();
        assert_eq!(table.len(), 3);

        let weth = table.get("WETH").unwrap();
        assert_eq!(weth.decimals, 18);
        assert!(!weth.synthetic);
        assert!(weth.address.is_some());

        assert!(table.get("BTC").unwrap().synthetic);
        assert_eq!(table.get("USDC").unwrap().address, None);
    }

    #[test]
    fn test_from_json_bad_address() {
        let json = r#"{ "WETH": { "address": "0xnothex", "decimals": 18 } }"#;
        let err = TokenTable::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            MarketCfgError::InvalidAddress { ref value, .. } if value == "0xnothex"
        ));
    }

    #[test]
    fn test_address_of_unaddressed() {
        let table = TokenTable::new().with("WETH", TokenInfo::unaddressed(18));
        let err = table.address_of("WETH").unwrap_err();
        assert!(matches!(err, MarketCfgError::TokenAddressUnknown(ref s) if s == "WETH"));
        assert!(table.address_of("DAI").is_err());
    }

    #[test]
    fn test_symbols_by_address_skips_unaddressed() {
        let weth = Address::repeat_byte(0x01);
        let table = TokenTable::new()
            .with("WETH", TokenInfo::new(weth, 18))
            .with("USDC", TokenInfo::unaddressed(6));
        let by_address = table.symbols_by_address();
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address.get(&weth).map(String::as_str), Some("WETH"));
    }
}
