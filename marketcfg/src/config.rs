use std::str::FromStr;

use alloy::primitives::{address, Address};
use url::Url;

use crate::error::{MarketCfgError, Result};

/// Canonical Multicall3 deployment, identical on every EVM chain.
pub const MULTICALL3_ADDRESS: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

/// Endpoints and contracts needed to read live market state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// JSON-RPC endpoint (e.g. `https://arb1.arbitrum.io/rpc`).
    pub rpc_url: Url,
    pub data_store: Address,
    pub reader: Address,
    pub multicall: Address,
}

impl ChainConfig {
    /// Build from optional string inputs as they come from flags or env.
    ///
    /// `multicall` falls back to [`MULTICALL3_ADDRESS`].
    pub fn from_parts(
        rpc_url: Option<&str>,
        data_store: Option<&str>,
        reader: Option<&str>,
        multicall: Option<&str>,
    ) -> Result<Self> {
        let rpc_url = rpc_url.ok_or(MarketCfgError::MissingChainConfig("rpc url"))?;
        let data_store =
            data_store.ok_or(MarketCfgError::MissingChainConfig("data store address"))?;
        let reader = reader.ok_or(MarketCfgError::MissingChainConfig("reader address"))?;

        Ok(Self {
            rpc_url: Url::parse(rpc_url)?,
            data_store: parse_address(data_store)?,
            reader: parse_address(reader)?,
            multicall: multicall.map(parse_address).transpose()?.unwrap_or(MULTICALL3_ADDRESS),
        })
    }
}

pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|e| MarketCfgError::InvalidAddress {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_STORE: &str = "0xFD70de6b91282D8017aA4E741e9Ae325CAb992d8";
    const READER: &str = "0xf60becbba223EEA9495Da3f606753867eC10d139";

    #[test]
    fn test_from_parts_defaults_multicall() {
        let config = ChainConfig::from_parts(
            Some("http://localhost:8545"),
            Some(DATA_STORE),
            Some(READER),
            None,
        )
        .unwrap();
        assert_eq!(config.multicall, MULTICALL3_ADDRESS);
        assert_eq!(config.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(config.data_store, parse_address(DATA_STORE).unwrap());
    }

    #[test]
    fn test_from_parts_missing_reader() {
        let err =
            ChainConfig::from_parts(Some("http://localhost:8545"), Some(DATA_STORE), None, None)
                .unwrap_err();
        assert!(matches!(err, MarketCfgError::MissingChainConfig("reader address")));
    }

    #[test]
    fn test_from_parts_bad_url() {
        let err = ChainConfig::from_parts(Some("not a url"), Some(DATA_STORE), Some(READER), None)
            .unwrap_err();
        assert!(matches!(err, MarketCfgError::InvalidUrl(_)));
    }

    #[test]
    fn test_parse_address_rejects_short() {
        assert!(matches!(
            parse_address("0x1234"),
            Err(MarketCfgError::InvalidAddress { .. })
        ));
    }
}
