//! Deployed market enumeration through the protocol's `Reader` contract.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};
use tracing::debug;

use crate::error::Result;
use crate::rpc::RpcClient;
use crate::types::MarketKey;

sol! {
    interface IReader {
        struct MarketProps {
            address marketToken;
            address indexToken;
            address longToken;
            address shortToken;
        }

        function getMarkets(address dataStore, uint256 start, uint256 end) external view returns (MarketProps[] memory);
    }
}

/// Upper bound of the market range requested from the reader.
pub const MARKET_PAGE_SIZE: u64 = 100;

/// A deployed market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedMarket {
    pub market_token: Address,
    /// Zero for swap-only markets.
    pub index_token: Address,
    pub long_token: Address,
    pub short_token: Address,
}

impl DeployedMarket {
    pub fn is_swap_only(&self) -> bool {
        self.index_token == Address::ZERO
    }

    pub fn key(&self) -> MarketKey {
        MarketKey {
            index_token: self.index_token,
            long_token: self.long_token,
            short_token: self.short_token,
        }
    }
}

impl From<IReader::MarketProps> for DeployedMarket {
    fn from(props: IReader::MarketProps) -> Self {
        Self {
            market_token: props.marketToken,
            index_token: props.indexToken,
            long_token: props.longToken,
            short_token: props.shortToken,
        }
    }
}

pub(crate) fn encode_get_markets(data_store: Address, start: u64, end: u64) -> Vec<u8> {
    SolCall::abi_encode(&IReader::getMarketsCall {
        dataStore: data_store,
        start: U256::from(start),
        end: U256::from(end),
    })
}

pub(crate) fn decode_markets(data: &[u8]) -> Result<Vec<DeployedMarket>> {
    let props = Vec::<IReader::MarketProps>::abi_decode(data)?;
    Ok(props.into_iter().map(DeployedMarket::from).collect())
}

/// Deployed markets, sorted by index token address.
pub async fn get_markets(
    rpc: &RpcClient,
    reader: Address,
    data_store: Address,
) -> Result<Vec<DeployedMarket>> {
    let data = rpc
        .eth_call(reader, &encode_get_markets(data_store, 0, MARKET_PAGE_SIZE))
        .await?;
    let mut markets = decode_markets(&data)?;
    markets.sort_by_key(|m| m.index_token);
    debug!(count = markets.len(), reader = %reader, "loaded deployed markets");
    Ok(markets)
}

/// ABI-encode markets the way `getMarkets` returns them.
pub fn encode_markets(markets: &[DeployedMarket]) -> Vec<u8> {
    let props: Vec<IReader::MarketProps> = markets
        .iter()
        .map(|m| IReader::MarketProps {
            marketToken: m.market_token,
            indexToken: m.index_token,
            longToken: m.long_token,
            shortToken: m.short_token,
        })
        .collect();
    props.abi_encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_markets_calldata() {
        let data = encode_get_markets(Address::repeat_byte(0x01), 0, MARKET_PAGE_SIZE);
        assert_eq!(&data[..4], IReader::getMarketsCall::SELECTOR.as_slice());
        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(data[4 + 3 * 32 - 1], 100);
    }

    #[test]
    fn test_decode_markets() {
        let markets = vec![
            DeployedMarket {
                market_token: Address::repeat_byte(0x10),
                index_token: Address::repeat_byte(0x01),
                long_token: Address::repeat_byte(0x02),
                short_token: Address::repeat_byte(0x03),
            },
            DeployedMarket {
                market_token: Address::repeat_byte(0x11),
                index_token: Address::ZERO,
                long_token: Address::repeat_byte(0x03),
                short_token: Address::repeat_byte(0x04),
            },
        ];
        let decoded = decode_markets(&encode_markets(&markets)).unwrap();
        assert_eq!(decoded, markets);
        assert!(decoded[1].is_swap_only());
        assert_eq!(decoded[0].key().long_token, Address::repeat_byte(0x02));
    }
}
