//! Built-in token tables.

use alloy::primitives::address;

use crate::types::{Network, TokenInfo, TokenTable};

/// Token table for `network`.
///
/// Testnet and local tokens are deployed per environment, so their entries
/// carry no address; live mode on those networks needs a token file.
pub fn builtin(network: Network) -> TokenTable {
    match network {
        Network::Arbitrum => arbitrum(),
        Network::Avalanche => avalanche(),
        Network::ArbitrumGoerli => testnet(),
        Network::AvalancheFuji => testnet().with("WAVAX", TokenInfo::unaddressed(18)),
        Network::Hardhat => unaddressed(&[("WETH", 18), ("USDC", 6), ("USDT", 6), ("WBTC", 8)])
            .with("SOL", unaddressed_synthetic(18)),
        Network::Localhost => unaddressed(&[("WETH", 18), ("USDC", 6)])
            .with("SOL", unaddressed_synthetic(18)),
    }
}

fn arbitrum() -> TokenTable {
    TokenTable::new()
        .with("WETH", TokenInfo::new(address!("82af49447d8a07e3bd95bd0d56f35241523fbab1"), 18))
        .with("WBTC.e", TokenInfo::new(address!("2f2a2543b76a4166549f7aab2e75bef0aefc5b0f"), 8))
        .with("USDC", TokenInfo::new(address!("af88d065e77c8cc2239327c5edb3a432268e5831"), 6))
        .with("USDC.e", TokenInfo::new(address!("ff970a61a04b1ca14834a43f5de4533ebddb5cc8"), 6))
        .with("USDT", TokenInfo::new(address!("fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"), 6))
        .with("DAI", TokenInfo::new(address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1"), 18))
        .with("ARB", TokenInfo::new(address!("912ce59144191c1204e64559fe8253a0e49e6548"), 18))
        .with("LINK", TokenInfo::new(address!("f97f4df75117a78c1a5a0dbb814af92458539fb4"), 18))
        .with("UNI", TokenInfo::new(address!("fa7f8980b0f1e64a2062791cc3b0871572f1f7f0"), 18))
        .with("SOL", TokenInfo::new(address!("2bcc6d6cdbbdc0a4071e48bb3b969b06b3330c07"), 9))
        .with("BTC", TokenInfo::synthetic(address!("47904963fc8b2340414262125af798b9655e58cd"), 8))
        .with("DOGE", TokenInfo::synthetic(address!("c4da4c24fd591125c3f47b340b6f4f76111883d8"), 8))
        .with("LTC", TokenInfo::synthetic(address!("b46a094bc4b0adbd801e14b9db95e05e28962764"), 8))
        .with("XRP", TokenInfo::synthetic(address!("c14e065b0067de91534e032868f5ac6ecf2c6868"), 6))
}

fn avalanche() -> TokenTable {
    TokenTable::new()
        .with("WAVAX", TokenInfo::new(address!("b31f66aa3c1e785363f0875a1b74e27b85fd66c7"), 18))
        .with("WETH.e", TokenInfo::new(address!("49d5c2bdffac6ce2bfdb6640f4f80f226bc10bab"), 18))
        .with("BTC.b", TokenInfo::new(address!("152b9d0fdc40c096757f570a51e494bd4b943e50"), 8))
        .with("USDC", TokenInfo::new(address!("b97ef9ef8734c71904d8002f8b6bc66dd9c48a6e"), 6))
        .with("USDC.e", TokenInfo::new(address!("a7d7079b0fead91f3e65f86e8915cb59c1a4c664"), 6))
        .with("USDT", TokenInfo::new(address!("9702230a8ea53601f5cd2dc00fdbc13d4df4a8c7"), 6))
        .with("USDT.e", TokenInfo::new(address!("c7198437980c041c805a1edcba50c1ce5db95118"), 6))
        .with("DAI.e", TokenInfo::new(address!("d586e7f844cea2f87f50152665bcbc2c279d8d70"), 18))
        .with("SOL", TokenInfo::new(address!("fe6b19286885a4f7f55adad09c3cd1f906d2478f"), 9))
        .with("XRP", TokenInfo::synthetic(address!("34b2885d617ce2dded4f60ccb49809fc17bb58af"), 6))
        .with("DOGE", TokenInfo::synthetic(address!("c301e6fe31062c557aee806cc6a841ae989a3ac6"), 8))
        .with("LTC", TokenInfo::synthetic(address!("8e9c35235c38c44b5a53b56a41eaf6db9a430dd6"), 8))
}

fn testnet() -> TokenTable {
    let mut table = unaddressed(&[
        ("WETH", 18),
        ("USDC", 6),
        ("DAI", 18),
        ("WBTC", 8),
        ("USDT", 6),
    ]);
    for symbol in ["SOL", "DOGE", "LINK", "BNB", "ADA", "TRX", "MATIC", "DOT", "UNI", "TEST"] {
        table.insert(symbol, unaddressed_synthetic(18));
    }
    table
}

fn unaddressed(tokens: &[(&str, u8)]) -> TokenTable {
    let mut table = TokenTable::new();
    for (symbol, decimals) in tokens {
        table.insert(symbol, TokenInfo::unaddressed(*decimals));
    }
    table
}

fn unaddressed_synthetic(decimals: u8) -> TokenInfo {
    TokenInfo {
        synthetic: true,
        ..TokenInfo::unaddressed(decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markets::declared;

    #[test]
    fn test_every_declared_symbol_is_known() {
        for network in Network::ALL {
            let tokens = builtin(network);
            for market in declared(network) {
                for symbol in market.tokens.symbols() {
                    assert!(tokens.contains(symbol), "{network}: {symbol}");
                }
            }
        }
    }

    #[test]
    fn test_mainnet_tokens_have_addresses() {
        for network in [Network::Arbitrum, Network::Avalanche] {
            let tokens = builtin(network);
            assert_eq!(tokens.symbols_by_address().len(), tokens.len());
        }
    }

    #[test]
    fn test_synthetic_flags() {
        let tokens = builtin(Network::Arbitrum);
        assert!(tokens.get("BTC").unwrap().synthetic);
        assert!(!tokens.get("WBTC.e").unwrap().synthetic);
        assert_eq!(tokens.get("WBTC.e").unwrap().decimals, 8);
    }
}
