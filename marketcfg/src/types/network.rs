use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarketCfgError;

/// Networks with a declared market table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Network {
    Arbitrum,
    Avalanche,
    ArbitrumGoerli,
    AvalancheFuji,
    Hardhat,
    Localhost,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Arbitrum,
        Network::Avalanche,
        Network::ArbitrumGoerli,
        Network::AvalancheFuji,
        Network::Hardhat,
        Network::Localhost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Network::Arbitrum => "arbitrum",
            Network::Avalanche => "avalanche",
            Network::ArbitrumGoerli => "arbitrumGoerli",
            Network::AvalancheFuji => "avalancheFuji",
            Network::Hardhat => "hardhat",
            Network::Localhost => "localhost",
        }
    }

    /// Local development chains that use the relaxed default factor set.
    pub fn is_ephemeral(self) -> bool {
        matches!(self, Network::Hardhat | Network::Localhost)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = MarketCfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MarketCfgError::UnknownNetwork(s.to_string()))
    }
}
