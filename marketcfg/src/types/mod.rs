pub mod market;
pub mod network;
pub mod token;

pub use market::{
    FactorOverrides, MarketConfig, MarketDeclaration, MarketFactors, MarketKey, MarketTokens,
};
pub use network::Network;
pub use token::{TokenInfo, TokenTable};
