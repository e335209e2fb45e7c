pub mod config;
pub mod directory;
pub mod error;
pub mod factor;
pub mod impact;
pub mod keys;
pub mod markets;
pub mod multicall;
pub mod policy;
pub mod presets;
pub mod registry;
pub mod report;
pub mod rpc;
pub mod run;
pub mod tokens;
pub mod types;
pub mod validator;

// ---- Top-level re-exports for ergonomic usage ----

// Config + errors
pub use config::{ChainConfig, MULTICALL3_ADDRESS};
pub use error::{MarketCfgError, Result};

// Declared configuration
pub use registry::{market_config_by_key, market_key, materialize};
pub use types::{
    FactorOverrides, MarketConfig, MarketDeclaration, MarketFactors, MarketKey, MarketTokens,
    Network, TokenInfo, TokenTable,
};

// Policy + rules
pub use impact::{price_impact_for_size, trade_size_for_impact, PRICE_IMPACT_BPS_LEVELS};
pub use policy::{PolicyTable, RecommendedConfig};
pub use validator::{MissingPolicyMode, ParamSource, PerpRiskParams, SwapRiskParams, Validator};

// Chain access
pub use directory::DeployedMarket;
pub use multicall::BatchReadRequest;
pub use rpc::RpcClient;

// Reports + runs
pub use report::{Diagnostic, ImpactKind, MarketReport, ValidationError, ValidationReport};
pub use run::{run, run_with_policy, RunOptions};
