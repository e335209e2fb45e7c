use alloy::primitives::{Address, U256};
use thiserror::Error;

/// Conditions that abort a validation run.
///
/// Policy breaches that should only be reported (a factor under the
/// recommended floor) are not errors; they land in
/// [`ValidationReport::errors`](crate::report::ValidationReport) instead.
#[derive(Error, Debug)]
pub enum MarketCfgError {
    #[error("duplicate market: {0}")]
    DuplicateMarket(String),

    #[error("market {market} uses token that does not exist: {symbol}")]
    UnknownToken { market: String, symbol: String },

    #[error("token {0} has no known address")]
    TokenAddressUnknown(String),

    #[error("invalid address {value}: {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("no token symbol for address {0}")]
    UnknownTokenAddress(Address),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("empty recommended {kind} config for {symbol}")]
    MissingPolicy { kind: &'static str, symbol: String },

    #[error("short token {0} has not been categorized as a stablecoin")]
    ShortTokenNotStablecoin(String),

    #[error(
        "invalid {kind} impact factors for {symbol}: negative {negative} != positive {positive} * {ratio}"
    )]
    ImpactRatioMismatch {
        kind: &'static str,
        symbol: String,
        negative: U256,
        positive: U256,
        ratio: u64,
    },

    #[error("{name} != 1 for {symbol}: {value}")]
    ExponentNotOne {
        name: &'static str,
        symbol: String,
        value: U256,
    },

    #[error("{name} must be above 1 for {symbol}: {value}")]
    ImpactExponentTooLow {
        name: &'static str,
        symbol: String,
        value: U256,
    },

    #[error("{name} is more than 100% for {symbol}: {value}")]
    AnnualizedRateExceeded {
        name: &'static str,
        symbol: String,
        value: U256,
    },

    #[error("missing chain config: {0}")]
    MissingChainConfig(&'static str),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid hex: {0}")]
    Hex(#[from] alloy::primitives::hex::FromHexError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    #[error("multicall read failed: {label}")]
    MulticallFailed { label: String },

    #[error("multicall result missing label: {0}")]
    MissingLabel(String),

    #[error("duplicate multicall label: {0}")]
    DuplicateLabel(String),

    #[error("invalid RPC url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarketCfgError>;
