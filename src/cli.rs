use std::path::PathBuf;

use clap::Parser;
use marketcfg::{
    ChainConfig, MissingPolicyMode, Network, ParamSource, RunOptions, TokenTable,
};

use crate::error::CliError;

/// riskcheck: validate the market risk configuration of a network.
#[derive(Parser, Debug)]
#[command(name = "riskcheck", version)]
pub struct Args {
    /// Network to validate (arbitrum, avalanche, arbitrumGoerli, avalancheFuji, hardhat, localhost)
    #[arg(long, env = "NETWORK")]
    pub network: Network,

    /// Validate deployed markets with parameters read from the data store
    #[arg(
        long,
        env = "READ_FROM_CHAIN",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub read_from_chain: bool,

    /// JSON-RPC endpoint, required with --read-from-chain
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// DataStore contract address
    #[arg(long, env = "DATA_STORE")]
    pub data_store: Option<String>,

    /// Reader contract address
    #[arg(long, env = "READER")]
    pub reader: Option<String>,

    /// Multicall3 address (defaults to the canonical deployment)
    #[arg(long, env = "MULTICALL")]
    pub multicall: Option<String>,

    /// Token table JSON file replacing the built-in table
    #[arg(long)]
    pub tokens: Option<PathBuf>,

    /// Skip markets without a recommended config instead of aborting
    #[arg(long)]
    pub skip_missing_policy: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn run_options(&self) -> Result<RunOptions, CliError> {
        let mut options = RunOptions::new(self.network);

        if self.skip_missing_policy {
            options.missing_policy = MissingPolicyMode::Skip;
        }
        if let Some(path) = &self.tokens {
            options.tokens = Some(TokenTable::load(path)?);
        }
        if self.read_from_chain {
            options.source = ParamSource::Live;
            options.chain = Some(ChainConfig::from_parts(
                self.rpc_url.as_deref(),
                self.data_store.as_deref(),
                self.reader.as_deref(),
                self.multicall.as_deref(),
            )?);
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that read or set READ_FROM_CHAIN.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn parse_unlocked(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("riskcheck").chain(args.iter().copied()))
    }

    fn parse(args: &[&str]) -> Args {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        parse_unlocked(args).unwrap()
    }

    #[test]
    fn test_static_defaults() {
        let args = parse(&["--network", "arbitrum"]);
        let options = args.run_options().unwrap();
        assert_eq!(options.network, Network::Arbitrum);
        assert_eq!(options.source, ParamSource::Static);
        assert_eq!(options.missing_policy, MissingPolicyMode::Abort);
        assert!(options.chain.is_none());
    }

    #[test]
    fn test_live_requires_addresses() {
        let args = parse(&[
            "--network",
            "avalanche",
            "--read-from-chain",
            "--rpc-url",
            "http://localhost:8545",
        ]);
        let err = args.run_options().unwrap_err();
        assert_eq!(err.to_string(), "missing chain config: data store address");
    }

    #[test]
    fn test_live_options() {
        let args = parse(&[
            "--network",
            "arbitrum",
            "--read-from-chain",
            "--rpc-url",
            "http://localhost:8545",
            "--data-store",
            "0x1111111111111111111111111111111111111111",
            "--reader",
            "0x2222222222222222222222222222222222222222",
            "--skip-missing-policy",
        ]);
        let options = args.run_options().unwrap();
        assert_eq!(options.source, ParamSource::Live);
        assert_eq!(options.missing_policy, MissingPolicyMode::Skip);
        let chain = options.chain.unwrap();
        assert_eq!(chain.multicall, marketcfg::MULTICALL3_ADDRESS);
    }

    #[test]
    fn test_unknown_network_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        assert!(parse_unlocked(&["--network", "mainnet"]).is_err());
    }

    #[test]
    fn test_read_from_chain_env_never_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let cases = [
            ("true", true),
            ("1", true),
            ("yes", true),
            ("false", false),
            ("0", false),
            ("off", false),
        ];
        for (value, expected) in cases {
            std::env::set_var("READ_FROM_CHAIN", value);
            let args = parse_unlocked(&["--network", "arbitrum"]);
            std::env::remove_var("READ_FROM_CHAIN");
            let args = args.unwrap_or_else(|e| panic!("READ_FROM_CHAIN={value}: {e}"));
            assert_eq!(args.read_from_chain, expected, "READ_FROM_CHAIN={value}");
        }
    }
}
