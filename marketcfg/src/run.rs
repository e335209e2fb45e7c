//! One validation run over every market of a network.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::config::ChainConfig;
use crate::directory::{self, DeployedMarket};
use crate::error::{MarketCfgError, Result};
use crate::markets;
use crate::multicall::BatchReadRequest;
use crate::policy::{PolicyTable, RecommendedConfig};
use crate::registry::{market_config_by_key, materialize};
use crate::report::{MarketReport, ValidationReport};
use crate::rpc::RpcClient;
use crate::tokens;
use crate::types::{MarketConfig, Network, TokenTable};
use crate::validator::{MissingPolicyMode, ParamSource, PerpRiskParams, SwapRiskParams, Validator};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub network: Network,
    pub source: ParamSource,
    pub missing_policy: MissingPolicyMode,
    /// Replaces the built-in token table of `network`.
    pub tokens: Option<TokenTable>,
    /// Required for [`ParamSource::Live`].
    pub chain: Option<ChainConfig>,
}

impl RunOptions {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            source: ParamSource::Static,
            missing_policy: MissingPolicyMode::Abort,
            tokens: None,
            chain: None,
        }
    }

    fn token_table(&self) -> TokenTable {
        self.tokens
            .clone()
            .unwrap_or_else(|| tokens::builtin(self.network))
    }
}

/// Validate `options.network` with the built-in policy table.
pub async fn run(options: &RunOptions) -> Result<ValidationReport> {
    run_with_policy(options, &PolicyTable::builtin()).await
}

pub async fn run_with_policy(
    options: &RunOptions,
    policy: &PolicyTable,
) -> Result<ValidationReport> {
    let token_table = options.token_table();
    let configs = materialize(
        options.network,
        &markets::declared(options.network),
        &token_table,
    )?;
    let validator = Validator::new(options.network, policy, options.missing_policy);

    match options.source {
        ParamSource::Static => validate_declared(&validator, &configs),
        ParamSource::Live => {
            let chain = options
                .chain
                .as_ref()
                .ok_or(MarketCfgError::MissingChainConfig("rpc url"))?;
            validate_deployed(&validator, &configs, &token_table, chain).await
        }
    }
}

fn market_report(
    market_token: Option<Address>,
    index: Option<&str>,
    long: &str,
    short: &str,
) -> MarketReport {
    MarketReport {
        market_token: market_token.map(|a| a.to_string()),
        index_token: index.map(str::to_string),
        long_token: long.to_string(),
        short_token: short.to_string(),
        diagnostics: Vec::new(),
    }
}

/// Validate declared markets in declaration order, without network access.
pub fn validate_declared(
    validator: &Validator<'_>,
    configs: &[MarketConfig],
) -> Result<ValidationReport> {
    let mut report = ValidationReport::new(validator.network(), ParamSource::Static);

    for config in configs {
        let tokens = &config.tokens;
        if config.is_disabled {
            debug!(market = %tokens, "skipping disabled market");
            continue;
        }
        info!(market = %tokens, "validating declared market");

        let perp = match tokens.index_token.as_deref() {
            Some(index) => match validator.perp_policy(index)? {
                Some(policy) => {
                    let params = PerpRiskParams::from_factors(&config.factors);
                    Some((index, policy, params))
                }
                None => continue,
            },
            None => None,
        };

        let outcome = market_report(
            None,
            tokens.index_token.as_deref(),
            &tokens.long_token,
            &tokens.short_token,
        );
        let params = SwapRiskParams::from_factors(&config.factors);
        check_market(validator, perp, &params, outcome, &mut report)?;
    }

    Ok(report)
}

/// Validate deployed markets with parameters read from the data store.
pub async fn validate_deployed(
    validator: &Validator<'_>,
    configs: &[MarketConfig],
    token_table: &TokenTable,
    chain: &ChainConfig,
) -> Result<ValidationReport> {
    let rpc = RpcClient::new(chain.rpc_url.clone());
    let symbols = token_table.symbols_by_address();
    let declared = market_config_by_key(configs, token_table)?;

    info!(data_store = %chain.data_store, reader = %chain.reader, "reading data from chain");
    let deployed = directory::get_markets(&rpc, chain.reader, chain.data_store).await?;

    let symbol_of = |address: Address| {
        symbols
            .get(&address)
            .map(String::as_str)
            .ok_or(MarketCfgError::UnknownTokenAddress(address))
    };

    let mut report = ValidationReport::new(validator.network(), ParamSource::Live);
    for market in &deployed {
        let index = if market.is_swap_only() {
            None
        } else {
            Some(symbol_of(market.index_token)?)
        };
        let long = symbol_of(market.long_token)?;
        let short = symbol_of(market.short_token)?;

        if !declared.contains_key(&market.key()) {
            info!(market = %market.market_token, "deployed market has no declared config");
        }
        info!(
            market = %market.market_token,
            index = index.unwrap_or("(swap only)"),
            long,
            short,
            "validating deployed market"
        );

        let perp_policy = match index {
            Some(index) => match validator.perp_policy(index)? {
                Some(policy) => Some((index, policy)),
                None => continue,
            },
            None => None,
        };

        let values = read_market_params(&rpc, chain, market, perp_policy.is_some()).await?;

        let perp = match perp_policy {
            Some((index, policy)) => Some((index, policy, PerpRiskParams::from_labels(&values)?)),
            None => None,
        };
        let outcome = market_report(Some(market.market_token), index, long, short);
        let params = SwapRiskParams::from_labels(&values)?;
        check_market(validator, perp, &params, outcome, &mut report)?;
    }

    Ok(report)
}

/// Position impact rules first, then the swap policy lookup and swap rules.
///
/// A market whose swap policy is skipped keeps its position diagnostics.
fn check_market(
    validator: &Validator<'_>,
    perp: Option<(&str, RecommendedConfig, PerpRiskParams)>,
    swap_params: &SwapRiskParams,
    mut outcome: MarketReport,
    report: &mut ValidationReport,
) -> Result<()> {
    if let Some((index, policy, params)) = perp {
        validator.check_perp(index, &policy, &params, &mut outcome, &mut report.errors)?;
    }

    let long = outcome.long_token.clone();
    match validator.swap_policy(&long, &outcome.short_token)? {
        Some(policy) => {
            validator.check_swap(&long, &policy, swap_params, &mut outcome, &mut report.errors)?;
        }
        None if outcome.diagnostics.is_empty() => return Ok(()),
        None => {}
    }

    report.markets.push(outcome);
    Ok(())
}

/// One batch per market covering every parameter the rules need.
async fn read_market_params(
    rpc: &RpcClient,
    chain: &ChainConfig,
    market: &DeployedMarket,
    include_perp: bool,
) -> Result<HashMap<String, U256>> {
    let mut batch = BatchReadRequest::new();
    if include_perp {
        PerpRiskParams::push_reads(&mut batch, chain.data_store, market.market_token)?;
    }
    SwapRiskParams::push_reads(&mut batch, chain.data_store, market.market_token)?;
    batch.execute(rpc, chain.multicall).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::decimal_to_float;
    use crate::report::{Diagnostic, ImpactKind};
    use crate::types::{FactorOverrides, MarketDeclaration, MarketTokens, TokenInfo};

    #[test]
    fn test_mainnet_tables_pass_invariants() {
        let policy = PolicyTable::builtin();
        for network in [Network::Arbitrum, Network::Avalanche] {
            let configs = materialize(
                network,
                &markets::declared(network),
                &tokens::builtin(network),
            )
            .unwrap();
            let validator = Validator::new(network, &policy, MissingPolicyMode::Abort);
            let report = validate_declared(&validator, &configs).unwrap();
            assert_eq!(report.markets.len(), configs.len(), "{network}");
        }
    }

    #[test]
    fn test_testnet_aborts_without_policy() {
        let policy = PolicyTable::builtin();
        let network = Network::ArbitrumGoerli;
        let configs =
            materialize(network, &markets::declared(network), &tokens::builtin(network)).unwrap();
        let validator = Validator::new(network, &policy, MissingPolicyMode::Abort);
        let err = validate_declared(&validator, &configs).unwrap_err();
        assert!(matches!(
            err,
            MarketCfgError::MissingPolicy { kind: "perp", ref symbol } if symbol == "WETH"
        ));
    }

    #[test]
    fn test_skip_mode_reports_nothing_without_policies() {
        let policy = PolicyTable::builtin();
        let network = Network::Hardhat;
        let configs =
            materialize(network, &markets::declared(network), &tokens::builtin(network)).unwrap();
        let validator = Validator::new(network, &policy, MissingPolicyMode::Skip);
        let report = validate_declared(&validator, &configs).unwrap();
        assert!(report.markets.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_skip_mode_still_checks_stablecoin_swaps() {
        // USDC/USDT on fuji keeps the default 2:1 swap impact
        let policy = PolicyTable::builtin();
        let network = Network::AvalancheFuji;
        let configs =
            materialize(network, &markets::declared(network), &tokens::builtin(network)).unwrap();
        let validator = Validator::new(network, &policy, MissingPolicyMode::Skip);
        let err = validate_declared(&validator, &configs).unwrap_err();
        assert!(matches!(
            err,
            MarketCfgError::ImpactRatioMismatch { kind: "swap", ref symbol, ratio: 1, .. }
                if symbol == "USDC"
        ));
    }

    #[test]
    fn test_disabled_markets_skipped() {
        let policy = PolicyTable::builtin();
        let tokens = tokens::builtin(Network::Arbitrum);
        let mut configs = materialize(
            Network::Arbitrum,
            &markets::declared(Network::Arbitrum),
            &tokens,
        )
        .unwrap();
        configs.truncate(1);
        configs[0].is_disabled = true;
        let validator = Validator::new(Network::Arbitrum, &policy, MissingPolicyMode::Abort);
        let report = validate_declared(&validator, &configs).unwrap();
        assert!(report.markets.is_empty());
    }

    fn btc_configs(short: &str, negative: U256, positive: U256) -> Vec<MarketConfig> {
        let tokens = TokenTable::new()
            .with("BTC", TokenInfo::synthetic(Address::repeat_byte(0x01), 8))
            .with("PEPE", TokenInfo::new(Address::repeat_byte(0x02), 18))
            .with("WETH", TokenInfo::new(Address::repeat_byte(0x03), 18))
            .with("USDC", TokenInfo::new(Address::repeat_byte(0x04), 6));
        let long = if short == "USDC" { "PEPE" } else { "BTC" };
        let declaration = MarketDeclaration::new(
            MarketTokens::perp("BTC", long, short),
            FactorOverrides {
                negative_position_impact_factor: Some(negative),
                positive_position_impact_factor: Some(positive),
                ..Default::default()
            },
        );
        materialize(Network::Arbitrum, &[declaration], &tokens).unwrap()
    }

    #[test]
    fn test_position_rules_run_before_swap_policy_lookup() {
        // WETH short is not a stablecoin, but the position ratio breaks first
        let x = decimal_to_float(12, 11);
        let configs = btc_configs("WETH", x * U256::from(2u64), x);
        let policy = PolicyTable::builtin();
        let validator = Validator::new(Network::Arbitrum, &policy, MissingPolicyMode::Abort);
        let err = validate_declared(&validator, &configs).unwrap_err();
        assert!(matches!(
            err,
            MarketCfgError::ImpactRatioMismatch { kind: "position", ref symbol, .. }
                if symbol == "BTC"
        ));

        let configs = btc_configs("WETH", x, x);
        let err = validate_declared(&validator, &configs).unwrap_err();
        assert!(matches!(err, MarketCfgError::ShortTokenNotStablecoin(ref s) if s == "WETH"));
    }

    #[test]
    fn test_skipped_swap_policy_keeps_position_diagnostics() {
        let x = decimal_to_float(12, 11);
        let configs = btc_configs("USDC", x, x);
        let policy = PolicyTable::builtin();
        let validator = Validator::new(Network::Arbitrum, &policy, MissingPolicyMode::Skip);
        let report = validate_declared(&validator, &configs).unwrap();
        assert_eq!(report.markets.len(), 1);
        let diagnostics = &report.markets[0].diagnostics;
        assert_eq!(diagnostics.len(), 4);
        assert!(diagnostics.iter().all(|d| !matches!(
            d,
            Diagnostic::Recommendation { kind: ImpactKind::Swap, .. }
                | Diagnostic::AnnualizedRate { .. }
        )));
    }

    #[tokio::test]
    async fn test_live_requires_chain_config() {
        let options = RunOptions {
            source: ParamSource::Live,
            ..RunOptions::new(Network::Arbitrum)
        };
        let err = run(&options).await.unwrap_err();
        assert!(matches!(err, MarketCfgError::MissingChainConfig(_)));
    }
}
