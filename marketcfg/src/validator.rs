//! Risk rules applied to one market at a time.
//!
//! Each check group moves through `Start -> PolicyResolved -> ParamsLoaded ->
//! InvariantsChecked -> SoftChecksRecorded -> Done`. Broken invariants are
//! returned as errors and end the run; factors under the recommended floor
//! are only recorded.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MarketCfgError, Result};
use crate::factor::{float_precision, to_decimal, SECONDS_PER_YEAR};
use crate::impact::{trade_size_for_impact, PRICE_IMPACT_BPS_LEVELS};
use crate::keys;
use crate::multicall::BatchReadRequest;
use crate::policy::{PolicyTable, RecommendedConfig};
use crate::report::{Diagnostic, ImpactKind, MarketReport, ValidationError};
use crate::types::{MarketFactors, Network};

/// Where market parameters come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamSource {
    /// Declared configuration, no network access.
    #[default]
    Static,
    /// Data store values read through the RPC node.
    Live,
}

/// What to do when a market has no recommended policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicyMode {
    #[default]
    Abort,
    /// Log a warning and leave the market out of the report.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    PolicyResolved,
    ParamsLoaded,
    InvariantsChecked,
    SoftChecksRecorded,
    Done,
}

fn take(values: &HashMap<String, U256>, label: &str) -> Result<U256> {
    values
        .get(label)
        .copied()
        .ok_or_else(|| MarketCfgError::MissingLabel(label.to_string()))
}

/// Position impact parameters of a perp market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerpRiskParams {
    pub negative_position_impact_factor: U256,
    pub positive_position_impact_factor: U256,
    pub position_impact_exponent_factor: U256,
}

impl PerpRiskParams {
    pub fn from_factors(factors: &MarketFactors) -> Self {
        Self {
            negative_position_impact_factor: factors.negative_position_impact_factor,
            positive_position_impact_factor: factors.positive_position_impact_factor,
            position_impact_exponent_factor: factors.position_impact_exponent_factor,
        }
    }

    /// Queue the data store reads for `market`.
    pub fn push_reads(
        batch: &mut BatchReadRequest,
        data_store: Address,
        market: Address,
    ) -> Result<()> {
        batch.push_uint(
            data_store,
            keys::position_impact_factor_key(market, false),
            "negativePositionImpactFactor",
        )?;
        batch.push_uint(
            data_store,
            keys::position_impact_factor_key(market, true),
            "positivePositionImpactFactor",
        )?;
        batch.push_uint(
            data_store,
            keys::position_impact_exponent_factor_key(market),
            "positionImpactExponentFactor",
        )
    }

    pub fn from_labels(values: &HashMap<String, U256>) -> Result<Self> {
        Ok(Self {
            negative_position_impact_factor: take(values, "negativePositionImpactFactor")?,
            positive_position_impact_factor: take(values, "positivePositionImpactFactor")?,
            position_impact_exponent_factor: take(values, "positionImpactExponentFactor")?,
        })
    }
}

/// Swap impact, borrowing and funding parameters of any market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRiskParams {
    pub negative_swap_impact_factor: U256,
    pub positive_swap_impact_factor: U256,
    pub swap_impact_exponent_factor: U256,
    pub open_interest_reserve_factor_longs: U256,
    pub open_interest_reserve_factor_shorts: U256,
    pub borrowing_factor_for_longs: U256,
    pub borrowing_factor_for_shorts: U256,
    pub borrowing_exponent_factor_for_longs: U256,
    pub borrowing_exponent_factor_for_shorts: U256,
    pub funding_factor: U256,
    pub funding_exponent_factor: U256,
}

impl SwapRiskParams {
    pub fn from_factors(factors: &MarketFactors) -> Self {
        Self {
            negative_swap_impact_factor: factors.negative_swap_impact_factor,
            positive_swap_impact_factor: factors.positive_swap_impact_factor,
            swap_impact_exponent_factor: factors.swap_impact_exponent_factor,
            open_interest_reserve_factor_longs: factors.open_interest_reserve_factor_longs,
            open_interest_reserve_factor_shorts: factors.open_interest_reserve_factor_shorts,
            borrowing_factor_for_longs: factors.borrowing_factor_for_longs,
            borrowing_factor_for_shorts: factors.borrowing_factor_for_shorts,
            borrowing_exponent_factor_for_longs: factors.borrowing_exponent_factor_for_longs,
            borrowing_exponent_factor_for_shorts: factors.borrowing_exponent_factor_for_shorts,
            funding_factor: factors.funding_factor,
            funding_exponent_factor: factors.funding_exponent_factor,
        }
    }

    pub fn push_reads(
        batch: &mut BatchReadRequest,
        data_store: Address,
        market: Address,
    ) -> Result<()> {
        let reads = [
            (keys::swap_impact_factor_key(market, false), "negativeSwapImpactFactor"),
            (keys::swap_impact_factor_key(market, true), "positiveSwapImpactFactor"),
            (keys::swap_impact_exponent_factor_key(market), "swapImpactExponentFactor"),
            (
                keys::open_interest_reserve_factor_key(market, true),
                "openInterestReserveFactorLongs",
            ),
            (
                keys::open_interest_reserve_factor_key(market, false),
                "openInterestReserveFactorShorts",
            ),
            (keys::borrowing_factor_key(market, true), "borrowingFactorForLongs"),
            (keys::borrowing_exponent_factor_key(market, true), "borrowingExponentFactorForLongs"),
            (keys::borrowing_factor_key(market, false), "borrowingFactorForShorts"),
            (
                keys::borrowing_exponent_factor_key(market, false),
                "borrowingExponentFactorForShorts",
            ),
            (keys::funding_factor_key(market), "fundingFactor"),
            (keys::funding_exponent_factor_key(market), "fundingExponentFactor"),
        ];
        for (key, label) in reads {
            batch.push_uint(data_store, key, label)?;
        }
        Ok(())
    }

    pub fn from_labels(values: &HashMap<String, U256>) -> Result<Self> {
        Ok(Self {
            negative_swap_impact_factor: take(values, "negativeSwapImpactFactor")?,
            positive_swap_impact_factor: take(values, "positiveSwapImpactFactor")?,
            swap_impact_exponent_factor: take(values, "swapImpactExponentFactor")?,
            open_interest_reserve_factor_longs: take(values, "openInterestReserveFactorLongs")?,
            open_interest_reserve_factor_shorts: take(values, "openInterestReserveFactorShorts")?,
            borrowing_factor_for_longs: take(values, "borrowingFactorForLongs")?,
            borrowing_factor_for_shorts: take(values, "borrowingFactorForShorts")?,
            borrowing_exponent_factor_for_longs: take(values, "borrowingExponentFactorForLongs")?,
            borrowing_exponent_factor_for_shorts: take(values, "borrowingExponentFactorForShorts")?,
            funding_factor: take(values, "fundingFactor")?,
            funding_exponent_factor: take(values, "fundingExponentFactor")?,
        })
    }
}

/// Impact factors of one kind, as checked against a policy.
struct ImpactParams<'a> {
    kind: ImpactKind,
    symbol: &'a str,
    negative: U256,
    positive: U256,
    exponent: U256,
}

impl ImpactParams<'_> {
    fn negative_name(&self) -> &'static str {
        match self.kind {
            ImpactKind::Position => "negativePositionImpactFactor",
            ImpactKind::Swap => "negativeSwapImpactFactor",
        }
    }

    fn exponent_name(&self) -> &'static str {
        match self.kind {
            ImpactKind::Position => "positionImpactExponentFactor",
            ImpactKind::Swap => "swapImpactExponentFactor",
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            ImpactKind::Position => "position",
            ImpactKind::Swap => "swap",
        }
    }
}

/// Applies the risk rules of one network.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    network: Network,
    policy: &'a PolicyTable,
    missing_policy: MissingPolicyMode,
}

impl<'a> Validator<'a> {
    pub fn new(
        network: Network,
        policy: &'a PolicyTable,
        missing_policy: MissingPolicyMode,
    ) -> Self {
        Self {
            network,
            policy,
            missing_policy,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Resolve the perp policy; `None` means skip the market.
    pub fn perp_policy(&self, index_symbol: &str) -> Result<Option<RecommendedConfig>> {
        self.tolerate_missing(self.policy.perp_policy(self.network, index_symbol))
    }

    /// Resolve the swap policy; `None` means skip the market.
    pub fn swap_policy(
        &self,
        long_symbol: &str,
        short_symbol: &str,
    ) -> Result<Option<RecommendedConfig>> {
        self.tolerate_missing(self.policy.swap_policy(self.network, long_symbol, short_symbol))
    }

    fn tolerate_missing(
        &self,
        resolved: Result<RecommendedConfig>,
    ) -> Result<Option<RecommendedConfig>> {
        match resolved {
            Ok(config) => Ok(Some(config)),
            Err(MarketCfgError::MissingPolicy { kind, symbol })
                if self.missing_policy == MissingPolicyMode::Skip =>
            {
                warn!(
                    network = %self.network,
                    kind,
                    symbol = %symbol,
                    "no recommended policy, skipping market"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Position impact rules for a perp market.
    pub fn check_perp(
        &self,
        index_symbol: &str,
        policy: &RecommendedConfig,
        params: &PerpRiskParams,
        report: &mut MarketReport,
        errors: &mut Vec<ValidationError>,
    ) -> Result<()> {
        trace_stage(Stage::Start, ImpactKind::Position, index_symbol);
        let impact = ImpactParams {
            kind: ImpactKind::Position,
            symbol: index_symbol,
            negative: params.negative_position_impact_factor,
            positive: params.positive_position_impact_factor,
            exponent: params.position_impact_exponent_factor,
        };
        self.check_impact(&impact, policy, report, errors)?;
        trace_stage(Stage::Done, ImpactKind::Position, index_symbol);
        Ok(())
    }

    /// Swap impact, borrowing and funding rules. Applies to every market.
    pub fn check_swap(
        &self,
        long_symbol: &str,
        policy: &RecommendedConfig,
        params: &SwapRiskParams,
        report: &mut MarketReport,
        errors: &mut Vec<ValidationError>,
    ) -> Result<()> {
        trace_stage(Stage::Start, ImpactKind::Swap, long_symbol);
        let impact = ImpactParams {
            kind: ImpactKind::Swap,
            symbol: long_symbol,
            negative: params.negative_swap_impact_factor,
            positive: params.positive_swap_impact_factor,
            exponent: params.swap_impact_exponent_factor,
        };
        self.check_impact(&impact, policy, report, errors)?;

        check_exponent_is_one(
            "borrowingExponentFactorForLongs",
            long_symbol,
            params.borrowing_exponent_factor_for_longs,
        )?;
        check_exponent_is_one(
            "borrowingExponentFactorForShorts",
            long_symbol,
            params.borrowing_exponent_factor_for_shorts,
        )?;

        let borrowing_longs = annualized_borrowing(
            params.borrowing_factor_for_longs,
            params.open_interest_reserve_factor_longs,
        );
        check_annualized(
            "maxBorrowingFactorForLongsPerYear",
            long_symbol,
            borrowing_longs,
            report,
        )?;

        let borrowing_shorts = annualized_borrowing(
            params.borrowing_factor_for_shorts,
            params.open_interest_reserve_factor_shorts,
        );
        check_annualized(
            "maxBorrowingFactorForShortsPerYear",
            long_symbol,
            borrowing_shorts,
            report,
        )?;

        check_exponent_is_one(
            "fundingExponentFactor",
            long_symbol,
            params.funding_exponent_factor,
        )?;
        let funding = annualized_funding(params.funding_factor);
        check_annualized("maxFundingFactorPerYear", long_symbol, funding, report)?;

        trace_stage(Stage::Done, ImpactKind::Swap, long_symbol);
        Ok(())
    }

    fn check_impact(
        &self,
        impact: &ImpactParams<'_>,
        policy: &RecommendedConfig,
        report: &mut MarketReport,
        errors: &mut Vec<ValidationError>,
    ) -> Result<()> {
        trace_stage(Stage::PolicyResolved, impact.kind, impact.symbol);
        trace_stage(Stage::ParamsLoaded, impact.kind, impact.symbol);

        if impact.exponent <= float_precision() {
            return Err(MarketCfgError::ImpactExponentTooLow {
                name: impact.exponent_name(),
                symbol: impact.symbol.to_string(),
                value: impact.exponent,
            });
        }

        report.diagnostics.push(Diagnostic::Recommendation {
            kind: impact.kind,
            ratio: recommendation_ratio(impact.negative, policy.negative_impact_factor),
        });
        for bps in PRICE_IMPACT_BPS_LEVELS {
            report.diagnostics.push(Diagnostic::TradeSizes {
                kind: impact.kind,
                bps,
                negative_usd: trade_size_for_impact(bps, impact.exponent, impact.negative),
                positive_usd: trade_size_for_impact(bps, impact.exponent, impact.positive),
            });
        }

        let ratio = policy.expected_impact_ratio;
        let expected = impact.positive.checked_mul(U256::from(ratio));
        if expected != Some(impact.negative) {
            return Err(MarketCfgError::ImpactRatioMismatch {
                kind: impact.kind_name(),
                symbol: impact.symbol.to_string(),
                negative: impact.negative,
                positive: impact.positive,
                ratio,
            });
        }
        trace_stage(Stage::InvariantsChecked, impact.kind, impact.symbol);

        if impact.negative < policy.negative_impact_factor {
            debug!(
                symbol = impact.symbol,
                kind = %impact.kind,
                "negative impact factor under recommended floor"
            );
            errors.push(ValidationError {
                message: format!("Invalid {} for {}", impact.negative_name(), impact.symbol),
                expected: policy.negative_impact_factor,
                actual: impact.negative,
            });
        }
        trace_stage(Stage::SoftChecksRecorded, impact.kind, impact.symbol);
        Ok(())
    }
}

fn trace_stage(stage: Stage, kind: ImpactKind, symbol: &str) {
    debug!(stage = ?stage, kind = %kind, symbol, "validation stage");
}

/// `negative * 100 / floor`, shown with two truncated decimals.
fn recommendation_ratio(negative: U256, floor: U256) -> Option<rust_decimal::Decimal> {
    if floor.is_zero() {
        return None;
    }
    let percent = negative.saturating_mul(U256::from(100u64)) / floor;
    to_decimal(percent, 2, 2)
}

/// `borrowing * reserve / 1e30 * SECONDS_PER_YEAR`.
pub fn annualized_borrowing(borrowing_factor: U256, open_interest_reserve_factor: U256) -> U256 {
    (borrowing_factor.saturating_mul(open_interest_reserve_factor) / float_precision())
        .saturating_mul(U256::from(SECONDS_PER_YEAR))
}

/// `funding * SECONDS_PER_YEAR`.
pub fn annualized_funding(funding_factor: U256) -> U256 {
    funding_factor.saturating_mul(U256::from(SECONDS_PER_YEAR))
}

fn check_exponent_is_one(name: &'static str, symbol: &str, value: U256) -> Result<()> {
    if value != float_precision() {
        return Err(MarketCfgError::ExponentNotOne {
            name,
            symbol: symbol.to_string(),
            value,
        });
    }
    Ok(())
}

/// At most 100% a year; exactly 100% passes.
fn check_annualized(
    name: &'static str,
    symbol: &str,
    value: U256,
    report: &mut MarketReport,
) -> Result<()> {
    if value > float_precision() {
        return Err(MarketCfgError::AnnualizedRateExceeded {
            name,
            symbol: symbol.to_string(),
            value,
        });
    }
    report.diagnostics.push(Diagnostic::AnnualizedRate {
        name,
        value,
        percent: to_decimal(value, 28, 4),
    });
    Ok(())
}
