use std::fmt;

use alloy::primitives::U256;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::types::Network;
use crate::validator::ParamSource;

/// Serialize a [`U256`] as its decimal string.
pub fn serialize_u256<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImpactKind {
    Position,
    Swap,
}

impl fmt::Display for ImpactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactKind::Position => f.write_str("Position"),
            ImpactKind::Swap => f.write_str("Swap"),
        }
    }
}

/// One informational line of a market's report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Diagnostic {
    /// Negative impact factor as a multiple of the recommended floor.
    #[serde(rename_all = "camelCase")]
    Recommendation { kind: ImpactKind, ratio: Option<Decimal> },
    /// USD trade sizes reaching `bps` of impact; `None` where the curve is
    /// undefined.
    #[serde(rename_all = "camelCase")]
    TradeSizes {
        kind: ImpactKind,
        bps: u32,
        negative_usd: Option<f64>,
        positive_usd: Option<f64>,
    },
    /// Worst-case yearly rate, as a percentage.
    #[serde(rename_all = "camelCase")]
    AnnualizedRate {
        name: &'static str,
        #[serde(serialize_with = "serialize_u256")]
        value: U256,
        percent: Option<Decimal>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Recommendation { kind, ratio } => match ratio {
                Some(ratio) => write!(
                    f,
                    "{kind} impact compared to recommendation: {ratio}x smallest safe value"
                ),
                None => write!(f, "{kind} impact compared to recommendation: n/a"),
            },
            Diagnostic::TradeSizes {
                bps,
                negative_usd,
                positive_usd,
                ..
            } => {
                let percent = Decimal::new(i64::from(*bps), 2);
                write!(
                    f,
                    "Negative ({percent}%): {}, Positive ({percent}%): {}",
                    format_usd(*negative_usd),
                    format_usd(*positive_usd)
                )
            }
            Diagnostic::AnnualizedRate { name, value, percent } => match percent {
                Some(percent) => write!(f, "{name}: {percent}%"),
                None => write!(f, "{name}: {value} (raw)"),
            },
        }
    }
}

/// `$1,234,567` rounded to whole dollars, `n/a` when undefined.
pub fn format_usd(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v.round(),
        Some(_) => return "$inf".to_string(),
        None => return "n/a".to_string(),
    };

    let digits = format!("{value:.0}");
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}${grouped}")
}

/// Recorded breach of a recommended floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub message: String,
    #[serde(serialize_with = "serialize_u256")]
    pub expected: U256,
    #[serde(serialize_with = "serialize_u256")]
    pub actual: U256,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {}, expected: {}, actual: {}",
            self.message, self.expected, self.actual
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    /// Deployed market token; `None` for declared-only markets.
    pub market_token: Option<String>,
    pub index_token: Option<String>,
    pub long_token: String,
    pub short_token: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl MarketReport {
    /// `<market> index: BTC   long: WBTC.e short: USDC`
    pub fn header(&self) -> String {
        format!(
            "{} index: {:<5} long: {:<5} short: {:<5}",
            self.market_token.as_deref().unwrap_or("(declared)"),
            self.index_token.as_deref().unwrap_or("(swap only)"),
            self.long_token,
            self.short_token
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub network: Network,
    pub source: ParamSource,
    pub markets: Vec<MarketReport>,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(network: Network, source: ParamSource) -> Self {
        Self {
            network,
            source,
            markets: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
