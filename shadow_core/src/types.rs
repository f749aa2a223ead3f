//! Records flowing through the pattern pipeline.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single ledger transaction as delivered by the history source.
///
/// `value` keeps the exact decimal string from the source; the numeric view
/// is only derived when a computation needs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: String,
    pub asset: String,
    pub category: String,
    pub block_number: u64,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl Transaction {
    /// Numeric amount in the asset's base unit. Unparseable values count as zero.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.value.trim().parse::<f64>().unwrap_or_else(|_| {
            debug!("Unparseable value {:?} in tx {}", self.value, self.hash);
            0.0
        })
    }
}

/// Category of a learned behavioral pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Timing,
    #[serde(alias = "behavioral", alias = "behavior")]
    Sequence,
    Value,
    #[serde(alias = "protocol")]
    ProtocolSwitch,
    MarketCorrelation,
}

impl PatternType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timing => "timing",
            Self::Sequence => "sequence",
            Self::Value => "value",
            Self::ProtocolSwitch => "protocol_switch",
            Self::MarketCorrelation => "market_correlation",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional aggregate figures attached to a pattern.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_time_gap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_value: Option<String>,
}

/// A confidence-scored behavioral claim about an address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pattern {
    #[serde(rename = "type")]
    pub kind: PatternType,
    pub description: String,
    #[serde(default)]
    pub actions: Vec<String>,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub occurrences: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PatternDetails>,
}

impl Pattern {
    pub fn new(kind: PatternType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            actions: Vec::new(),
            confidence: 0.0,
            occurrences: 0,
            details: None,
        }
    }

    /// Set the confidence, clamped into `[0, 1]`. NaN becomes zero.
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }

    #[must_use]
    pub const fn with_occurrences(mut self, occurrences: u32) -> Self {
        self.occurrences = occurrences;
        self
    }

    #[must_use]
    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }


    /// Confidence as a whole percentage, e.g. `"70%"`.
    #[must_use]
    pub fn confidence_percent(&self) -> String {
        percent(self.confidence)
    }
}

/// Outcome of comparing recent activity with a stored pattern set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchVerdict {
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    pub confidence: f64,
}

impl MatchVerdict {
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            matched: false,
            pattern: None,
            confidence: 0.0,
        }
    }

    #[must_use]
    pub fn matched(pattern: Pattern, confidence: f64) -> Self {
        Self {
            matched: true,
            pattern: Some(pattern),
            confidence: clamp_unit(confidence),
        }
    }
}

/// Render a unit fraction as a rounded percentage string.
#[must_use]
pub fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
