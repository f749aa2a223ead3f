//! Matching recent activity against learned patterns.

use crate::types::{MatchVerdict, Pattern, Transaction};

/// Policy deciding whether recent activity matches a stored pattern set.
pub trait MatchStrategy: Send + Sync {
    fn evaluate(&self, recent: &[Transaction], patterns: &[Pattern]) -> MatchVerdict;
}

/// Flags any transfer above a fixed amount and attributes it to the first
/// stored pattern.
///
/// This is a placeholder policy: the matched pattern is not checked for
/// relevance to large transfers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LargeTransferStrategy {
    /// Amount (in the asset's base unit) that must be strictly exceeded.
    pub threshold: f64,
    pub confidence: f64,
}

impl LargeTransferStrategy {
    pub const DEFAULT_THRESHOLD: f64 = 10.0;
    pub const DEFAULT_CONFIDENCE: f64 = 0.7;
}

impl Default for LargeTransferStrategy {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            confidence: Self::DEFAULT_CONFIDENCE,
        }
    }
}

impl MatchStrategy for LargeTransferStrategy {
    fn evaluate(&self, recent: &[Transaction], patterns: &[Pattern]) -> MatchVerdict {
        let Some(first) = patterns.first() else {
            return MatchVerdict::no_match();
        };

        if recent.iter().any(|tx| tx.amount() > self.threshold) {
            MatchVerdict::matched(first.clone(), self.confidence)
        } else {
            MatchVerdict::no_match()
        }
    }
}
