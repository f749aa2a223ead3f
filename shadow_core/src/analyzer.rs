//! Entry points tying segmentation, extraction, storage and matching together.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::digest::summarize;
use crate::extraction::engine::{ExtractionConfig, PatternExtractor, insufficient_data_pattern};
use crate::matcher::{LargeTransferStrategy, MatchStrategy};
use crate::oracle::{DEFAULT_MAX_TOKENS, PatternOracle};
use crate::session::{DEFAULT_SESSION_GAP_MS, SegmentError, segment, sort_newest_first};
use crate::store::{PatternStore, StoreError};
use crate::types::{MatchVerdict, Pattern, Transaction};

/// Tunables for pattern analysis.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalyzerConfig {
    /// Inactivity gap that closes a session, in milliseconds.
    #[serde(default = "AnalyzerConfig::default_session_gap_ms")]
    pub session_gap_ms: i64,
    /// Below this many transactions the oracle is not consulted.
    #[serde(default = "AnalyzerConfig::default_min_transactions")]
    pub min_transactions: usize,
    #[serde(default = "AnalyzerConfig::default_oracle_timeout_secs")]
    pub oracle_timeout_secs: u64,
    #[serde(default = "AnalyzerConfig::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "AnalyzerConfig::default_large_transfer_threshold")]
    pub large_transfer_threshold: f64,
    #[serde(default = "AnalyzerConfig::default_match_confidence")]
    pub match_confidence: f64,
}

impl AnalyzerConfig {
    const fn default_session_gap_ms() -> i64 {
        DEFAULT_SESSION_GAP_MS
    }

    const fn default_min_transactions() -> usize {
        5
    }

    const fn default_oracle_timeout_secs() -> u64 {
        60
    }

    const fn default_max_tokens() -> u32 {
        DEFAULT_MAX_TOKENS
    }

    const fn default_large_transfer_threshold() -> f64 {
        LargeTransferStrategy::DEFAULT_THRESHOLD
    }

    const fn default_match_confidence() -> f64 {
        LargeTransferStrategy::DEFAULT_CONFIDENCE
    }

    #[must_use]
    pub const fn extraction(&self) -> ExtractionConfig {
        ExtractionConfig {
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.oracle_timeout_secs),
        }
    }

    #[must_use]
    pub const fn match_strategy(&self) -> LargeTransferStrategy {
        LargeTransferStrategy {
            threshold: self.large_transfer_threshold,
            confidence: self.match_confidence,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            session_gap_ms: Self::default_session_gap_ms(),
            min_transactions: Self::default_min_transactions(),
            oracle_timeout_secs: Self::default_oracle_timeout_secs(),
            max_tokens: Self::default_max_tokens(),
            large_transfer_threshold: Self::default_large_transfer_threshold(),
            match_confidence: Self::default_match_confidence(),
        }
    }
}

pub struct PatternAnalyzer {
    extractor: PatternExtractor,
    strategy: Box<dyn MatchStrategy>,
    session_gap_ms: i64,
    min_transactions: usize,
}

impl PatternAnalyzer {
    /// Build an analyzer around an oracle chosen once by the caller.
    ///
    /// # Errors
    /// Returns [`SegmentError::InvalidGap`] if the configured gap is not positive.
    pub fn new(oracle: Arc<dyn PatternOracle>, config: &AnalyzerConfig) -> Result<Self, SegmentError> {
        if config.session_gap_ms <= 0 {
            return Err(SegmentError::InvalidGap(config.session_gap_ms));
        }
        Ok(Self {
            extractor: PatternExtractor::new(oracle, config.extraction()),
            strategy: Box::new(config.match_strategy()),
            session_gap_ms: config.session_gap_ms,
            min_transactions: config.min_transactions,
        })
    }

    /// Swap the match policy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn MatchStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn oracle_name(&self) -> &str {
        self.extractor.oracle_name()
    }

    /// Derive behavioral patterns from a transaction history in any order.
    pub async fn analyze(&self, transactions: &[Transaction]) -> Vec<Pattern> {
        if transactions.len() < self.min_transactions {
            info!(
                "Only {} transactions, skipping pattern extraction",
                transactions.len()
            );
            return vec![insufficient_data_pattern()];
        }

        let mut ordered = transactions.to_vec();
        sort_newest_first(&mut ordered);

        let sessions = segment(&ordered, self.session_gap_ms).unwrap_or_else(|e| {
            warn!("Segmentation failed: {e}");
            Vec::new()
        });
        info!(
            "Grouped {} transactions into {} sessions",
            ordered.len(),
            sessions.len()
        );

        let digest = summarize(&ordered, &sessions);
        self.extractor.extract(&digest).await
    }

    /// Analyze and replace the stored pattern set for `address`.
    pub async fn learn(
        &self,
        store: &PatternStore,
        address: &str,
        transactions: &[Transaction],
    ) -> Result<Vec<Pattern>, StoreError> {
        let patterns = self.analyze(transactions).await;
        store.put(address, patterns.clone())?;
        info!("Learned {} patterns for {address}", patterns.len());
        for pattern in &patterns {
            debug!(
                "{address}: {} pattern at {}: {}",
                pattern.kind,
                pattern.confidence_percent(),
                pattern.description
            );
        }
        Ok(patterns)
    }

    /// Compare recent activity with a pattern set.
    #[must_use]
    pub fn match_patterns(&self, recent: &[Transaction], patterns: &[Pattern]) -> MatchVerdict {
        self.strategy.evaluate(recent, patterns)
    }

    /// Compare recent activity with whatever is stored for `address`.
    pub fn check(
        &self,
        store: &PatternStore,
        address: &str,
        recent: &[Transaction],
    ) -> Result<MatchVerdict, StoreError> {
        let patterns = store.get(address)?;
        Ok(self.match_patterns(recent, patterns.as_deref().unwrap_or_default()))
    }
}
