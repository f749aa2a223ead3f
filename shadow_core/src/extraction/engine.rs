//! Oracle-driven pattern extraction.
//!
//! The extractor never fails: an unavailable or failing oracle yields the
//! fallback pattern, and an answer that cannot be read yields no patterns.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::digest::Digest;
use crate::extraction::response::parse_response;
use crate::oracle::{DEFAULT_MAX_TOKENS, OracleError, OracleRequest, PatternOracle};
use crate::types::{Pattern, PatternType};

/// Configuration for the extraction step.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Output budget passed to the oracle.
    pub max_tokens: u32,
    /// Upper bound on a single oracle call.
    pub timeout: Duration,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Pattern returned when no oracle answer is available.
#[must_use]
pub fn fallback_pattern() -> Pattern {
    Pattern::new(PatternType::Sequence, "Regular activity pattern detected")
        .with_actions(["Transfer", "Receive", "Transfer"])
        .with_confidence(0.6)
        .with_occurrences(3)
}

/// Pattern returned when there is too little history to analyze.
#[must_use]
pub fn insufficient_data_pattern() -> Pattern {
    Pattern::new(PatternType::Timing, "Insufficient data for pattern analysis")
}

/// Build the extraction instruction around a digest.
#[must_use]
pub fn build_prompt(digest: &Digest) -> String {
    format!(
        r#"Analyze this whale wallet's behavior and find patterns.

{digest}

Find predictive patterns like:
1. Trading times (e.g., "usually active 2-4 PM EST")
2. Value patterns (e.g., "often moves 10+ ETH at once")
3. Behavioral patterns (e.g., "accumulates then dumps")

Use "timing" for trading times, "value" for value patterns and "sequence" for behavioral patterns.

Return ONLY a JSON array with this structure:
[{{
  "type": "timing",
  "description": "string describing the pattern",
  "actions": ["action1", "action2"],
  "confidence": 0.75,
  "occurrences": 5
}}]"#
    )
}

pub struct PatternExtractor {
    oracle: Arc<dyn PatternOracle>,
    config: ExtractionConfig,
}

impl PatternExtractor {
    pub fn new(oracle: Arc<dyn PatternOracle>, config: ExtractionConfig) -> Self {
        info!("Creating PatternExtractor with oracle: {}", oracle.name());
        Self { oracle, config }
    }

    #[must_use]
    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Ask the oracle for patterns describing `digest`.
    pub async fn extract(&self, digest: &Digest) -> Vec<Pattern> {
        let request = OracleRequest::new(build_prompt(digest)).with_max_tokens(self.config.max_tokens);

        match self.call_oracle(&request).await {
            Ok(text) => {
                debug!("Oracle answered with {} chars", text.len());
                parse_response(&text).into_patterns()
            }
            Err(OracleError::Unavailable) => {
                debug!("No oracle configured, using fallback pattern");
                vec![fallback_pattern()]
            }
            Err(e) => {
                warn!("Oracle call failed: {e}, using fallback pattern");
                vec![fallback_pattern()]
            }
        }
    }

    async fn call_oracle(&self, request: &OracleRequest) -> Result<String, OracleError> {
        tokio::time::timeout(self.config.timeout, self.oracle.complete(request))
            .await
            .map_err(|_| OracleError::Timeout(self.config.timeout.as_secs()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::DisabledOracle;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn digest() -> Digest {
        crate::digest::summarize(&[], &[])
    }

    struct ScriptedOracle {
        reply: Result<String, String>,
        seen: Mutex<Vec<OracleRequest>>,
    }

    impl ScriptedOracle {
        fn answering(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PatternOracle for ScriptedOracle {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(request.clone());
            }
            self.reply
                .clone()
                .map_err(|e| OracleError::Request(anyhow::anyhow!(e)))
        }
    }

    struct StalledOracle;

    #[async_trait]
    impl PatternOracle for StalledOracle {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn complete(&self, _request: &OracleRequest) -> Result<String, OracleError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("[]".to_string())
        }
    }

    #[tokio::test]
    async fn test_disabled_oracle_yields_fallback() {
        let extractor = PatternExtractor::new(Arc::new(DisabledOracle), ExtractionConfig::default());
        let patterns = extractor.extract(&digest()).await;
        assert_eq!(patterns, vec![fallback_pattern()]);
        assert_eq!(patterns[0].kind, PatternType::Sequence);
        assert!((patterns[0].confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(patterns[0].occurrences, 3);
    }

    #[tokio::test]
    async fn test_failing_oracle_yields_fallback() {
        let extractor = PatternExtractor::new(
            Arc::new(ScriptedOracle::failing("quota exceeded")),
            ExtractionConfig::default(),
        );
        assert_eq!(extractor.extract(&digest()).await, vec![fallback_pattern()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_oracle_times_out_to_fallback() {
        let config = ExtractionConfig {
            timeout: Duration::from_secs(5),
            ..ExtractionConfig::default()
        };
        let extractor = PatternExtractor::new(Arc::new(StalledOracle), config);
        assert_eq!(extractor.extract(&digest()).await, vec![fallback_pattern()]);
    }

    #[tokio::test]
    async fn test_unreadable_answer_yields_no_patterns() {
        let extractor = PatternExtractor::new(
            Arc::new(ScriptedOracle::answering("Sorry, nothing to report.")),
            ExtractionConfig::default(),
        );
        assert!(extractor.extract(&digest()).await.is_empty());
    }

    #[tokio::test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn test_answer_is_parsed_and_request_is_bounded() {
        let oracle = Arc::new(ScriptedOracle::answering(
            r#"[{"type":"value","description":"Moves 10+ ETH at once","actions":["Transfer"],"confidence":0.75,"occurrences":5}]"#,
        ));
        let config = ExtractionConfig {
            max_tokens: 512,
            ..ExtractionConfig::default()
        };
        let extractor = PatternExtractor::new(oracle.clone(), config);

        let patterns = extractor.extract(&digest()).await;
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternType::Value);
        assert_eq!(patterns[0].confidence_percent(), "75%");

        let seen = oracle.seen.lock().expect("oracle lock poisoned").clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].max_tokens, 512);
        assert!(seen[0].prompt.contains("Transaction count: 0"));
        assert!(seen[0].prompt.contains("Return ONLY a JSON array"));
    }

    #[test]
    fn test_insufficient_data_pattern_is_empty_timing() {
        let p = insufficient_data_pattern();
        assert_eq!(p.kind, PatternType::Timing);
        assert!(p.confidence.abs() < f64::EPSILON);
        assert_eq!(p.occurrences, 0);
        assert!(p.actions.is_empty());
    }
}
