use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::address::{address_arg, address_schema};
use crate::{Tool, ToolDefinition, ToolResult, WhaleContext, schema_object};

/// Learn behavioral patterns from an address's history and remember them.
pub struct LearnPatternsTool {
    context: WhaleContext,
}

impl LearnPatternsTool {
    #[must_use]
    pub const fn new(context: WhaleContext) -> Self {
        Self { context }
    }

    /// `limit` may arrive as any JSON number; fractions are truncated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn limit_arg(&self, input: &serde_json::Value) -> usize {
        input
            .get("limit")
            .and_then(serde_json::Value::as_f64)
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map_or(self.context.limits.learn, |n| n as usize)
    }
}

#[async_trait]
impl Tool for LearnPatternsTool {
    fn name(&self) -> &'static str {
        "learn_whale_patterns"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "Analyze a whale wallet's transaction history and learn behavioral \
                patterns. Returns patterns with confidence scores. Use this when asked to \
                'analyze' or 'learn patterns' from a wallet."
                .to_string(),
            input_schema: schema_object(
                json!({
                    "address": address_schema("Ethereum address (0x...)"),
                    "limit": {
                        "type": "number",
                        "description": format!(
                            "Number of transactions to analyze (default: {})",
                            self.context.limits.learn
                        ),
                        "default": self.context.limits.learn
                    }
                }),
                &["address"],
            ),
        }
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let address = match address_arg(&input) {
            Ok(address) => address,
            Err(result) => return result,
        };
        let limit = self.limit_arg(&input);

        info!("Learning patterns for {address} (limit {limit})");

        let transactions = match self.context.history.fetch_transactions(&address, limit).await {
            Ok(txs) => txs,
            Err(e) => {
                warn!("Transaction fetch failed for {address}: {e:#}");
                return ToolResult::error(format!("Error: Failed to fetch transactions: {e}"))
                    .with_error_type("upstream_error");
            }
        };

        let patterns = match self
            .context
            .analyzer
            .learn(&self.context.store, &address, &transactions)
            .await
        {
            Ok(patterns) => patterns,
            Err(e) => return ToolResult::error(format!("Error: {e}")).with_error_type("store_error"),
        };

        ToolResult::json(&json!({
            "address": address,
            "transactionsAnalyzed": transactions.len(),
            "patternsFound": patterns.len(),
            "patterns": patterns
                .iter()
                .map(|p| json!({
                    "type": p.kind,
                    "description": p.description,
                    "confidence": p.confidence_percent(),
                    "occurrences": p.occurrences,
                }))
                .collect::<Vec<_>>(),
            "summary": format!(
                "Analyzed {} transactions and found {} behavioral patterns.",
                transactions.len(),
                patterns.len()
            ),
        }))
    }
}
