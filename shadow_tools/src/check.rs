use async_trait::async_trait;
use serde_json::json;
use shadow_core::iso_timestamp;
use tracing::{info, warn};

use crate::address::{address_arg, address_schema};
use crate::{Tool, ToolDefinition, ToolResult, WhaleContext, schema_object};

/// Compare an address's latest activity with its learned patterns.
pub struct CheckActivityTool {
    context: WhaleContext,
}

impl CheckActivityTool {
    #[must_use]
    pub const fn new(context: WhaleContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CheckActivityTool {
    fn name(&self) -> &'static str {
        "check_whale_activity"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "Check a whale's current activity against learned patterns. Use this \
                to see if whale is doing something unusual or matching a known pattern."
                .to_string(),
            input_schema: schema_object(
                json!({ "address": address_schema("Ethereum address") }),
                &["address"],
            ),
        }
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let address = match address_arg(&input) {
            Ok(address) => address,
            Err(result) => return result,
        };

        info!("Checking activity for {address}");

        let recent = match self
            .context
            .history
            .fetch_transactions(&address, self.context.limits.check)
            .await
        {
            Ok(txs) => txs,
            Err(e) => {
                warn!("Transaction fetch failed for {address}: {e:#}");
                return ToolResult::error(format!("Error: Failed to fetch transactions: {e}"))
                    .with_error_type("upstream_error");
            }
        };

        let patterns = match self.context.store.get(&address) {
            Ok(Some(patterns)) if !patterns.is_empty() => patterns,
            Ok(_) => {
                return ToolResult::json(&json!({
                    "status": "No patterns learned yet",
                    "message": format!("Use learn_whale_patterns first to analyze {address}"),
                    "recentActivity": format!("{} transactions in last period", recent.len()),
                }));
            }
            Err(e) => return ToolResult::error(format!("Error: {e}")).with_error_type("store_error"),
        };

        let verdict = self.context.analyzer.match_patterns(&recent, &patterns);
        let last_activity = recent
            .first()
            .and_then(|tx| tx.timestamp)
            .map_or_else(|| "Unknown".to_string(), iso_timestamp);

        let pattern_match = verdict.pattern.as_ref().filter(|_| verdict.matched).map(|p| {
            json!({
                "description": p.description,
                "confidence": shadow_core::percent(verdict.confidence),
            })
        });

        ToolResult::json(&json!({
            "address": address,
            "status": if verdict.matched { "PATTERN DETECTED" } else { "Normal activity" },
            "recentTransactions": recent.len(),
            "lastActivity": last_activity,
            "patternMatch": pattern_match,
        }))
    }
}
