use async_trait::async_trait;
use serde_json::json;
use shadow_core::{Transaction, iso_timestamp};
use tracing::{info, warn};

use crate::address::{address_arg, address_schema};
use crate::{Tool, ToolDefinition, ToolResult, WhaleContext, schema_object};

/// Balance and recent-activity overview of an address.
pub struct WalletSummaryTool {
    context: WhaleContext,
}

impl WalletSummaryTool {
    #[must_use]
    pub const fn new(context: WhaleContext) -> Self {
        Self { context }
    }
}

fn total_value(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::amount).sum()
}

#[async_trait]
impl Tool for WalletSummaryTool {
    fn name(&self) -> &'static str {
        "get_whale_summary"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: "Get quick summary of a whale wallet including ETH balance and recent \
                activity count."
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

        info!("Getting summary for {address}");

        let fetched = tokio::try_join!(
            self.context.balances.eth_balance(&address),
            self.context
                .history
                .fetch_transactions(&address, self.context.limits.summary),
        );
        let (balance, recent) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Summary lookup failed for {address}: {e:#}");
                return ToolResult::error(format!("Error: {e}")).with_error_type("upstream_error");
            }
        };

        let balance: f64 = balance.parse().unwrap_or(0.0);
        let last_active = recent
            .first()
            .and_then(|tx| tx.timestamp)
            .map_or_else(|| "No recent activity".to_string(), iso_timestamp);

        ToolResult::json(&json!({
            "address": address,
            "ethBalance": format!("{balance:.4} ETH"),
            "recentTransactions": recent.len(),
            "lastActive": last_active,
            "totalValueMoved": format!("{:.4}", total_value(&recent)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_parsed_values() {
        let base = Transaction {
            hash: "0x1".to_string(),
            from: "0xa".to_string(),
            to: None,
            value: "1.25".to_string(),
            asset: "ETH".to_string(),
            category: "external".to_string(),
            block_number: 1,
            timestamp: None,
        };
        let txs = vec![
            base.clone(),
            Transaction {
                value: "0.75".to_string(),
                ..base
            },
        ];
        assert!((total_value(&txs) - 2.0).abs() < 1e-12);
        assert!(total_value(&[]).abs() < f64::EPSILON);
    }
}
