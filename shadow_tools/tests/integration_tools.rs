//! Tool-level tests against in-memory ledgers.
//!
//! These tests verify that:
//! - learn stores patterns that check later reads
//! - check reports the no-patterns state before any learning
//! - bad addresses and upstream failures come back as error results
//! - the summary aggregates balance and recent activity

use async_trait::async_trait;
use serde_json::{Value, json};
use shadow_core::{
    AnalyzerConfig, BalanceSource, DisabledOracle, PatternAnalyzer, PatternStore, Transaction,
    TransactionSource,
};
use shadow_tools::{ToolLimits, ToolRegistry, WhaleContext};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const WHALE: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
const HOUR: i64 = 3_600_000;

/// History source backed by a map; unknown addresses fail like a dead upstream.
#[derive(Default)]
struct FakeLedger {
    histories: Mutex<HashMap<String, Vec<Transaction>>>,
}

impl FakeLedger {
    fn set(&self, address: &str, txs: Vec<Transaction>) {
        self.histories
            .lock()
            .expect("ledger lock poisoned")
            .insert(address.to_lowercase(), txs);
    }
}

#[async_trait]
impl TransactionSource for FakeLedger {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Transaction>> {
        let histories = self.histories.lock().expect("ledger lock poisoned");
        let Some(txs) = histories.get(address) else {
            anyhow::bail!("upstream unavailable");
        };
        Ok(txs.iter().take(limit).cloned().collect())
    }
}

struct FixedBalance(&'static str);

#[async_trait]
impl BalanceSource for FixedBalance {
    async fn eth_balance(&self, _address: &str) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

fn history(values: &[&str]) -> Vec<Transaction> {
    let newest = 1_700_000_000_000_i64;
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let i = i64::try_from(i).unwrap();
            Transaction {
                hash: format!("0x{i:064x}"),
                from: WHALE.to_lowercase(),
                to: Some("0x0000000000000000000000000000000000000001".to_string()),
                value: (*value).to_string(),
                asset: "ETH".to_string(),
                category: "external".to_string(),
                block_number: 19_000_000 - u64::try_from(i).unwrap(),
                timestamp: Some(newest - i * 6 * HOUR),
            }
        })
        .collect()
}

fn setup(balance: &'static str) -> (Arc<FakeLedger>, ToolRegistry) {
    let ledger = Arc::new(FakeLedger::default());
    let analyzer = PatternAnalyzer::new(Arc::new(DisabledOracle), &AnalyzerConfig::default())
        .expect("default config should be valid");
    let context = WhaleContext {
        analyzer: Arc::new(analyzer),
        store: Arc::new(PatternStore::new()),
        history: ledger.clone(),
        balances: Arc::new(FixedBalance(balance)),
        limits: ToolLimits::default(),
    };
    (ledger, ToolRegistry::with_whale_tools(&context))
}

fn parse(content: &str) -> Value {
    serde_json::from_str(content).expect("tool output should be JSON")
}

#[tokio::test]
async fn test_registry_lists_the_three_tools() {
    let (_, registry) = setup("0");
    assert_eq!(
        registry.names(),
        vec![
            "learn_whale_patterns",
            "check_whale_activity",
            "get_whale_summary"
        ]
    );
    for definition in registry.definitions() {
        assert_eq!(definition.input_schema["required"], json!(["address"]));
    }
}

#[tokio::test]
async fn test_check_before_learning_reports_no_patterns() {
    let (ledger, registry) = setup("0");
    ledger.set(WHALE, history(&["1", "2", "3"]));

    let result = registry
        .execute("check_whale_activity", json!({ "address": WHALE }))
        .await;

    assert!(!result.is_error);
    let body = parse(&result.content);
    assert_eq!(body["status"], "No patterns learned yet");
    assert_eq!(body["recentActivity"], "3 transactions in last period");
}

#[tokio::test]
async fn test_learn_then_check_detects_large_transfer() {
    let (ledger, registry) = setup("0");
    ledger.set(WHALE, history(&["1", "2", "3", "4", "5", "6"]));

    let learned = registry
        .execute("learn_whale_patterns", json!({ "address": WHALE, "limit": 6 }))
        .await;
    assert!(!learned.is_error);
    let body = parse(&learned.content);
    assert_eq!(body["address"], WHALE.to_lowercase());
    assert_eq!(body["transactionsAnalyzed"], 6);
    assert_eq!(body["patternsFound"], 1);
    assert_eq!(body["patterns"][0]["type"], "sequence");
    assert_eq!(body["patterns"][0]["confidence"], "60%");

    let quiet = registry
        .execute("check_whale_activity", json!({ "address": WHALE }))
        .await;
    let body = parse(&quiet.content);
    assert_eq!(body["status"], "Normal activity");
    assert!(body["patternMatch"].is_null());

    ledger.set(WHALE, history(&["25.5", "1"]));
    let loud = registry
        .execute("check_whale_activity", json!({ "address": WHALE }))
        .await;
    let body = parse(&loud.content);
    assert_eq!(body["status"], "PATTERN DETECTED");
    assert_eq!(body["recentTransactions"], 2);
    assert_eq!(body["lastActivity"], "2023-11-14T22:13:20.000Z");
    assert_eq!(body["patternMatch"]["confidence"], "70%");
}

#[tokio::test]
async fn test_invalid_address_is_rejected_before_any_fetch() {
    let (_, registry) = setup("0");

    for tool in registry.names() {
        let result = registry.execute(tool, json!({ "address": "0x1234" })).await;
        assert!(result.is_error, "{tool} accepted a short address");
        assert_eq!(result.error_type.as_deref(), Some("invalid_argument"));
    }
}

#[tokio::test]
async fn test_upstream_failure_surfaces_as_error_result() {
    let (_, registry) = setup("0");

    let result = registry
        .execute("learn_whale_patterns", json!({ "address": WHALE }))
        .await;

    assert!(result.is_error);
    assert_eq!(result.error_type.as_deref(), Some("upstream_error"));
    assert!(result.content.contains("upstream unavailable"));
}

#[tokio::test]
async fn test_summary_reports_balance_and_volume() {
    let (ledger, registry) = setup("1234.5");
    ledger.set(WHALE, history(&["1.5", "2.25", "oops"]));

    let result = registry
        .execute("get_whale_summary", json!({ "address": WHALE }))
        .await;

    assert!(!result.is_error);
    let body = parse(&result.content);
    assert_eq!(body["ethBalance"], "1234.5000 ETH");
    assert_eq!(body["recentTransactions"], 3);
    assert_eq!(body["lastActive"], "2023-11-14T22:13:20.000Z");
    assert_eq!(body["totalValueMoved"], "3.7500");
}

#[tokio::test]
async fn test_summary_of_idle_wallet() {
    let (ledger, registry) = setup("0");
    ledger.set(WHALE, Vec::new());

    let result = registry
        .execute("get_whale_summary", json!({ "address": WHALE }))
        .await;

    let body = parse(&result.content);
    assert_eq!(body["ethBalance"], "0.0000 ETH");
    assert_eq!(body["lastActive"], "No recent activity");
    assert_eq!(body["totalValueMoved"], "0.0000");
}
