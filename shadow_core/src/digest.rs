//! Bounded textual digest of an address's activity.
//!
//! The digest is the only data handed to the oracle, so its size is capped
//! regardless of how much history was fetched.

use chrono::{DateTime, SecondsFormat};
use std::fmt::Write;

use crate::session::Session;
use crate::types::Transaction;

/// Most recent transactions listed in a digest.
pub const DIGEST_MAX_TRANSACTIONS: usize = 10;
/// Most recent sessions listed in a digest.
pub const DIGEST_MAX_SESSIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub transaction_count: usize,
    pub session_count: usize,
    text: String,
}

impl Digest {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Summarize newest-first transactions and their sessions.
#[must_use]
pub fn summarize(transactions: &[Transaction], sessions: &[Session]) -> Digest {
    let mut text = String::new();
    let _ = writeln!(text, "Transaction count: {}", transactions.len());
    let _ = writeln!(text, "Active sessions: {}", sessions.len());

    text.push_str("\nRecent activity (last 10 transactions):\n");
    for (i, tx) in transactions.iter().take(DIGEST_MAX_TRANSACTIONS).enumerate() {
        let _ = writeln!(
            text,
            "{}. {} {} - {}",
            i + 1,
            tx.value,
            tx.asset,
            iso_timestamp(tx.timestamp.unwrap_or(0))
        );
    }

    text.push_str("\nSession analysis:\n");
    for (i, session) in sessions.iter().take(DIGEST_MAX_SESSIONS).enumerate() {
        let _ = writeln!(
            text,
            "Session {}: {} txs, {:.2} ETH total",
            i + 1,
            session.len(),
            session.total_value
        );
    }

    Digest {
        transaction_count: transactions.len(),
        session_count: sessions.len(),
        text: text.trim_end().to_string(),
    }
}

/// Millisecond timestamp rendered as `2024-01-01T00:00:00.000Z`.
#[must_use]
pub fn iso_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis).map_or_else(
        || "Unknown".to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{DEFAULT_SESSION_GAP_MS, segment};

    fn tx(value: &str, timestamp: i64) -> Transaction {
        Transaction {
            hash: format!("0x{timestamp}"),
            from: "0xfrom".to_string(),
            to: None,
            value: value.to_string(),
            asset: "ETH".to_string(),
            category: "external".to_string(),
            block_number: 1,
            timestamp: Some(timestamp),
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_digest_lists_counts_and_lines() {
        let txs = vec![tx("2.5", 86_400_000), tx("1", 0)];
        let sessions = segment(&txs, DEFAULT_SESSION_GAP_MS).expect("gap is positive");
        let digest = summarize(&txs, &sessions);

        assert_eq!(digest.transaction_count, 2);
        assert_eq!(digest.session_count, 1);
        assert!(digest.as_str().contains("Transaction count: 2"));
        assert!(digest.as_str().contains("1. 2.5 ETH - 1970-01-02T00:00:00.000Z"));
        assert!(digest.as_str().contains("Session 1: 2 txs, 3.50 ETH total"));
    }

    #[test]
    fn test_digest_is_bounded() {
        let txs: Vec<_> = (0..500).rev().map(|i| tx("1", i * 1_000)).collect();
        let sessions: Vec<_> = txs
            .iter()
            .map(|t| Session {
                start_time: t.timestamp.unwrap_or(0),
                end_time: t.timestamp.unwrap_or(0),
                transactions: vec![t.clone()],
                total_value: 1.0,
            })
            .collect();
        let digest = summarize(&txs, &sessions);

        assert!(digest.as_str().contains("Transaction count: 500"));
        assert!(digest.as_str().contains("10. 1 ETH"));
        assert!(!digest.as_str().contains("11. 1 ETH"));
        assert!(digest.as_str().contains("Session 5:"));
        assert!(!digest.as_str().contains("Session 6:"));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let txs = vec![tx("4", 10_000), tx("3", 5_000)];
        assert_eq!(summarize(&txs, &[]), summarize(&txs, &[]));
    }
}
