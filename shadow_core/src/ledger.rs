//! Collaborators that supply raw ledger data.

use async_trait::async_trait;

use crate::types::Transaction;

/// Source of an address's transaction history.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch up to `limit` transactions, newest first.
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Transaction>>;
}

/// Source of native-asset balances.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Current balance as an exact ETH decimal string.
    async fn eth_balance(&self, address: &str) -> anyhow::Result<String>;
}
