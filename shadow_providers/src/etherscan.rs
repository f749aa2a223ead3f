//! Transaction history from the Etherscan `account/txlist` endpoint.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use shadow_core::{Transaction, TransactionSource};
use std::time::Duration;
use tracing::{debug, info};

use crate::units::wei_to_eth;

/// Raw `txlist` row. Etherscan encodes every field as a string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    hash: String,
    from: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    block_number: String,
    time_stamp: String,
}

#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

pub struct EtherscanClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl EtherscanClient {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://api.etherscan.io/api".to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn txlist_url(&self, address: &str, limit: usize) -> anyhow::Result<Url> {
        let limit = limit.to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("page", "1"),
                ("offset", limit.as_str()),
                ("sort", "desc"),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .with_context(|| format!("Invalid Etherscan base URL: {}", self.base_url))
    }
}

/// Decode a `txlist` response body into transactions.
fn decode_txlist(body: TxListResponse) -> anyhow::Result<Vec<Transaction>> {
    if body.status != "1" {
        // An address with no history is reported as an error status.
        if body.message.starts_with("No transactions found") {
            return Ok(Vec::new());
        }
        let detail = body.result.as_str().unwrap_or_default();
        anyhow::bail!("Etherscan API error: {} {detail}", body.message);
    }

    let rows: Vec<RawTransaction> =
        serde_json::from_value(body.result).context("Unexpected txlist result shape")?;

    rows.into_iter().map(convert).collect()
}

fn convert(raw: RawTransaction) -> anyhow::Result<Transaction> {
    let seconds: i64 = raw
        .time_stamp
        .parse()
        .with_context(|| format!("Invalid timestamp in tx {}", raw.hash))?;
    let block_number = raw
        .block_number
        .parse()
        .with_context(|| format!("Invalid block number in tx {}", raw.hash))?;

    Ok(Transaction {
        value: wei_to_eth(&raw.value)?,
        to: (!raw.to.is_empty()).then_some(raw.to),
        hash: raw.hash.clone(),
        from: raw.from,
        asset: "ETH".to_string(),
        category: "external".to_string(),
        block_number,
        timestamp: Some(
            seconds
                .checked_mul(1000)
                .with_context(|| format!("Timestamp out of range in tx {}", raw.hash))?,
        ),
    })
}

#[async_trait]
impl TransactionSource for EtherscanClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Transaction>> {
        let url = self.txlist_url(address, limit)?;
        debug!("Fetching txlist for {address} (limit {limit})");

        let body = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch transactions")?
            .error_for_status()?
            .json::<TxListResponse>()
            .await
            .context("Failed to decode Etherscan response")?;

        let transactions = decode_txlist(body)?;
        info!("Fetched {} transactions for {address}", transactions.len());
        Ok(transactions)
    }
}
