//! Native balance lookups over Ethereum JSON-RPC.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use shadow_core::BalanceSource;
use std::time::Duration;
use tracing::debug;

use crate::units::{ETH_DECIMALS, format_units, parse_hex_quantity};

pub struct RpcBalanceClient {
    client: Client,
    url: String,
}

impl RpcBalanceClient {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, url })
    }
}

fn balance_request(address: &str) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_getBalance",
        "params": [address, "latest"],
    })
}

/// Pull the hex `result` out of a JSON-RPC reply and convert it to ETH.
fn decode_balance(reply: &serde_json::Value) -> anyhow::Result<String> {
    if let Some(error) = reply.get("error") {
        let message = error["message"].as_str().unwrap_or("unknown error");
        anyhow::bail!("RPC error: {message}");
    }
    let hex = reply["result"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing result"))?;
    Ok(format_units(parse_hex_quantity(hex)?, ETH_DECIMALS))
}

#[async_trait]
impl BalanceSource for RpcBalanceClient {
    async fn eth_balance(&self, address: &str) -> anyhow::Result<String> {
        debug!("Requesting balance for {address}");
        let reply = self
            .client
            .post(&self.url)
            .json(&balance_request(address))
            .send()
            .await
            .context("Failed to fetch balance")?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        decode_balance(&reply)
    }
}
