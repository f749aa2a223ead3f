use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use shadow_core::AnalyzerConfig;

const CONFIG_DIR: &str = "shadow-trader";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub analysis: AnalyzerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub etherscan: EtherscanConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default = "ProvidersConfig::default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            anthropic: AnthropicConfig::default(),
            etherscan: EtherscanConfig::default(),
            rpc: RpcConfig::default(),
            http_timeout_secs: Self::default_http_timeout_secs(),
        }
    }
}

impl ProvidersConfig {
    const fn default_http_timeout_secs() -> u64 {
        30
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnthropicConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "AnthropicConfig::default_model")]
    pub model: String,
    #[serde(default = "AnthropicConfig::default_base_url")]
    pub base_url: String,
    /// Pause before each retry of a failed request; one retry per entry.
    #[serde(default = "AnthropicConfig::default_retry_delays_ms")]
    pub retry_delays_ms: Vec<u64>,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Self::default_model(),
            base_url: Self::default_base_url(),
            retry_delays_ms: Self::default_retry_delays_ms(),
        }
    }
}

impl AnthropicConfig {
    fn default_model() -> String {
        "claude-sonnet-4-20250514".to_string()
    }

    fn default_base_url() -> String {
        "https://api.anthropic.com".to_string()
    }

    fn default_retry_delays_ms() -> Vec<u64> {
        vec![1000, 2000]
    }

    #[must_use]
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }

    /// The API key, if one is actually set.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EtherscanConfig {
    #[serde(default = "EtherscanConfig::default_api_key")]
    pub api_key: String,
    #[serde(default = "EtherscanConfig::default_base_url")]
    pub base_url: String,
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_key: Self::default_api_key(),
            base_url: Self::default_base_url(),
        }
    }
}

impl EtherscanConfig {
    fn default_api_key() -> String {
        "YourApiKeyToken".to_string()
    }

    fn default_base_url() -> String {
        "https://api.etherscan.io/api".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RpcConfig {
    #[serde(default = "RpcConfig::default_url")]
    pub url: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl RpcConfig {
    fn default_url() -> String {
        "https://eth.llamarpc.com".to_string()
    }
}

/// How many transactions each tool fetches.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ToolsConfig {
    #[serde(default = "ToolsConfig::default_learn_limit")]
    pub learn_limit: usize,
    #[serde(default = "ToolsConfig::default_check_limit")]
    pub check_limit: usize,
    #[serde(default = "ToolsConfig::default_summary_limit")]
    pub summary_limit: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            learn_limit: Self::default_learn_limit(),
            check_limit: Self::default_check_limit(),
            summary_limit: Self::default_summary_limit(),
        }
    }
}

impl ToolsConfig {
    const fn default_learn_limit() -> usize {
        50
    }

    const fn default_check_limit() -> usize {
        10
    }

    const fn default_summary_limit() -> usize {
        20
    }
}

impl Config {
    /// Load `~/shadow-trader/config.json` (defaults if absent), then apply
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            info!("Loading config from {}", path.display());
            Self::from_file(&path)?
        } else {
            info!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Override secrets and endpoints from the environment.
    ///
    /// Recognised keys: `ANTHROPIC_API_KEY`, `ETHERSCAN_API_KEY`, `ETH_RPC_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank("ANTHROPIC_API_KEY") {
            self.providers.anthropic.api_key = Some(key);
        }
        if let Some(key) = non_blank("ETHERSCAN_API_KEY") {
            self.providers.etherscan.api_key = key;
        }
        if let Some(url) = non_blank("ETH_RPC_URL") {
            self.providers.rpc.url = url;
        }
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR)
            .join(CONFIG_FILE))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR);

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::ensure_config_dir()?.join(CONFIG_FILE);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;
        Ok(config_path)
    }
}

pub const CONFIG_TEMPLATE: &str = r#"{
  "providers": {
    "anthropic": {
      "api_key": "",
      "model": "claude-sonnet-4-20250514",
      "base_url": "https://api.anthropic.com",
      "retry_delays_ms": [1000, 2000]
    },
    "etherscan": {
      "api_key": "YourApiKeyToken",
      "base_url": "https://api.etherscan.io/api"
    },
    "rpc": {
      "url": "https://eth.llamarpc.com"
    },
    "http_timeout_secs": 30
  },
  "analysis": {
    "session_gap_ms": 86400000,
    "min_transactions": 5,
    "oracle_timeout_secs": 60,
    "max_tokens": 2000,
    "large_transfer_threshold": 10.0,
    "match_confidence": 0.7
  },
  "tools": {
    "learn_limit": 50,
    "check_limit": 10,
    "summary_limit": 20
  }
}"#;
