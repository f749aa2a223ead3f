//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type. Commands
//! that touch the ledger share one [`WhaleContext`] built from config.

use shadow_config::Config;
use shadow_core::{DisabledOracle, PatternAnalyzer, PatternOracle, PatternStore};
use shadow_providers::{AnthropicOracle, EtherscanClient, RpcBalanceClient};
use shadow_tools::{ToolLimits, ToolRegistry, WhaleContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod info;
mod init;
mod shell;
mod tool;
mod tools;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use shell::ShellStrategy;
pub use tool::{ToolInput, ToolStrategy};
pub use tools::ToolsStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Pick the pattern oracle: Anthropic when a key is configured, otherwise
/// the disabled oracle so extraction always falls back.
fn select_oracle(config: &Config) -> Arc<dyn PatternOracle> {
    let anthropic = &config.providers.anthropic;
    match anthropic.key() {
        Some(key) => {
            info!("Using Anthropic oracle ({})", anthropic.model);
            Arc::new(
                AnthropicOracle::new(key.to_string())
                    .with_model(anthropic.model.clone())
                    .with_base_url(anthropic.base_url.clone())
                    .with_retry_delays(anthropic.retry_delays()),
            )
        }
        None => {
            info!("No Anthropic API key configured, pattern extraction uses the fallback");
            Arc::new(DisabledOracle)
        }
    }
}

/// Wire providers, analyzer and store into a tool context.
pub fn build_context(config: &Config) -> anyhow::Result<WhaleContext> {
    let timeout = Duration::from_secs(config.providers.http_timeout_secs);

    let history = EtherscanClient::new(config.providers.etherscan.api_key.clone(), timeout)?
        .with_base_url(config.providers.etherscan.base_url.clone());
    let balances = RpcBalanceClient::new(config.providers.rpc.url.clone(), timeout)?;
    let analyzer = PatternAnalyzer::new(select_oracle(config), &config.analysis)?;
    info!("Pattern oracle: {}", analyzer.oracle_name());

    Ok(WhaleContext {
        analyzer: Arc::new(analyzer),
        store: Arc::new(PatternStore::new()),
        history: Arc::new(history),
        balances: Arc::new(balances),
        limits: ToolLimits {
            learn: config.tools.learn_limit,
            check: config.tools.check_limit,
            summary: config.tools.summary_limit,
        },
    })
}

/// Load config and build the registry of whale tools.
pub fn load_registry() -> anyhow::Result<ToolRegistry> {
    let config = Config::load()?;
    let context = build_context(&config)?;
    Ok(ToolRegistry::with_whale_tools(&context))
}

/// Print a tool result, turning error results into a command failure.
pub fn report(result: &shadow_tools::ToolResult) -> anyhow::Result<()> {
    if result.is_error {
        anyhow::bail!(
            "{} ({})",
            result.content,
            result.error_type.as_deref().unwrap_or("tool_error")
        );
    }
    println!("{}", result.content);
    Ok(())
}
