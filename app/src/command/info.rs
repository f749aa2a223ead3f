use shadow_config::Config;

/// Strategy for displaying configuration information.
///
/// Secrets are masked; everything else is printed as loaded, after
/// environment overrides.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== shadow Configuration ===\n");
        println!("Config file: {}\n", Config::config_path()?.display());

        println!("Anthropic:");
        println!(
            "  API Key: {}",
            config
                .providers
                .anthropic
                .key()
                .map_or_else(|| "(not set, fallback patterns only)".to_string(), mask)
        );
        println!("  Model: {}", config.providers.anthropic.model);
        println!("  Base URL: {}", config.providers.anthropic.base_url);
        println!(
            "  Retry Delays: {:?}ms",
            config.providers.anthropic.retry_delays_ms
        );
        println!();

        println!("Ledger:");
        println!(
            "  Etherscan Key: {}",
            mask(&config.providers.etherscan.api_key)
        );
        println!("  Etherscan URL: {}", config.providers.etherscan.base_url);
        println!("  RPC URL: {}", config.providers.rpc.url);
        println!("  HTTP Timeout: {}s", config.providers.http_timeout_secs);
        println!();

        let analysis = &config.analysis;
        println!("Analysis:");
        println!("  Session Gap: {}ms", analysis.session_gap_ms);
        println!("  Min Transactions: {}", analysis.min_transactions);
        println!("  Oracle Timeout: {}s", analysis.oracle_timeout_secs);
        println!("  Max Tokens: {}", analysis.max_tokens);
        println!(
            "  Large Transfer Threshold: {} ETH",
            analysis.large_transfer_threshold
        );
        println!("  Match Confidence: {}", analysis.match_confidence);
        println!();

        println!("Tool Limits:");
        println!("  Learn: {}", config.tools.learn_limit);
        println!("  Check: {}", config.tools.check_limit);
        println!("  Summary: {}", config.tools.summary_limit);

        Ok(())
    }
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}
