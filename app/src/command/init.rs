use shadow_config::Config;

/// Strategy for initializing the configuration.
///
/// Creates the default configuration file at `~/shadow-trader/config.json`.
#[derive(Debug, Clone, Copy)]
pub struct InitStrategy;

impl super::CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let path = Config::create_config()?;
        println!("Created config at {}", path.display());
        println!("Set ANTHROPIC_API_KEY and ETHERSCAN_API_KEY there or in the environment.");
        Ok(())
    }
}
