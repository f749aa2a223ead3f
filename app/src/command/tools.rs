use super::load_registry;

/// Strategy for listing the registered tools and their parameters.
#[derive(Debug, Clone, Copy)]
pub struct ToolsStrategy;

impl super::CommandStrategy for ToolsStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let registry = load_registry()?;

        for definition in registry.definitions() {
            println!("{}", definition.name);
            println!("  {}", definition.description);
            println!(
                "  Input: {}",
                serde_json::to_string(&definition.input_schema)?
            );
            println!();
        }

        Ok(())
    }
}
