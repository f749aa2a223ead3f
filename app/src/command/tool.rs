use serde_json::json;

use super::{load_registry, report};

/// A single tool invocation built from command-line arguments.
#[derive(Debug, Clone)]
pub struct ToolInput {
    pub tool: &'static str,
    pub arguments: serde_json::Value,
}

impl ToolInput {
    #[must_use]
    pub fn learn(address: String, limit: Option<usize>) -> Self {
        let arguments = limit.map_or_else(
            || json!({ "address": address }),
            |limit| json!({ "address": address, "limit": limit }),
        );
        Self {
            tool: "learn_whale_patterns",
            arguments,
        }
    }

    #[must_use]
    pub fn check(address: String) -> Self {
        Self {
            tool: "check_whale_activity",
            arguments: json!({ "address": address }),
        }
    }

    #[must_use]
    pub fn summary(address: String) -> Self {
        Self {
            tool: "get_whale_summary",
            arguments: json!({ "address": address }),
        }
    }

    /// Parse `<command> <address> [limit]` as typed in the shell. The command
    /// is a short name or the full tool name.
    pub fn parse_line(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let Some(address) = words.next().map(str::to_string) else {
            anyhow::bail!("Usage: learn|check|summary <address> [limit]");
        };

        match command {
            "learn" | "learn_whale_patterns" => {
                let limit = words.next().map(str::parse::<usize>).transpose()?;
                Ok(Self::learn(address, limit))
            }
            "check" | "check_whale_activity" => Ok(Self::check(address)),
            "summary" | "get_whale_summary" => Ok(Self::summary(address)),
            other => anyhow::bail!("Unknown command: {other}"),
        }
    }
}

/// Strategy that runs one whale tool and prints its JSON result.
///
/// The pattern store lives only for this process, so `check` after a
/// separate `learn` invocation sees no patterns. Use `shell` to keep them.
#[derive(Debug, Clone, Copy)]
pub struct ToolStrategy;

impl super::CommandStrategy for ToolStrategy {
    type Input = ToolInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let registry = load_registry()?;
        let result = registry.execute(input.tool, input.arguments).await;
        report(&result)
    }
}
