#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod address;
pub mod check;
pub mod learn;
pub mod summary;

// Re-export tool types for convenience
pub use check::CheckActivityTool;
pub use learn::LearnPatternsTool;
pub use summary::WalletSummaryTool;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shadow_core::{BalanceSource, PatternAnalyzer, PatternStore, TransactionSource};
use tracing::info;

/// Tool definition advertised to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result of tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
    pub duration_ms: Option<u128>,
    pub error_type: Option<String>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            duration_ms: None,
            error_type: None,
        }
    }

    /// Pretty-printed JSON payload.
    #[must_use]
    pub fn json(value: &serde_json::Value) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(content) => Self::success(content),
            Err(e) => Self::error(format!("Error: failed to encode result: {e}")),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
            duration_ms: None,
            error_type: Some("tool_error".to_string()),
        }
    }

    #[must_use]
    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }
}

/// Tool trait
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn definition(&self) -> ToolDefinition;
    async fn execute(&self, input: serde_json::Value) -> ToolResult;
}

/// How many transactions each tool fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolLimits {
    pub learn: usize,
    pub check: usize,
    pub summary: usize,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self {
            learn: 50,
            check: 10,
            summary: 20,
        }
    }
}

/// Collaborators shared by the whale tools.
#[derive(Clone)]
pub struct WhaleContext {
    pub analyzer: Arc<PatternAnalyzer>,
    pub store: Arc<PatternStore>,
    pub history: Arc<dyn TransactionSource>,
    pub balances: Arc<dyn BalanceSource>,
    pub limits: ToolLimits,
}

/// Tool registry
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry with the learn, check and summary tools.
    #[must_use]
    pub fn with_whale_tools(context: &WhaleContext) -> Self {
        let mut registry = Self::new();
        registry.add_tool(Box::new(LearnPatternsTool::new(context.clone())));
        registry.add_tool(Box::new(CheckActivityTool::new(context.clone())));
        registry.add_tool(Box::new(WalletSummaryTool::new(context.clone())));
        registry
    }

    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        info!("Registering tool: {}", tool.name());
        self.tools.push(tool);
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub async fn execute(&self, name: &str, input: serde_json::Value) -> ToolResult {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return ToolResult::error(format!("Unknown tool: {name}")).with_error_type("unknown_tool");
        };

        if !input.is_object() {
            return ToolResult::error("Error: Invalid arguments provided")
                .with_error_type("invalid_arguments");
        }

        let started = Instant::now();
        let mut result = tool.execute(input).await;
        result.duration_ms = Some(started.elapsed().as_millis());
        if result.is_error && result.error_type.is_none() {
            result.error_type = Some("tool_error".to_string());
        }
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to build JSON schema
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn schema_object(properties: serde_json::Value, required: &[&str]) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
