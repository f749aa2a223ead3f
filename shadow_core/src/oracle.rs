//! Text-completion oracle used for pattern extraction.

use async_trait::async_trait;
use thiserror::Error;

/// Default output budget for one extraction call.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

impl OracleRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no oracle configured")]
    Unavailable,

    #[error("oracle call timed out after {0}s")]
    Timeout(u64),

    #[error("oracle returned no text content")]
    EmptyResponse,

    #[error("oracle request failed: {0}")]
    Request(#[from] anyhow::Error),
}

#[async_trait]
pub trait PatternOracle: Send + Sync {
    fn name(&self) -> &str;

    /// Run one completion and return its free-form text.
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

/// Stand-in used when no oracle credentials are configured.
///
/// Every call reports [`OracleError::Unavailable`], which the extractor turns
/// into the deterministic fallback pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOracle;

#[async_trait]
impl PatternOracle for DisabledOracle {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn complete(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        Err(OracleError::Unavailable)
    }
}
