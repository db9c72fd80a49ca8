//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is an independent, single-turn request
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Provider and model, for logs
    fn describe(&self) -> String;
}
