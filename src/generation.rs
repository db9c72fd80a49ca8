//! Text-generation service boundary
//!
//! Stages hand a [`GenerationRequest`] to a [`Generator`] and get raw text
//! back; turning that text into a typed artifact is the caller's job (see
//! [`crate::contract`]).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{CompletionRequest, LlmClient, LlmError, Message};
use crate::schema::ArtifactSchema;

/// One schema-constrained generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Who is asking, for logs and test assertions
    pub label: &'static str,
    /// Role instruction (system prompt)
    pub role_instruction: String,
    /// Task context (user message)
    pub user_context: String,
    /// Shape the response must take
    pub schema: ArtifactSchema,
}

/// Transport or service failure from the generator
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Generation service unavailable: {0}")]
    Unavailable(String),
}

impl GenerationError {
    /// Whether trying the same request again could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Llm(e) => e.is_retryable(),
            GenerationError::Timeout(_) | GenerationError::EmptyResponse => true,
            GenerationError::Unavailable(_) => false,
        }
    }

    /// Wait the provider asked for, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GenerationError::Llm(e) => e.retry_after(),
            _ => None,
        }
    }
}

/// Retry schedule for transient generation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Schema-constrained text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response for `request`, returning the raw model text
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// [`Generator`] backed by an [`LlmClient`]
///
/// The schema travels in the system prompt as a field list plus a JSON
/// skeleton, and providers that support a JSON response mode are asked for it.
pub struct LlmGenerator {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
    temperature: Option<f32>,
    timeout: Duration,
}

impl LlmGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32, temperature: Option<f32>, timeout: Duration) -> Self {
        Self {
            llm,
            max_tokens,
            temperature,
            timeout,
        }
    }

    fn build_completion(&self, request: &GenerationRequest) -> CompletionRequest {
        let skeleton = serde_json::to_string_pretty(&request.schema.skeleton()).unwrap_or_else(|_| "{}".to_string());
        let system_prompt = format!(
            "{}\n\nRespond with a single JSON object ({}) and nothing else. Fields:\n{}\n\nShape:\n{}",
            request.role_instruction.trim_end(),
            request.schema.name,
            request.schema.describe_fields(),
            skeleton
        );

        CompletionRequest {
            system_prompt,
            messages: vec![Message::user(request.user_context.clone())],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            json_output: true,
        }
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        debug!(label = request.label, llm = %self.llm.describe(), "LlmGenerator::generate: called");
        let completion = self.build_completion(request);

        let response = tokio::time::timeout(self.timeout, self.llm.complete(completion))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        debug!(
            label = request.label,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            total_tokens = response.usage.total(),
            "LlmGenerator::generate: response received"
        );
        if response.is_truncated() {
            warn!(
                label = request.label,
                max_tokens = self.max_tokens,
                "LlmGenerator::generate: response hit the token limit"
            );
        }

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Generator that replays scripted results and records every request
    pub struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String, GenerationError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
        call_count: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn new(script: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Script of successful outputs
        pub fn with_outputs<S: Into<String>>(outputs: impl IntoIterator<Item = S>) -> Self {
            Self::new(outputs.into_iter().map(|s| Ok(s.into())).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }
            self.script
                .lock()
                .ok()
                .and_then(|mut script| script.pop_front())
                .unwrap_or_else(|| Err(GenerationError::Unavailable("No more scripted responses".to_string())))
        }
    }
}
