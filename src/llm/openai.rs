//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for the Chat Completions API, either on
//! api.openai.com or behind an Azure OpenAI deployment.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Initial backoff delay for transport retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Azure API version used when config doesn't name one
const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 500 | 502 | 503 | 504)
}

/// Where the Chat Completions endpoint lives and how it authenticates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flavor {
    /// `{base}/v1/chat/completions` with a bearer token
    OpenAI,
    /// `{base}/openai/deployments/{model}/chat/completions?api-version=..`
    /// with an `api-key` header
    Azure { api_version: String },
}

/// OpenAI / Azure OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    flavor: Flavor,
    http: Client,
    max_tokens: u32,
    max_retries: u32,
}

impl OpenAIClient {
    /// Create a client against api.openai.com (or a compatible base url)
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::build(config, Flavor::OpenAI)
    }

    /// Create a client against an Azure OpenAI deployment; `model` names the
    /// deployment
    pub fn azure_from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_version = config
            .api_version
            .clone()
            .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string());
        Self::build(config, Flavor::Azure { api_version })
    }

    fn build(config: &LlmConfig, flavor: Flavor) -> Result<Self, LlmError> {
        debug!(model = %config.model, ?flavor, "OpenAIClient::build: called");
        let api_key = config.get_api_key()?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            flavor,
            http,
            max_tokens: config.max_tokens,
            max_retries: config.transport_retries,
        })
    }

    fn endpoint(&self) -> String {
        match &self.flavor {
            Flavor::OpenAI => format!("{}/v1/chat/completions", self.base_url),
            Flavor::Azure { api_version } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.base_url, self.model, api_version
            ),
        }
    }

    /// Build the request body for the Chat Completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(
            request
                .messages
                .iter()
                .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content })),
        );

        let max_tokens = request.max_tokens.min(self.max_tokens);

        // Reasoning models take max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({ "messages": messages });
        if self.flavor == Flavor::OpenAI {
            body["model"] = serde_json::json!(self.model);
        }

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        if request.json_output {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }

    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(choices = api_response.choices.len(), "parse_response: called");
        let (content, stop_reason) = match api_response.choices.into_iter().next() {
            Some(c) => (c.message.content, StopReason::from_openai(c.finish_reason.as_deref())),
            None => (None, StopReason::EndTurn),
        };

        let usage = api_response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        CompletionResponse {
            content,
            stop_reason,
            usage,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = self.endpoint();
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let builder = self.http.post(url.clone()).header("content-type", "application/json");
            let builder = match self.flavor {
                Flavor::OpenAI => builder.header("Authorization", format!("Bearer {}", self.api_key)),
                Flavor::Azure { .. } => builder.header("api-key", self.api_key.clone()),
            };

            let response = match builder.json(&body).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(LlmError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                debug!("complete: rate limited (429)");
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(LlmError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(LlmError::ApiError { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(LlmError::ApiError { status, message: text });
            }

            debug!("complete: success");
            let api_response: OpenAIResponse = response.json().await?;
            return Ok(self.parse_response(api_response));
        }

        Err(last_error.unwrap_or_else(|| LlmError::InvalidResponse("Max retries exceeded".to_string())))
    }

    fn describe(&self) -> String {
        match self.flavor {
            Flavor::OpenAI => format!("openai/{}", self.model),
            Flavor::Azure { .. } => format!("azure/{}", self.model),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
