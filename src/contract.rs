//! Stage output contracts
//!
//! A contract pairs a role instruction with an artifact type. Invoking it
//! sends one schema-constrained request, pulls the JSON object out of the
//! response, validates it against the artifact schema, and only then
//! deserializes it.

use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, warn};

use crate::artifacts::Artifact;
use crate::error::StageError;
use crate::generation::{GenerationError, GenerationRequest, Generator, RetryPolicy};
use crate::schema::SchemaValidationError;

/// Find the JSON object in a model response
///
/// Tries the whole text, then a fenced ```json block, then every balanced
/// `{...}` span in order.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(fenced) = fenced_block(trimmed)
        && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(fenced)
    {
        return Some(value);
    }

    for (start, _) in trimmed.match_indices('{') {
        if let Some(end) = balanced_end(&trimmed[start..])
            && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&trimmed[start..start + end])
        {
            return Some(value);
        }
    }

    None
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json").map(|i| i + 7).or_else(|| text.find("```").map(|i| i + 3))?;
    let end = text[start..].find("```")? + start;
    Some(text[start..end].trim())
}

/// Byte length of the balanced object starting at `text[0] == '{'`
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse, validate and deserialize one artifact from raw model text
pub fn decode<A: Artifact>(text: &str) -> Result<A, SchemaValidationError> {
    let schema = A::schema();
    let value = extract_json_object(text).ok_or_else(|| SchemaValidationError::NotJson {
        artifact: schema.name.to_string(),
        reason: "no JSON object found in response".to_string(),
    })?;

    schema.validate(&value)?;

    serde_json::from_value(value).map_err(|e| SchemaValidationError::Deserialize {
        artifact: schema.name.to_string(),
        reason: e.to_string(),
    })
}

/// Role instruction plus target artifact for one stage
pub struct StageContract<A> {
    label: &'static str,
    role_instruction: String,
    _artifact: PhantomData<fn() -> A>,
}

impl<A: Artifact> StageContract<A> {
    pub fn new(label: &'static str, role_instruction: impl Into<String>) -> Self {
        Self {
            label,
            role_instruction: role_instruction.into(),
            _artifact: PhantomData,
        }
    }

    /// The request this contract sends for `user_context`
    pub fn request(&self, user_context: String) -> GenerationRequest {
        GenerationRequest {
            label: self.label,
            role_instruction: self.role_instruction.clone(),
            user_context,
            schema: A::schema(),
        }
    }

    /// One generation call, no retries
    pub async fn invoke(&self, generator: &dyn Generator, user_context: String) -> Result<A, StageError> {
        self.invoke_with_retry(generator, user_context, RetryPolicy::none()).await
    }

    /// Generation call retried on transient failures. Schema violations are
    /// returned immediately.
    pub async fn invoke_with_retry(
        &self,
        generator: &dyn Generator,
        user_context: String,
        policy: RetryPolicy,
    ) -> Result<A, StageError> {
        let request = self.request(user_context);
        let text = generate_with_retry(generator, &request, policy).await?;
        debug!(label = self.label, response_len = text.len(), "StageContract: response received");
        Ok(decode::<A>(&text)?)
    }
}

async fn generate_with_retry(
    generator: &dyn Generator,
    request: &GenerationRequest,
    policy: RetryPolicy,
) -> Result<String, GenerationError> {
    let mut attempt = 0;
    loop {
        match generator.generate(request).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = match e.retry_after() {
                    Some(hint) => hint.max(policy.delay(attempt)),
                    None => policy.delay(attempt),
                };
                warn!(
                    label = request.label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "generation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{CampaignBrief, fixtures};
    use crate::generation::mock::ScriptedGenerator;
    use crate::llm::LlmError;
    use std::time::{Duration, Instant};

    fn brief_json() -> String {
        serde_json::to_string(&fixtures::brief()).unwrap()
    }

    fn fast_retries(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_extract_plain_object() {
        let value = extract_json_object("  {\"a\": 1}  ").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_extract_fenced_object() {
        let text = "Here you go:\n```json\n{\"a\": {\"b\": [1, 2]}}\n```\nThanks!";
        assert_eq!(extract_json_object(text).unwrap()["a"]["b"][1], 2);
    }

    #[test]
    fn test_extract_object_in_prose_with_braces_in_strings() {
        let text = "Note {not json} then {\"quote\": \"a } inside\", \"n\": {\"m\": true}} trailing";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["quote"], "a } inside");
        assert_eq!(value["n"]["m"], true);
    }

    #[test]
    fn test_extract_rejects_non_objects() {
        assert!(extract_json_object("[1, 2, 3]").is_none());
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("{\"unterminated\": ").is_none());
    }

    #[test]
    fn test_decode_valid_brief() {
        let brief: CampaignBrief = decode(&format!("```json\n{}\n```", brief_json())).unwrap();
        assert_eq!(brief, fixtures::brief());
    }

    #[test]
    fn test_decode_reports_not_json() {
        let err = decode::<CampaignBrief>("I cannot help with that").unwrap_err();
        assert!(matches!(err, SchemaValidationError::NotJson { .. }));
    }

    #[tokio::test]
    async fn test_invoke_with_retry_recovers_from_transient_errors() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerationError::EmptyResponse),
            Err(GenerationError::Timeout(Duration::from_secs(1))),
            Ok(brief_json()),
        ]);
        let contract = StageContract::<CampaignBrief>::new("test", "You are a test");

        let brief = contract
            .invoke_with_retry(&generator, "ctx".to_string(), fast_retries(3))
            .await
            .unwrap();
        assert_eq!(brief, fixtures::brief());
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_invoke_with_retry_gives_up_after_budget() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerationError::EmptyResponse),
            Err(GenerationError::EmptyResponse),
            Err(GenerationError::EmptyResponse),
            Ok(brief_json()),
        ]);
        let contract = StageContract::<CampaignBrief>::new("test", "You are a test");

        let err = contract
            .invoke_with_retry(&generator, "ctx".to_string(), fast_retries(2))
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Generation(GenerationError::EmptyResponse)));
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_wait_overrides_shorter_backoff() {
        let generator = ScriptedGenerator::new(vec![
            Err(GenerationError::Llm(LlmError::RateLimited {
                retry_after: Duration::from_millis(50),
            })),
            Ok(brief_json()),
        ]);
        let contract = StageContract::<CampaignBrief>::new("test", "You are a test");

        let started = Instant::now();
        contract
            .invoke_with_retry(&generator, "ctx".to_string(), fast_retries(1))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_schema_violation_is_not_retried() {
        let generator = ScriptedGenerator::with_outputs(["{\"executive_summary\": \"only this\"}", "unused"]);
        let contract = StageContract::<CampaignBrief>::new("test", "You are a test");

        let err = contract
            .invoke_with_retry(&generator, "ctx".to_string(), fast_retries(3))
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::SchemaValidation(_)));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_schema_and_role() {
        let generator = ScriptedGenerator::with_outputs([brief_json()]);
        let contract = StageContract::<CampaignBrief>::new("orchestrator", "You coordinate");
        contract.invoke(&generator, "context here".to_string()).await.unwrap();

        let request = &generator.requests()[0];
        assert_eq!(request.label, "orchestrator");
        assert_eq!(request.role_instruction, "You coordinate");
        assert_eq!(request.user_context, "context here");
        assert_eq!(request.schema.name, "CampaignBrief");
    }
}
