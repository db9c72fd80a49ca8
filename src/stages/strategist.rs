//! Strategy stage: analysis in, [`StrategyArtifact`] out

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::{CampaignParams, ParamsView, prompt_fields};
use crate::artifacts::{AnalysisArtifact, StrategyArtifact};
use crate::contract::StageContract;
use crate::error::StageError;
use crate::generation::{Generator, RetryPolicy};
use crate::prompts::PromptLoader;

pub struct StrategyStage {
    generator: Arc<dyn Generator>,
    prompts: Arc<PromptLoader>,
    retry: RetryPolicy,
}

impl StrategyStage {
    pub fn new(generator: Arc<dyn Generator>, prompts: Arc<PromptLoader>, retry: RetryPolicy) -> Self {
        Self {
            generator,
            prompts,
            retry,
        }
    }

    /// Build a strategy on top of every analyst finding. Transient generation
    /// failures are retried per the configured policy.
    pub async fn develop_strategy(
        &self,
        objective: &str,
        industry: Option<&str>,
        analysis: &AnalysisArtifact,
        params: &CampaignParams,
    ) -> Result<StrategyArtifact, StageError> {
        debug!(objective, ?industry, max_retries = self.retry.max_retries, "develop_strategy: called");

        let context = self.prompts.render(
            "strategy-context",
            &json!({
                "params": ParamsView::new(objective, industry, params),
                "analysis": prompt_fields(analysis),
            }),
        )?;
        let role = self.prompts.render("strategy-role", &json!({}))?;

        StageContract::<StrategyArtifact>::new("strategy", role)
            .invoke_with_retry(self.generator.as_ref(), context, self.retry)
            .await
    }
}
