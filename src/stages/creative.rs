//! Creative stage: strategy in, [`CreativeArtifact`] out

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use super::{CampaignParams, ParamsView, display_value, prompt_fields};
use crate::artifacts::{AnalysisArtifact, CreativeArtifact, StrategyArtifact};
use crate::contract::StageContract;
use crate::error::StageError;
use crate::generation::Generator;
use crate::prompts::PromptLoader;

/// Channels named in the creative prompt
const TOP_CHANNELS: usize = 3;

pub struct CreativeStage {
    generator: Arc<dyn Generator>,
    prompts: Arc<PromptLoader>,
}

impl CreativeStage {
    pub fn new(generator: Arc<dyn Generator>, prompts: Arc<PromptLoader>) -> Self {
        Self { generator, prompts }
    }

    /// Turn the strategy into creative concepts, using only the creative
    /// subset of the analysis
    pub async fn develop_creative(
        &self,
        objective: &str,
        industry: Option<&str>,
        strategy: &StrategyArtifact,
        analysis: &AnalysisArtifact,
        params: &CampaignParams,
    ) -> Result<CreativeArtifact, StageError> {
        debug!(objective, ?industry, "develop_creative: called");

        let top_channels = analysis.top_channels(TOP_CHANNELS);
        let context = self.prompts.render(
            "creative-context",
            &json!({
                "params": ParamsView::new(objective, industry, params),
                "strategy": prompt_fields(strategy),
                "creative_trends": display_value(&json!(analysis.creative_trends)),
                "successful_patterns": display_value(&json!(analysis.successful_patterns)),
                "top_channels": channel_list(&top_channels),
            }),
        )?;
        let role = self.prompts.render("creative-role", &json!({}))?;

        StageContract::<CreativeArtifact>::new("creative", role)
            .invoke(self.generator.as_ref(), context)
            .await
    }
}

fn channel_list(channels: &[&str]) -> String {
    if channels.is_empty() {
        "various channels".to_string()
    } else {
        channels.join(", ")
    }
}
