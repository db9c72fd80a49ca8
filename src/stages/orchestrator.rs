//! Orchestrator stage: synthesizes the final brief and applies revisions

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use super::{CampaignParams, ParamsView, first_n, prompt_fields};
use crate::artifacts::{AnalysisArtifact, CampaignBrief, CreativeArtifact, StrategyArtifact};
use crate::contract::StageContract;
use crate::error::StageError;
use crate::generation::Generator;
use crate::prompts::PromptLoader;
use crate::revision::{BriefChanges, RevisionHistory, RevisionRecord, SectionFlags, diff_briefs};

/// Analyst items carried into the final brief
const SUMMARY_ITEMS: usize = 3;

/// Result of applying one piece of feedback
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionOutcome {
    /// The new brief; the caller's brief is untouched
    pub brief: CampaignBrief,
    /// Field-level differences from the previous brief, possibly empty
    pub changes: BriefChanges,
}

pub struct OrchestratorStage {
    generator: Arc<dyn Generator>,
    prompts: Arc<PromptLoader>,
}

impl OrchestratorStage {
    pub fn new(generator: Arc<dyn Generator>, prompts: Arc<PromptLoader>) -> Self {
        Self { generator, prompts }
    }

    fn contract(&self) -> Result<StageContract<CampaignBrief>, StageError> {
        let role = self.prompts.render("orchestrator-role", &json!({}))?;
        Ok(StageContract::new("orchestrator", role))
    }

    /// Synthesize analysis, strategy and creative into one brief
    pub async fn finalize_brief(
        &self,
        objective: &str,
        industry: Option<&str>,
        analysis: &AnalysisArtifact,
        strategy: &StrategyArtifact,
        creative: &CreativeArtifact,
        params: &CampaignParams,
    ) -> Result<CampaignBrief, StageError> {
        debug!(objective, ?industry, "finalize_brief: called");

        let context = self.prompts.render(
            "finalize-context",
            &json!({
                "params": ParamsView::new(objective, industry, params),
                "success_patterns": first_n(&analysis.successful_patterns, SUMMARY_ITEMS),
                "top_channels": analysis.top_channels(SUMMARY_ITEMS).join(", "),
                "key_recommendations": first_n(&analysis.recommendations, SUMMARY_ITEMS),
                "strategy": prompt_fields(strategy),
                "creative": prompt_fields(creative),
            }),
        )?;

        self.contract()?.invoke(self.generator.as_ref(), context).await
    }

    /// Produce a revised brief from `feedback` and record what changed
    ///
    /// A record is appended to `history` only when the new brief differs from
    /// `current`. On error neither `current` nor `history` is touched.
    pub async fn handle_revision(
        &self,
        current: &CampaignBrief,
        feedback: &str,
        sections: SectionFlags,
        history: &mut RevisionHistory,
    ) -> Result<RevisionOutcome, StageError> {
        debug!(%sections, feedback_len = feedback.len(), "handle_revision: called");

        let current_json = serde_json::to_string_pretty(current).unwrap_or_else(|_| "{}".to_string());
        let context = self.prompts.render(
            "revision-context",
            &json!({
                "current_brief": current_json,
                "feedback": feedback,
                "required_updates": required_updates(sections),
            }),
        )?;

        let brief = self.contract()?.invoke(self.generator.as_ref(), context).await?;
        let changes = diff_briefs(current, &brief);

        if changes.is_empty() {
            info!("Revision produced no changes; history unchanged");
        } else {
            info!(fields = changes.len(), sections = ?changes.sections(), "Revision recorded");
            history.append(RevisionRecord {
                timestamp: Utc::now(),
                feedback: feedback.to_string(),
                sections,
                changes: changes.clone(),
            });
        }

        Ok(RevisionOutcome { brief, changes })
    }
}

/// Per-section flags as the JSON object shown to the model
fn required_updates(sections: SectionFlags) -> String {
    serde_json::to_string(&sections).unwrap_or_else(|_| sections.to_string())
}
