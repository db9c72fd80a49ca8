//! Pipeline sequencer
//!
//! Runs analyst, strategy, creative and orchestrator strictly in that order.
//! The first failure aborts the run and is reported with the stage it came
//! from; there are no partial results.

use std::future::Future;
use std::sync::Arc;

use campaignstore::{Aggregator, JsonlSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::artifacts::{AnalysisArtifact, CampaignBrief, CreativeArtifact, StrategyArtifact};
use crate::classifier::SectionClassifier;
use crate::config::{Config, PipelineConfig};
use crate::error::{PipelineError, StageError};
use crate::generation::{Generator, LlmGenerator, RetryPolicy};
use crate::llm;
use crate::progress::ProgressSink;
use crate::prompts::PromptLoader;
use crate::stages::{
    AnalystLimits, AnalystStage, CampaignParams, CreativeStage, OrchestratorStage, Stage, StrategyStage,
};

/// A campaign request as submitted by a caller; only the objective is required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub campaign_objective: Option<String>,
    pub target_industry: Option<String>,
    pub campaign_budget: Option<String>,
    pub campaign_timing: Option<String>,
    pub campaign_destination_url: Option<String>,
    pub media_objective: Option<String>,
    pub media_target: Option<String>,
}

impl CampaignRequest {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            campaign_objective: Some(objective.into()),
            ..Default::default()
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.target_industry = Some(industry.into());
        self
    }

    /// Reject a missing or blank objective; blank optional fields become `None`
    pub fn validate(self) -> Result<CampaignSpec, PipelineError> {
        let objective = non_blank(self.campaign_objective)
            .ok_or_else(|| PipelineError::InvalidRequest("campaign objective is required".to_string()))?;

        Ok(CampaignSpec {
            objective,
            industry: non_blank(self.target_industry),
            params: CampaignParams {
                budget: non_blank(self.campaign_budget),
                timing: non_blank(self.campaign_timing),
                destination_url: non_blank(self.campaign_destination_url),
                media_objective: non_blank(self.media_objective),
                media_target: non_blank(self.media_target),
            },
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// A validated campaign request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignSpec {
    pub objective: String,
    pub industry: Option<String>,
    pub params: CampaignParams,
}

/// Tunables the stages take at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub limits: AnalystLimits,
    pub strategy_retry: RetryPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            limits: AnalystLimits::default(),
            strategy_retry: PipelineConfig::default().strategy_retry_policy(),
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            limits: AnalystLimits {
                top_performers: config.data.top_performer_limit,
                prompt_campaigns: config.data.prompt_campaigns,
                prompt_industries: config.data.prompt_industries,
            },
            strategy_retry: config.pipeline.strategy_retry_policy(),
        }
    }
}

/// Every artifact a successful run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub analysis: AnalysisArtifact,
    pub strategy: StrategyArtifact,
    pub creative: CreativeArtifact,
    pub brief: CampaignBrief,
}

pub struct Pipeline {
    generator: Arc<dyn Generator>,
    prompts: Arc<PromptLoader>,
    analyst: AnalystStage,
    strategist: StrategyStage,
    creative: CreativeStage,
    orchestrator: OrchestratorStage,
}

impl Pipeline {
    /// Wire all four stages to one generator and one prompt loader
    pub fn new(
        generator: Arc<dyn Generator>,
        aggregator: Aggregator,
        prompts: Arc<PromptLoader>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            analyst: AnalystStage::new(generator.clone(), aggregator, prompts.clone(), settings.limits),
            strategist: StrategyStage::new(generator.clone(), prompts.clone(), settings.strategy_retry),
            creative: CreativeStage::new(generator.clone(), prompts.clone()),
            orchestrator: OrchestratorStage::new(generator.clone(), prompts.clone()),
            generator,
            prompts,
        }
    }

    /// Build the production pipeline: configured LLM provider, JSONL dataset
    /// and prompt overrides. Fails before any stage runs if something is
    /// missing.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        debug!("Pipeline::from_config: called");
        config.validate()?;
        Self::assemble(config)
    }

    /// Pipeline for revising or classifying a brief that already exists.
    /// Only the LLM settings are checked; the dataset may be absent.
    pub fn for_revision(config: &Config) -> Result<Self, PipelineError> {
        debug!("Pipeline::for_revision: called");
        config.validate_llm()?;
        Self::assemble(config)
    }

    fn assemble(config: &Config) -> Result<Self, PipelineError> {
        let client = llm::create_client(&config.llm).map_err(|e| PipelineError::Configuration(e.to_string()))?;
        info!(llm = %client.describe(), dataset = %config.data.dataset.display(), "Pipeline configured");
        let generator: Arc<dyn Generator> = Arc::new(LlmGenerator::new(
            client,
            config.llm.max_tokens,
            config.llm.temperature,
            config.pipeline.generation_timeout(),
        ));
        let aggregator = Aggregator::new(Arc::new(JsonlSource::new(config.data.dataset.clone())));
        let prompts = PromptLoader::new(config.prompts.dir.clone())
            .map_err(|e| PipelineError::Configuration(e.to_string()))?;

        Ok(Self::new(generator, aggregator, Arc::new(prompts), PipelineSettings::from(config)))
    }

    /// Classifier sharing this pipeline's generator and prompts
    pub fn classifier(&self, use_model: bool, excerpt_chars: usize) -> SectionClassifier {
        if use_model {
            SectionClassifier::new(self.generator.clone(), self.prompts.clone(), excerpt_chars)
        } else {
            SectionClassifier::keywords_only()
        }
    }

    pub fn orchestrator(&self) -> &OrchestratorStage {
        &self.orchestrator
    }

    /// Run all four stages for `request`
    pub async fn run(&self, request: CampaignRequest, sink: &dyn ProgressSink) -> Result<PipelineOutput, PipelineError> {
        let spec = request.validate()?;
        let objective = spec.objective.as_str();
        let industry = spec.industry.as_deref();
        let params = &spec.params;
        info!(objective, ?industry, "Pipeline run starting");

        let analysis = step(Stage::Analyst, sink, self.analyst.analyze_patterns(objective, industry)).await?;
        let strategy = step(
            Stage::Strategy,
            sink,
            self.strategist.develop_strategy(objective, industry, &analysis, params),
        )
        .await?;
        let creative = step(
            Stage::Creative,
            sink,
            self.creative
                .develop_creative(objective, industry, &strategy, &analysis, params),
        )
        .await?;
        let brief = step(
            Stage::Orchestrator,
            sink,
            self.orchestrator
                .finalize_brief(objective, industry, &analysis, &strategy, &creative, params),
        )
        .await?;

        info!("Pipeline run complete");
        Ok(PipelineOutput {
            analysis,
            strategy,
            creative,
            brief,
        })
    }
}

async fn step<T>(
    stage: Stage,
    sink: &dyn ProgressSink,
    work: impl Future<Output = Result<T, StageError>>,
) -> Result<T, PipelineError> {
    info!(%stage, "Stage starting");
    sink.notify(stage.start_message());
    match work.await {
        Ok(output) => {
            sink.notify(stage.done_message());
            Ok(output)
        }
        Err(source) => {
            error!(%stage, error = %source, "Stage failed");
            Err(PipelineError::Stage { stage, source })
        }
    }
}
