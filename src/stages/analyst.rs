//! Analyst stage: historical data in, [`AnalysisArtifact`] out

use std::sync::Arc;

use campaignstore::{Aggregator, CampaignRecord, ChannelPerformance, IndustryInsight, StoreError};
use indexmap::IndexMap;
use serde_json::json;
use tracing::{debug, info};

use super::industry_or_general;
use crate::artifacts::{AnalysisArtifact, ChannelMetrics};
use crate::contract::StageContract;
use crate::error::StageError;
use crate::generation::Generator;
use crate::prompts::PromptLoader;

/// How much historical data reaches the analyst prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalystLimits {
    /// Top performers fetched from the aggregator
    pub top_performers: usize,
    /// Top performers listed in the prompt
    pub prompt_campaigns: usize,
    /// Industries listed in the prompt
    pub prompt_industries: usize,
}

impl Default for AnalystLimits {
    fn default() -> Self {
        Self {
            top_performers: campaignstore::DEFAULT_TOP_LIMIT,
            prompt_campaigns: 10,
            prompt_industries: 5,
        }
    }
}

pub struct AnalystStage {
    generator: Arc<dyn Generator>,
    aggregator: Aggregator,
    prompts: Arc<PromptLoader>,
    limits: AnalystLimits,
}

impl AnalystStage {
    pub fn new(
        generator: Arc<dyn Generator>,
        aggregator: Aggregator,
        prompts: Arc<PromptLoader>,
        limits: AnalystLimits,
    ) -> Self {
        Self {
            generator,
            aggregator,
            prompts,
            limits,
        }
    }

    /// Query the historical data and have the analyst interpret it
    pub async fn analyze_patterns(&self, objective: &str, industry: Option<&str>) -> Result<AnalysisArtifact, StageError> {
        debug!(objective, ?industry, "analyze_patterns: called");

        let limit = self.limits.top_performers;
        let filter = industry.map(str::to_string);
        let (top, channels, industries) = tokio::try_join!(
            query(self.aggregator.clone(), move |agg| agg.top_performers(limit)),
            query(self.aggregator.clone(), |agg| agg.channel_performance()),
            query(self.aggregator.clone(), move |agg| agg.industry_insights(filter.as_deref())),
        )?;
        info!(
            top_performers = top.len(),
            channels = channels.len(),
            industries = industries.len(),
            "Historical data loaded"
        );

        let context = self.prompts.render(
            "analyst-context",
            &json!({
                "objective": objective,
                "industry": industry_or_general(industry),
                "campaigns": format_campaigns(&top, self.limits.prompt_campaigns),
                "channels": format_channels(&channels),
                "industries": format_industries(&industries, self.limits.prompt_industries),
            }),
        )?;
        let role = self.prompts.render("analyst-role", &json!({}))?;

        StageContract::<AnalysisArtifact>::new("analyst", role)
            .invoke(self.generator.as_ref(), context)
            .await
    }
}

/// Run one blocking aggregator query off the async runtime
async fn query<T, F>(aggregator: Aggregator, f: F) -> Result<T, StageError>
where
    T: Send + 'static,
    F: FnOnce(&Aggregator) -> Result<T, StoreError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(move || f(&aggregator)).await??)
}

fn format_campaigns(records: &[CampaignRecord], limit: usize) -> String {
    if records.is_empty() {
        return "No campaigns met the success threshold.".to_string();
    }
    records
        .iter()
        .take(limit)
        .map(|r| {
            format!(
                "• {} | Industry: {} | Success Score: {:.1} | ROAS: {:.1} | Channels: {} | Creative: {} | Tone: {}",
                r.campaign_name,
                r.industry,
                r.success_score,
                r.roas,
                r.channels.join(", "),
                r.creative_type,
                r.messaging_tone
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_channels(channels: &ChannelPerformance) -> String {
    let rounded: IndexMap<&str, ChannelMetrics> = channels
        .iter()
        .map(|(name, stats)| {
            let mut metrics = ChannelMetrics::from(stats);
            metrics.avg_success_score = round_to(metrics.avg_success_score, 2);
            metrics.avg_roas = round_to(metrics.avg_roas, 2);
            metrics.avg_ctr = metrics.avg_ctr.map(|v| round_to(v, 4));
            metrics.avg_conversion_rate = metrics.avg_conversion_rate.map(|v| round_to(v, 4));
            (name.as_str(), metrics)
        })
        .collect();
    serde_json::to_string_pretty(&rounded).unwrap_or_else(|_| "{}".to_string())
}

fn format_industries(insights: &[IndustryInsight], limit: usize) -> String {
    if insights.is_empty() {
        return "No industry data available.".to_string();
    }
    insights
        .iter()
        .take(limit)
        .map(|i| {
            format!(
                "• {}: Avg Success {:.2} | Avg Budget ${:.0} | Avg Duration {:.0} days | Campaigns: {}",
                i.industry, i.avg_success_score, i.avg_budget, i.avg_duration, i.campaign_count
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
