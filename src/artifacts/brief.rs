//! The final campaign brief

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Artifact;
use crate::revision::Section;
use crate::schema::{ArtifactSchema, FieldKind, FieldSpec};

/// Complete campaign brief. Revisions produce a new value; a brief is never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBrief {
    pub executive_summary: String,
    pub campaign_objective: String,
    pub target_audience: String,
    pub strategy_overview: String,
    pub creative_direction: String,
    pub implementation_plan: String,
    pub success_metrics: Vec<String>,
    pub analyst_insights: String,
    pub next_steps: Vec<String>,
}

/// Every field of [`CampaignBrief`], for diffing and section lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BriefField {
    ExecutiveSummary,
    CampaignObjective,
    TargetAudience,
    StrategyOverview,
    CreativeDirection,
    ImplementationPlan,
    SuccessMetrics,
    AnalystInsights,
    NextSteps,
}

impl BriefField {
    pub const ALL: [BriefField; 9] = [
        BriefField::ExecutiveSummary,
        BriefField::CampaignObjective,
        BriefField::TargetAudience,
        BriefField::StrategyOverview,
        BriefField::CreativeDirection,
        BriefField::ImplementationPlan,
        BriefField::SuccessMetrics,
        BriefField::AnalystInsights,
        BriefField::NextSteps,
    ];

    /// JSON field name
    pub fn name(&self) -> &'static str {
        match self {
            BriefField::ExecutiveSummary => "executive_summary",
            BriefField::CampaignObjective => "campaign_objective",
            BriefField::TargetAudience => "target_audience",
            BriefField::StrategyOverview => "strategy_overview",
            BriefField::CreativeDirection => "creative_direction",
            BriefField::ImplementationPlan => "implementation_plan",
            BriefField::SuccessMetrics => "success_metrics",
            BriefField::AnalystInsights => "analyst_insights",
            BriefField::NextSteps => "next_steps",
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            BriefField::ExecutiveSummary => "Executive Summary",
            BriefField::CampaignObjective => "Campaign Objective",
            BriefField::TargetAudience => "Target Audience",
            BriefField::StrategyOverview => "Strategy Overview",
            BriefField::CreativeDirection => "Creative Direction",
            BriefField::ImplementationPlan => "Implementation Plan",
            BriefField::SuccessMetrics => "Success Metrics",
            BriefField::AnalystInsights => "Analyst Insights",
            BriefField::NextSteps => "Next Steps",
        }
    }

    /// Section a field is grouped under for revisions
    pub fn section(&self) -> Section {
        match self {
            BriefField::AnalystInsights => Section::Analyst,
            BriefField::StrategyOverview | BriefField::TargetAudience | BriefField::SuccessMetrics => {
                Section::Strategy
            }
            BriefField::CreativeDirection => Section::Creative,
            BriefField::ExecutiveSummary
            | BriefField::CampaignObjective
            | BriefField::ImplementationPlan
            | BriefField::NextSteps => Section::Campaign,
        }
    }
}

impl CampaignBrief {
    /// Value of one field as JSON
    pub fn field_value(&self, field: BriefField) -> Value {
        match field {
            BriefField::ExecutiveSummary => Value::from(self.executive_summary.as_str()),
            BriefField::CampaignObjective => Value::from(self.campaign_objective.as_str()),
            BriefField::TargetAudience => Value::from(self.target_audience.as_str()),
            BriefField::StrategyOverview => Value::from(self.strategy_overview.as_str()),
            BriefField::CreativeDirection => Value::from(self.creative_direction.as_str()),
            BriefField::ImplementationPlan => Value::from(self.implementation_plan.as_str()),
            BriefField::SuccessMetrics => Value::from(self.success_metrics.clone()),
            BriefField::AnalystInsights => Value::from(self.analyst_insights.as_str()),
            BriefField::NextSteps => Value::from(self.next_steps.clone()),
        }
    }
}

impl Artifact for CampaignBrief {
    fn schema() -> ArtifactSchema {
        ArtifactSchema::new(
            "CampaignBrief",
            vec![
                FieldSpec::required("executive_summary", FieldKind::Text, "High-level campaign overview"),
                FieldSpec::required("campaign_objective", FieldKind::Text, "Clear, measurable objective"),
                FieldSpec::required("target_audience", FieldKind::Text, "Detailed audience description"),
                FieldSpec::required("strategy_overview", FieldKind::Text, "Strategic approach"),
                FieldSpec::required("creative_direction", FieldKind::Text, "Creative concept and direction"),
                FieldSpec::required("implementation_plan", FieldKind::Text, "Channels, timing and budget"),
                FieldSpec::required(
                    "success_metrics",
                    FieldKind::list_of(FieldKind::Text),
                    "KPIs and how they are measured",
                ),
                FieldSpec::required("analyst_insights", FieldKind::Text, "Key data-driven insights"),
                FieldSpec::required("next_steps", FieldKind::list_of(FieldKind::Text), "Actionable next steps"),
            ],
        )
    }
}
