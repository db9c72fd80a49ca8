//! Analyst output

use campaignstore::ChannelStats;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Artifact;
use crate::schema::{ArtifactSchema, FieldKind, FieldSpec};

/// Per-channel numbers as reported by the analyst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub avg_success_score: f64,
    pub avg_roas: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_ctr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_conversion_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_count: Option<u64>,
}

impl From<&ChannelStats> for ChannelMetrics {
    fn from(stats: &ChannelStats) -> Self {
        Self {
            avg_success_score: stats.avg_success_score,
            avg_roas: stats.avg_roas,
            avg_ctr: Some(stats.avg_ctr),
            avg_conversion_rate: Some(stats.avg_conversion_rate),
            campaign_count: Some(stats.campaign_count as u64),
        }
    }
}

/// Insights drawn from historical campaign data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisArtifact {
    pub executive_summary: String,
    pub successful_patterns: Vec<String>,
    /// Channel name to metrics, in the order the analyst ranked them
    pub channel_performance: IndexMap<String, ChannelMetrics>,
    pub audience_insights: Vec<String>,
    /// Budget category to recommendation
    pub budget_recommendations: IndexMap<String, String>,
    pub creative_trends: Vec<String>,
    pub key_success_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AnalysisArtifact {
    /// First `n` channel names in ranked order
    pub fn top_channels(&self, n: usize) -> Vec<&str> {
        self.channel_performance.keys().take(n).map(String::as_str).collect()
    }
}

impl Artifact for AnalysisArtifact {
    fn schema() -> ArtifactSchema {
        let text_list = || FieldKind::list_of(FieldKind::Text);
        ArtifactSchema::new(
            "AnalysisArtifact",
            vec![
                FieldSpec::required(
                    "executive_summary",
                    FieldKind::Text,
                    "Brief overview of key findings from the historical data",
                ),
                FieldSpec::required("successful_patterns", text_list(), "Patterns shared by top performers"),
                FieldSpec::required(
                    "channel_performance",
                    FieldKind::map_of(FieldKind::Object(vec![
                        FieldSpec::required("avg_success_score", FieldKind::Number, "Average success score"),
                        FieldSpec::required("avg_roas", FieldKind::Number, "Average return on ad spend"),
                        FieldSpec::optional("avg_ctr", FieldKind::Number, "Average click-through rate"),
                        FieldSpec::optional("avg_conversion_rate", FieldKind::Number, "Average conversion rate"),
                        FieldSpec::optional("campaign_count", FieldKind::Integer, "Campaigns using the channel"),
                    ])),
                    "OBJECT keyed by channel name, never a list",
                ),
                FieldSpec::required("audience_insights", text_list(), "Insights about target audiences"),
                FieldSpec::required(
                    "budget_recommendations",
                    FieldKind::map_of(FieldKind::Text),
                    "OBJECT keyed by budget category, never a list",
                ),
                FieldSpec::required("creative_trends", text_list(), "Creative approaches that worked"),
                FieldSpec::required("key_success_factors", text_list(), "What drove success"),
                FieldSpec::required("recommendations", text_list(), "Actionable recommendations"),
            ],
        )
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn analysis() -> AnalysisArtifact {
        let mut channels = IndexMap::new();
        channels.insert(
            "Social Media".to_string(),
            ChannelMetrics {
                avg_success_score: 8.1,
                avg_roas: 4.2,
                avg_ctr: Some(0.031),
                avg_conversion_rate: None,
                campaign_count: Some(14),
            },
        );
        channels.insert(
            "Email Marketing".to_string(),
            ChannelMetrics {
                avg_success_score: 7.4,
                avg_roas: 3.8,
                avg_ctr: None,
                avg_conversion_rate: None,
                campaign_count: None,
            },
        );
        let mut budget = IndexMap::new();
        budget.insert("digital".to_string(), "Put 60% into paid social".to_string());

        AnalysisArtifact {
            executive_summary: "Eco messaging outperforms on social channels".to_string(),
            successful_patterns: vec![
                "Short-form video".to_string(),
                "Sustainability claims with proof".to_string(),
                "UGC testimonials".to_string(),
                "Seasonal tie-ins".to_string(),
            ],
            channel_performance: channels,
            audience_insights: vec!["Parents research before buying".to_string()],
            budget_recommendations: budget,
            creative_trends: vec!["Authentic, unpolished visuals".to_string()],
            key_success_factors: vec!["Clear value proposition".to_string()],
            recommendations: vec![
                "Lead with social".to_string(),
                "Test email nurture".to_string(),
                "Measure brand lift".to_string(),
                "Refresh creative monthly".to_string(),
            ],
        }
    }
}
