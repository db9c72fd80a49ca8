//! Strategist output

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Artifact;
use crate::schema::{ArtifactSchema, FieldKind, FieldSpec};

/// Marketing strategy built on the analyst's findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyArtifact {
    pub overall_strategy: String,
    pub target_audience_deep_dive: String,
    pub key_messaging_pillars: Vec<String>,
    /// Channel name to tactics on that channel
    pub recommended_channels_and_tactics: IndexMap<String, Vec<String>>,
    /// Budget category to guidance
    pub budget_allocation_guidance: IndexMap<String, String>,
    pub measurement_kpis: Vec<String>,
}

impl Artifact for StrategyArtifact {
    fn schema() -> ArtifactSchema {
        ArtifactSchema::new(
            "StrategyArtifact",
            vec![
                FieldSpec::required("overall_strategy", FieldKind::Text, "Strategic approach in a few sentences"),
                FieldSpec::required(
                    "target_audience_deep_dive",
                    FieldKind::Text,
                    "Who the campaign is for and what moves them",
                ),
                FieldSpec::required(
                    "key_messaging_pillars",
                    FieldKind::list_of(FieldKind::Text),
                    "Core messages the campaign repeats",
                ),
                FieldSpec::required(
                    "recommended_channels_and_tactics",
                    FieldKind::map_of(FieldKind::list_of(FieldKind::Text)),
                    "OBJECT keyed by channel name, each a list of tactics",
                ),
                FieldSpec::required(
                    "budget_allocation_guidance",
                    FieldKind::map_of(FieldKind::Text),
                    "OBJECT keyed by budget category, each a recommendation",
                ),
                FieldSpec::required(
                    "measurement_kpis",
                    FieldKind::list_of(FieldKind::Text),
                    "KPIs that define success",
                ),
            ],
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_satisfies_schema() {
        let value = serde_json::to_value(fixtures::strategy()).unwrap();
        assert!(StrategyArtifact::schema().validate(&value).is_ok());
    }

    #[test]
    fn test_tactics_list_instead_of_map_is_rejected() {
        let mut value = serde_json::to_value(fixtures::strategy()).unwrap();
        value["recommended_channels_and_tactics"] = serde_json::json!(["Social Media"]);
        assert!(StrategyArtifact::schema().validate(&value).is_err());
    }
}
