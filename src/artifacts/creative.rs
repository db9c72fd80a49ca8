//! Creative director output

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Artifact;
use crate::schema::{ArtifactSchema, FieldKind, FieldSpec};

/// Creative direction that executes the strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeArtifact {
    pub creative_concept: String,
    pub visual_direction: String,
    pub messaging_themes: Vec<String>,
    pub call_to_action_examples: Vec<String>,
    /// Channel name to recommended ad formats
    pub ad_format_recommendations: IndexMap<String, Vec<String>>,
    pub tone_of_voice: String,
}

impl Artifact for CreativeArtifact {
    fn schema() -> ArtifactSchema {
        ArtifactSchema::new(
            "CreativeArtifact",
            vec![
                FieldSpec::required("creative_concept", FieldKind::Text, "Big idea tying the campaign together"),
                FieldSpec::required("visual_direction", FieldKind::Text, "Look and feel"),
                FieldSpec::required(
                    "messaging_themes",
                    FieldKind::list_of(FieldKind::Text),
                    "Themes the copy explores",
                ),
                FieldSpec::required(
                    "call_to_action_examples",
                    FieldKind::list_of(FieldKind::Text),
                    "Example calls to action",
                ),
                FieldSpec::required(
                    "ad_format_recommendations",
                    FieldKind::map_of(FieldKind::list_of(FieldKind::Text)),
                    "OBJECT keyed by channel name, each a list of ad formats",
                ),
                FieldSpec::required("tone_of_voice", FieldKind::Text, "How the brand sounds"),
            ],
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_satisfies_schema() {
        let value = serde_json::to_value(fixtures::creative()).unwrap();
        assert!(CreativeArtifact::schema().validate(&value).is_ok());
    }
}
