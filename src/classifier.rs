//! Section-relevance classifier
//!
//! Decides which sections of a brief a piece of feedback targets. The model
//! is asked first; any failure on that path (generation error, unparseable
//! output, model disabled) falls back to keyword matching, which never fails.

use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::artifacts::CampaignBrief;
use crate::generation::{GenerationRequest, Generator};
use crate::prompts::PromptLoader;
use crate::revision::{Section, SectionFlags};
use crate::schema::{ArtifactSchema, FieldKind, FieldSpec};

/// First object without nested braces
static FLAT_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("flat object pattern is valid"));

/// Fallback keywords per section, matched case-insensitively at the start
/// of a word ("insight" matches "insights", "data" does not match "update")
const KEYWORDS: [(Section, &[&str]); 4] = [
    (
        Section::Analyst,
        &["data", "analysis", "insight", "research", "competitor"],
    ),
    (
        Section::Strategy,
        &["strategy", "target", "position", "channel", "budget", "approach", "audience"],
    ),
    (
        Section::Creative,
        &[
            "creative", "tagline", "visual", "copy", "slogan", "brand", "message", "voice", "content",
        ],
    ),
    (
        Section::Campaign,
        &[
            "timeline",
            "schedule",
            "url",
            "landing page",
            "media plan",
            "timing",
            "objective",
            "goal",
        ],
    ),
];

static KEYWORD_PATTERNS: LazyLock<Vec<(Section, Regex)>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|(section, words)| {
            let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
            let pattern = format!(r"(?i)\b(?:{})", alternatives.join("|"));
            (*section, Regex::new(&pattern).expect("keyword pattern is valid"))
        })
        .collect()
});

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    Model,
    Keywords,
}

impl fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationSource::Model => write!(f, "model"),
            ClassificationSource::Keywords => write!(f, "keywords"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub flags: SectionFlags,
    pub source: ClassificationSource,
}

impl Classification {
    /// Feedback did not map to any section; the caller should ask the user to
    /// be more specific rather than treat this as an error
    pub fn no_sections_detected(&self) -> bool {
        self.flags.is_empty()
    }
}

pub struct SectionClassifier {
    generator: Option<Arc<dyn Generator>>,
    prompts: Arc<PromptLoader>,
    excerpt_chars: usize,
}

impl SectionClassifier {
    pub fn new(generator: Arc<dyn Generator>, prompts: Arc<PromptLoader>, excerpt_chars: usize) -> Self {
        Self {
            generator: Some(generator),
            prompts,
            excerpt_chars,
        }
    }

    /// Classifier that never calls the model
    pub fn keywords_only() -> Self {
        Self {
            generator: None,
            prompts: Arc::new(PromptLoader::embedded_only()),
            excerpt_chars: 0,
        }
    }

    pub fn uses_model(&self) -> bool {
        self.generator.is_some()
    }

    /// Flag the sections `feedback` asks to change
    pub async fn classify_sections(&self, feedback: &str, brief: &CampaignBrief) -> Classification {
        debug!(feedback_len = feedback.len(), uses_model = self.uses_model(), "classify_sections: called");

        if let Some(generator) = &self.generator {
            match self.classify_with_model(generator.as_ref(), feedback, brief).await {
                Ok(flags) => {
                    return Classification {
                        flags,
                        source: ClassificationSource::Model,
                    };
                }
                Err(reason) => warn!(%reason, "Model classification failed, falling back to keywords"),
            }
        }

        Classification {
            flags: keyword_flags(feedback),
            source: ClassificationSource::Keywords,
        }
    }

    async fn classify_with_model(
        &self,
        generator: &dyn Generator,
        feedback: &str,
        brief: &CampaignBrief,
    ) -> Result<SectionFlags, String> {
        let role = self.prompts.render("classifier-role", &json!({})).map_err(|e| e.to_string())?;
        let context = self
            .prompts
            .render(
                "classifier-context",
                &json!({
                    "feedback": feedback,
                    "brief_excerpt": self.excerpt(brief),
                }),
            )
            .map_err(|e| e.to_string())?;

        let request = GenerationRequest {
            label: "classifier",
            role_instruction: role,
            user_context: context,
            schema: flags_schema(),
        };
        let text = generator.generate(&request).await.map_err(|e| e.to_string())?;
        parse_flags(&text)
    }

    fn excerpt(&self, brief: &CampaignBrief) -> String {
        let full = serde_json::to_string_pretty(brief).unwrap_or_default();
        full.chars().take(self.excerpt_chars).collect()
    }
}

fn flags_schema() -> ArtifactSchema {
    ArtifactSchema::new(
        "SectionFlags",
        Section::ALL
            .iter()
            .map(|s| {
                FieldSpec::required(
                    s.name(),
                    FieldKind::Boolean,
                    "Whether the feedback asks to change this section",
                )
            })
            .collect(),
    )
}

/// Parse model output as flags: the whole text first, then the first flat
/// `{...}` in it
fn parse_flags(text: &str) -> Result<SectionFlags, String> {
    let value = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => value,
        Err(_) => {
            let found = FLAT_OBJECT
                .find(text)
                .ok_or_else(|| "no JSON object in classifier output".to_string())?;
            serde_json::from_str::<Value>(found.as_str()).map_err(|e| e.to_string())?
        }
    };
    flags_schema().validate(&value).map_err(|e| e.to_string())?;
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Deterministic keyword classification
pub fn keyword_flags(feedback: &str) -> SectionFlags {
    let mut flags = SectionFlags::none();
    for (section, pattern) in KEYWORD_PATTERNS.iter() {
        if pattern.is_match(feedback) {
            flags.set(*section, true);
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures;
    use crate::generation::GenerationError;
    use crate::generation::mock::ScriptedGenerator;

    fn classifier(generator: Arc<ScriptedGenerator>) -> SectionClassifier {
        SectionClassifier::new(generator, Arc::new(PromptLoader::embedded_only()), 80)
    }

    #[tokio::test]
    async fn test_keywords_only_tagline_and_visuals() {
        let result = SectionClassifier::keywords_only()
            .classify_sections("change the tagline and visuals", &fixtures::brief())
            .await;
        assert_eq!(result.source, ClassificationSource::Keywords);
        assert!(result.flags.creative);
        assert!(!result.flags.analyst);
        assert!(!result.flags.strategy);
        assert!(!result.flags.campaign);
    }

    #[tokio::test]
    async fn test_no_keyword_means_no_sections() {
        let result = SectionClassifier::keywords_only()
            .classify_sections("make it pop more", &fixtures::brief())
            .await;
        assert!(result.no_sections_detected());
        assert_eq!(result.flags, SectionFlags::none());
    }

    #[tokio::test]
    async fn test_model_json_is_used() {
        let generator = Arc::new(ScriptedGenerator::with_outputs([
            "{\"analyst\": false, \"strategy\": true, \"creative\": false, \"campaign\": true}",
        ]));
        let result = classifier(generator.clone())
            .classify_sections("rethink who we reach", &fixtures::brief())
            .await;
        assert_eq!(result.source, ClassificationSource::Model);
        assert_eq!(result.flags, SectionFlags::from_sections([Section::Strategy, Section::Campaign]));

        let request = &generator.requests()[0];
        assert_eq!(request.label, "classifier");
        assert!(request.user_context.contains("Feedback: rethink who we reach"));
        let excerpt = request.user_context.split("(excerpt):\n").nth(1).unwrap();
        assert!(excerpt.trim_end().chars().count() <= 80);
    }

    #[tokio::test]
    async fn test_model_json_embedded_in_prose() {
        let generator = Arc::new(ScriptedGenerator::with_outputs([
            "Sure! {\"analyst\": true, \"strategy\": false, \"creative\": false, \"campaign\": false} Hope that helps.",
        ]));
        let result = classifier(generator).classify_sections("more research", &fixtures::brief()).await;
        assert_eq!(result.source, ClassificationSource::Model);
        assert!(result.flags.analyst);
    }

    #[tokio::test]
    async fn test_generation_error_falls_back() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err(GenerationError::EmptyResponse)]));
        let result = classifier(generator)
            .classify_sections("adjust the budget", &fixtures::brief())
            .await;
        assert_eq!(result.source, ClassificationSource::Keywords);
        assert_eq!(result.flags, SectionFlags::from_sections([Section::Strategy]));
    }

    #[tokio::test]
    async fn test_unparseable_output_falls_back() {
        let generator = Arc::new(ScriptedGenerator::with_outputs([
            "creative only",
            "{\"analyst\": \"yes\", \"strategy\": false, \"creative\": false, \"campaign\": false}",
        ]));
        let classifier = classifier(generator);

        let first = classifier.classify_sections("new slogan", &fixtures::brief()).await;
        assert_eq!(first.source, ClassificationSource::Keywords);
        assert!(first.flags.creative);

        let second = classifier.classify_sections("new slogan", &fixtures::brief()).await;
        assert_eq!(second.source, ClassificationSource::Keywords);
    }

    #[test]
    fn test_keyword_flags_multiple_sections() {
        let flags = keyword_flags("Update the LANDING PAGE url and shift budget to video content");
        assert_eq!(
            flags,
            SectionFlags::from_sections([Section::Strategy, Section::Creative, Section::Campaign])
        );
    }

    #[test]
    fn test_keyword_flags_marketing_copy_is_creative_only() {
        let flags = keyword_flags("rewrite the email marketing copy");
        assert_eq!(flags, SectionFlags::from_sections([Section::Creative]));
    }

    #[test]
    fn test_keyword_flags_match_word_starts_only() {
        assert!(!keyword_flags("fix the metadata tags").analyst);
        assert!(keyword_flags("add more Insights on buyers").analyst);
        assert!(!keyword_flags("the composition feels off").strategy);
    }

    #[test]
    fn test_parse_flags_requires_all_booleans() {
        assert!(parse_flags("{\"analyst\": true}").is_err());
        assert!(parse_flags("[true, false]").is_err());
        assert!(parse_flags("{\"analyst\": true, \"strategy\": true, \"creative\": true, \"campaign\": true}").is_ok());
    }
}
