//! BriefSession - one brief and its revision history
//!
//! A session generates a brief, then revises it from user feedback. Every
//! method that changes state takes `&mut self`, so a revision can never
//! overlap a run or another revision on the same session. Each session owns
//! its history; nothing is shared between sessions.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::artifacts::CampaignBrief;
use crate::classifier::{Classification, ClassificationSource, SectionClassifier};
use crate::error::SessionError;
use crate::pipeline::{CampaignRequest, Pipeline};
use crate::progress::ProgressSink;
use crate::revision::{BriefChanges, RevisionHistory, SectionFlags};

/// What a call to [`BriefSession::revise`] did
#[derive(Debug, Clone, PartialEq)]
pub enum RevisionResult {
    /// The feedback did not target any section; nothing was generated
    NoSectionsDetected,
    /// A new brief replaced the current one
    Revised {
        sections: SectionFlags,
        /// `None` when the caller chose the sections
        classified_by: Option<ClassificationSource>,
        /// Empty when the model returned the brief unchanged
        changes: BriefChanges,
    },
}

pub struct BriefSession {
    id: Uuid,
    pipeline: Arc<Pipeline>,
    classifier: SectionClassifier,
    current: Option<CampaignBrief>,
    history: RevisionHistory,
}

impl BriefSession {
    pub fn new(pipeline: Arc<Pipeline>, classifier: SectionClassifier) -> Self {
        let id = Uuid::now_v7();
        debug!(%id, "BriefSession::new: called");
        Self {
            id,
            pipeline,
            classifier,
            current: None,
            history: RevisionHistory::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current_brief(&self) -> Option<&CampaignBrief> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &RevisionHistory {
        &self.history
    }

    /// Run the full pipeline and make its brief the current one
    ///
    /// The history restarts with the new brief. On failure the previous brief
    /// and history are kept.
    pub async fn generate(
        &mut self,
        request: CampaignRequest,
        sink: &dyn ProgressSink,
    ) -> Result<&CampaignBrief, SessionError> {
        debug!(session = %self.id, "BriefSession::generate: called");
        let output = self.pipeline.run(request, sink).await?;
        self.history = RevisionHistory::new();
        Ok(self.current.insert(output.brief))
    }

    /// Start from an existing brief, e.g. one exported by an earlier run
    pub fn adopt(&mut self, brief: CampaignBrief) {
        debug!(session = %self.id, "BriefSession::adopt: called");
        self.history = RevisionHistory::new();
        self.current = Some(brief);
    }

    /// Which sections `feedback` targets in the current brief
    pub async fn classify(&self, feedback: &str) -> Result<Classification, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoBrief)?;
        Ok(self.classifier.classify_sections(feedback, current).await)
    }

    /// Apply `feedback` to the current brief
    ///
    /// With `sections` set the classifier is skipped. Otherwise feedback that
    /// maps to no section returns [`RevisionResult::NoSectionsDetected`]
    /// without calling the model. Errors leave the brief and history as they
    /// were.
    pub async fn revise(
        &mut self,
        feedback: &str,
        sections: Option<SectionFlags>,
    ) -> Result<RevisionResult, SessionError> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(SessionError::EmptyFeedback);
        }
        let current = self.current.as_ref().ok_or(SessionError::NoBrief)?;

        let (sections, classified_by) = match sections {
            Some(flags) => (flags, None),
            None => {
                let classification = self.classifier.classify_sections(feedback, current).await;
                if classification.no_sections_detected() {
                    info!(session = %self.id, "Feedback matched no section");
                    return Ok(RevisionResult::NoSectionsDetected);
                }
                (classification.flags, Some(classification.source))
            }
        };
        debug!(session = %self.id, %sections, ?classified_by, "BriefSession::revise: sections chosen");

        let outcome = self
            .pipeline
            .orchestrator()
            .handle_revision(current, feedback, sections, &mut self.history)
            .await?;
        self.current = Some(outcome.brief);

        Ok(RevisionResult::Revised {
            sections,
            classified_by,
            changes: outcome.changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures;
    use crate::generation::GenerationError;
    use crate::generation::mock::ScriptedGenerator;
    use crate::generation::RetryPolicy;
    use crate::pipeline::PipelineSettings;
    use crate::progress::NullSink;
    use crate::prompts::PromptLoader;
    use crate::revision::Section;
    use crate::stages::test_support;

    fn session(script: Vec<Result<String, GenerationError>>) -> (BriefSession, Arc<ScriptedGenerator>) {
        let generator = Arc::new(ScriptedGenerator::new(script));
        let pipeline = Pipeline::new(
            generator.clone(),
            test_support::aggregator(),
            Arc::new(PromptLoader::embedded_only()),
            PipelineSettings {
                strategy_retry: RetryPolicy::none(),
                ..PipelineSettings::default()
            },
        );
        (BriefSession::new(Arc::new(pipeline), SectionClassifier::keywords_only()), generator)
    }

    fn revised_json() -> String {
        let mut brief = fixtures::brief();
        brief.creative_direction = "Every wash counts".to_string();
        serde_json::to_string(&brief).unwrap()
    }

    #[tokio::test]
    async fn test_generate_then_revise() {
        let (mut session, generator) = session(vec![
            Ok(test_support::analysis_json()),
            Ok(test_support::strategy_json()),
            Ok(test_support::creative_json()),
            Ok(test_support::brief_json()),
            Ok(revised_json()),
        ]);

        session.generate(CampaignRequest::new("Launch"), &NullSink).await.unwrap();
        assert_eq!(session.current_brief(), Some(&fixtures::brief()));

        let result = session.revise("change the tagline and visuals", None).await.unwrap();
        let RevisionResult::Revised {
            sections,
            classified_by,
            changes,
        } = result
        else {
            panic!("expected a revision");
        };
        assert_eq!(sections, SectionFlags::from_sections([Section::Creative]));
        assert_eq!(classified_by, Some(ClassificationSource::Keywords));
        assert_eq!(changes.sections(), vec![Section::Creative]);
        assert_eq!(session.current_brief().unwrap().creative_direction, "Every wash counts");
        assert_eq!(session.history().len(), 1);
        assert_eq!(generator.call_count(), 5);
    }

    #[tokio::test]
    async fn test_no_sections_detected_makes_no_call() {
        let (mut session, generator) = session(vec![Ok(revised_json())]);
        session.adopt(fixtures::brief());

        let result = session.revise("hmm, not sure", None).await.unwrap();
        assert_eq!(result, RevisionResult::NoSectionsDetected);
        assert_eq!(generator.call_count(), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_empty_flags_still_revise() {
        let (mut session, generator) = session(vec![Ok(test_support::brief_json())]);
        session.adopt(fixtures::brief());

        let result = session.revise("hmm, not sure", Some(SectionFlags::none())).await.unwrap();
        assert!(matches!(
            result,
            RevisionResult::Revised { ref changes, classified_by: None, .. } if changes.is_empty()
        ));
        assert_eq!(generator.call_count(), 1);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_failed_revision_keeps_state() {
        let (mut session, _) = session(vec![Err(GenerationError::Unavailable("down".to_string()))]);
        session.adopt(fixtures::brief());

        let err = session.revise("new slogan please", None).await.unwrap_err();
        assert!(matches!(err, SessionError::Revision(_)));
        assert_eq!(session.current_brief(), Some(&fixtures::brief()));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_revise_guards() {
        let (mut session, _) = session(vec![]);
        assert!(matches!(session.revise("new slogan", None).await, Err(SessionError::NoBrief)));
        session.adopt(fixtures::brief());
        assert!(matches!(session.revise("   ", None).await, Err(SessionError::EmptyFeedback)));
    }

    #[tokio::test]
    async fn test_sessions_have_independent_histories() {
        let (mut first, _) = session(vec![Ok(revised_json())]);
        let (mut second, _) = session(vec![]);
        first.adopt(fixtures::brief());
        second.adopt(fixtures::brief());

        first.revise("new tagline", None).await.unwrap();
        assert_eq!(first.history().len(), 1);
        assert!(second.history().is_empty());
        assert_ne!(first.id(), second.id());
    }
}
