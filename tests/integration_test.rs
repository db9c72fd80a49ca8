//! Integration tests for briefwright
//!
//! These tests drive the public API end to end with a scripted generator
//! and a JSONL dataset on disk.

mod common;

use std::sync::Arc;

use briefwright::classifier::{ClassificationSource, SectionClassifier};
use briefwright::error::{PipelineError, SessionError, StageError};
use briefwright::generation::GenerationError;
use briefwright::pipeline::CampaignRequest;
use briefwright::progress::{ChannelSink, NullSink};
use briefwright::revision::{Section, SectionFlags};
use briefwright::schema::SchemaValidationError;
use briefwright::session::{BriefSession, RevisionResult};
use briefwright::stages::Stage;
use briefwright::CampaignBrief;
use common::ScriptedGenerator;
use serde_json::json;
use tempfile::TempDir;

fn happy_script() -> Vec<serde_json::Value> {
    vec![common::analysis(), common::strategy(), common::creative(), common::brief()]
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let generator = Arc::new(ScriptedGenerator::with_outputs(happy_script()));
    let pipeline = common::pipeline(generator.clone(), &dataset);
    let (sink, mut rx) = ChannelSink::channel();

    let request = CampaignRequest {
        campaign_budget: Some("$80,000".to_string()),
        ..CampaignRequest::new("Launch an eco-friendly detergent").with_industry("Retail")
    };
    let output = pipeline.run(request, &sink).await.expect("pipeline should succeed");

    let expected: CampaignBrief = serde_json::from_value(common::brief()).unwrap();
    assert_eq!(output.brief, expected);
    assert!(output.strategy.recommended_channels_and_tactics.contains_key("Social Media"));
    assert_eq!(generator.labels(), vec!["analyst", "strategy", "creative", "orchestrator"]);

    // Analyst context comes from the dataset on disk
    let analyst_context = &generator.contexts()[0];
    assert!(analyst_context.contains("Retail campaign CAMP_001"));
    assert!(!analyst_context.contains("CAMP_004"));
    assert!(analyst_context.contains("\"Influencer Marketing\""));

    // Later stages see the campaign parameters
    assert!(generator.contexts()[1].contains("CAMPAIGN BUDGET: $80,000"));

    drop(sink);
    let mut messages = Vec::new();
    while let Some(message) = rx.recv().await {
        messages.push(message);
    }
    assert_eq!(messages.len(), 8);
    assert_eq!(messages.first().map(String::as_str), Some(Stage::Analyst.start_message()));
}

#[tokio::test]
async fn test_missing_objective_rejected_before_any_call() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let generator = Arc::new(ScriptedGenerator::with_outputs(happy_script()));
    let pipeline = common::pipeline(generator.clone(), &dataset);

    let request: CampaignRequest = serde_json::from_value(json!({"target_industry": "Retail"})).unwrap();
    let result = pipeline.run(request, &NullSink).await;

    assert!(matches!(result, Err(PipelineError::InvalidRequest(_))));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_list_shaped_channel_performance_fails_run() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let mut analysis = common::analysis();
    analysis["channel_performance"] = json!([
        {"channel": "Social Media", "avg_success_score": 8.7, "avg_roas": 5.5}
    ]);
    let mut script = happy_script();
    script[0] = analysis;
    let generator = Arc::new(ScriptedGenerator::with_outputs(script));
    let pipeline = common::pipeline(generator.clone(), &dataset);

    let err = pipeline
        .run(CampaignRequest::new("Launch"), &NullSink)
        .await
        .expect_err("list-shaped mapping must fail");

    assert_eq!(err.stage(), Some(Stage::Analyst));
    assert!(matches!(
        err,
        PipelineError::Stage {
            source: StageError::SchemaValidation(SchemaValidationError::WrongShape { .. }),
            ..
        }
    ));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn test_missing_dataset_fails_analyst_without_generation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let generator = Arc::new(ScriptedGenerator::with_outputs(happy_script()));
    let pipeline = common::pipeline(generator.clone(), &temp_dir.path().join("missing.jsonl"));

    let err = pipeline.run(CampaignRequest::new("Launch"), &NullSink).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Stage {
            stage: Stage::Analyst,
            source: StageError::DataAccess(_)
        }
    ));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_orchestrator_failure_discards_partial_results() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok(common::analysis().to_string()),
        Ok(common::strategy().to_string()),
        Ok(common::creative().to_string()),
        Ok("I could not produce a brief.".to_string()),
    ]));
    let pipeline = common::pipeline(generator, &dataset);

    let err = pipeline.run(CampaignRequest::new("Launch"), &NullSink).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Orchestrator));
}

// =============================================================================
// Revision Session Tests
// =============================================================================

#[tokio::test]
async fn test_session_generate_and_revise() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let mut revised = common::brief();
    revised["creative_direction"] = json!("Stain-free, guilt-free");
    revised["next_steps"] = json!(["Cast creators", "Reshoot hero video"]);
    let mut script = happy_script();
    script.push(revised);
    let generator = Arc::new(ScriptedGenerator::with_outputs(script));
    let pipeline = Arc::new(common::pipeline(generator.clone(), &dataset));
    let mut session = BriefSession::new(pipeline, SectionClassifier::keywords_only());

    session
        .generate(CampaignRequest::new("Launch an eco-friendly detergent"), &NullSink)
        .await
        .unwrap();
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
    assert_eq!(changes.sections(), vec![Section::Creative, Section::Campaign]);

    let history = session.history();
    assert_eq!(history.len(), 1);
    let record = history.latest().unwrap();
    assert_eq!(record.changes.section(Section::Creative).unwrap().len(), 1);
    assert_eq!(
        session.current_brief().unwrap().creative_direction,
        "Stain-free, guilt-free"
    );

    // Revision context carries the previous brief and the flags
    let revision_context = generator.contexts().last().cloned().unwrap();
    assert!(revision_context.contains("\"creative_direction\": \"Clean conscience\""));
    assert!(revision_context.contains("User Feedback: change the tagline and visuals"));
}

#[tokio::test]
async fn test_unchanged_revision_is_not_recorded() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let generator = Arc::new(ScriptedGenerator::with_outputs(vec![common::brief()]));
    let pipeline = Arc::new(common::pipeline(generator, &dataset));
    let mut session = BriefSession::new(pipeline, SectionClassifier::keywords_only());
    session.adopt(serde_json::from_value(common::brief()).unwrap());

    let result = session
        .revise("anything at all", Some(SectionFlags::none()))
        .await
        .unwrap();
    assert!(matches!(result, RevisionResult::Revised { ref changes, .. } if changes.is_empty()));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_failed_revision_is_retryable() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let dataset = common::write_dataset(temp_dir.path());
    let mut revised = common::brief();
    revised["strategy_overview"] = json!("Creators first, then retail media");
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Err(GenerationError::EmptyResponse),
        Ok(revised.to_string()),
    ]));
    let pipeline = Arc::new(common::pipeline(generator, &dataset));
    let mut session = BriefSession::new(pipeline, SectionClassifier::keywords_only());
    let original: CampaignBrief = serde_json::from_value(common::brief()).unwrap();
    session.adopt(original.clone());

    let err = session.revise("shift budget to creators", None).await.unwrap_err();
    assert!(matches!(err, SessionError::Revision(StageError::Generation(_))));
    assert_eq!(session.current_brief(), Some(&original));
    assert!(session.history().is_empty());

    session.revise("shift budget to creators", None).await.unwrap();
    assert_eq!(session.history().len(), 1);
    assert!(session.history().latest().unwrap().sections.strategy);
}

// =============================================================================
// Classifier Tests
// =============================================================================

#[tokio::test]
async fn test_classifier_falls_back_on_garbage() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok("definitely creative".to_string())]));
    let classifier = SectionClassifier::new(
        generator.clone(),
        Arc::new(briefwright::prompts::PromptLoader::embedded_only()),
        200,
    );
    let brief: CampaignBrief = serde_json::from_value(common::brief()).unwrap();

    let classification = classifier.classify_sections("new slogan and timeline", &brief).await;
    assert_eq!(classification.source, ClassificationSource::Keywords);
    assert_eq!(
        classification.flags,
        SectionFlags::from_sections([Section::Creative, Section::Campaign])
    );
    assert_eq!(generator.call_count(), 1);
}
