//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use briefwright::generation::{GenerationError, GenerationRequest, Generator, RetryPolicy};
use briefwright::pipeline::{Pipeline, PipelineSettings};
use briefwright::prompts::PromptLoader;
use campaignstore::{Aggregator, CampaignRecord, JsonlSource};
use chrono::NaiveDate;
use serde_json::{Value, json};

/// Generator that replays scripted results in order
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    labels: Mutex<Vec<&'static str>>,
    contexts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            labels: Mutex::new(Vec::new()),
            contexts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_outputs(outputs: Vec<Value>) -> Self {
        Self::new(outputs.into_iter().map(|v| Ok(v.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.labels.lock().unwrap().clone()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.labels.lock().unwrap().push(request.label);
        self.contexts.lock().unwrap().push(request.user_context.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Unavailable("script exhausted".to_string())))
    }
}

fn record(id: &str, industry: &str, channels: &[&str], score: f64, roas: f64) -> CampaignRecord {
    CampaignRecord {
        campaign_id: id.to_string(),
        campaign_name: format!("{} campaign {}", industry, id),
        industry: industry.to_string(),
        target_audience: "Eco-conscious Consumers".to_string(),
        channels: channels.iter().map(|c| c.to_string()).collect(),
        budget: 40_000.0,
        duration_days: 30,
        ctr: 0.025,
        conversion_rate: 0.04,
        roas,
        engagement_rate: 0.05,
        brand_lift: 0.1,
        success_score: score,
        creative_type: "Video".to_string(),
        messaging_tone: "Friendly".to_string(),
        launch_date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
    }
}

/// Small dataset written as JSONL under `dir`
pub fn write_dataset(dir: &Path) -> std::path::PathBuf {
    let records = vec![
        record("CAMP_001", "Retail", &["Social Media", "Influencer Marketing"], 9.1, 6.2),
        record("CAMP_002", "Retail", &["Social Media", "Email Marketing"], 8.3, 4.9),
        record("CAMP_003", "Food & Beverage", &["Search Ads"], 7.2, 3.1),
        record("CAMP_004", "Finance", &["Display Ads"], 3.9, 1.2),
    ];
    let path = dir.join("campaigns.jsonl");
    campaignstore::write_jsonl(&path, &records).unwrap();
    path
}

pub fn pipeline(generator: Arc<ScriptedGenerator>, dataset: &Path) -> Pipeline {
    Pipeline::new(
        generator,
        Aggregator::new(Arc::new(JsonlSource::new(dataset))),
        Arc::new(PromptLoader::embedded_only()),
        PipelineSettings {
            strategy_retry: RetryPolicy::none(),
            ..PipelineSettings::default()
        },
    )
}

pub fn analysis() -> Value {
    json!({
        "executive_summary": "Social and influencer campaigns lead retail performance",
        "successful_patterns": ["Creator-led video", "Refill offers", "Proof of sustainability"],
        "channel_performance": {
            "Social Media": {"avg_success_score": 8.7, "avg_roas": 5.55, "campaign_count": 2},
            "Influencer Marketing": {"avg_success_score": 9.1, "avg_roas": 6.2}
        },
        "audience_insights": ["Parents compare ingredient lists"],
        "budget_recommendations": {"Social Media": "50% of spend", "Influencer Marketing": "25% of spend"},
        "creative_trends": ["Before/after demos"],
        "key_success_factors": ["Credible eco claims"],
        "recommendations": ["Lead with social video", "Partner with parent creators"]
    })
}

pub fn strategy() -> Value {
    json!({
        "overall_strategy": "Social-first launch proving cleaning power and eco credentials",
        "target_audience_deep_dive": "Parents 25-40 shopping for safer household products",
        "key_messaging_pillars": ["Tough on stains", "Gentle on the planet"],
        "recommended_channels_and_tactics": {
            "Social Media": ["Short demo videos", "Creator challenges"],
            "Email Marketing": ["Refill reminders"]
        },
        "budget_allocation_guidance": {"Social Media": "55%", "Email Marketing": "15%"},
        "measurement_kpis": ["ROAS", "Trial rate"]
    })
}

pub fn creative() -> Value {
    json!({
        "creative_concept": "Clean conscience",
        "visual_direction": "Bright homes, real laundry piles",
        "messaging_themes": ["Safe for little ones"],
        "call_to_action_examples": ["Get your starter pack"],
        "ad_format_recommendations": {"Social Media": ["Reels", "Stories"]},
        "tone_of_voice": "Upbeat and honest"
    })
}

pub fn brief() -> Value {
    json!({
        "executive_summary": "Launch EcoWash with a social-first campaign",
        "campaign_objective": "Reach 15% trial among eco-minded parents",
        "target_audience": "Parents 25-40 shopping for safer household products",
        "strategy_overview": "Social video and creators, email for retention",
        "creative_direction": "Clean conscience",
        "implementation_plan": "Six-week launch across social and email",
        "success_metrics": ["ROAS above 4", "Trial rate"],
        "analyst_insights": "Retail campaigns on social average 8.7",
        "next_steps": ["Cast creators", "Produce demo videos"]
    })
}
