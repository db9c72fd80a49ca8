//! The four pipeline stages
//!
//! Each stage owns a [`StageContract`](crate::contract::StageContract) for its
//! artifact, renders its context from the prompt templates and makes exactly
//! one generation call (the strategist may retry transient failures).

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod analyst;
pub mod creative;
pub mod orchestrator;
pub mod strategist;

pub use analyst::{AnalystLimits, AnalystStage};
pub use creative::CreativeStage;
pub use orchestrator::{OrchestratorStage, RevisionOutcome};
pub use strategist::StrategyStage;

const DEFAULT_INDUSTRY: &str = "General";
const NOT_SPECIFIED: &str = "Not specified";

/// Pipeline stage, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Analyst,
    Strategy,
    Creative,
    Orchestrator,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Analyst, Stage::Strategy, Stage::Creative, Stage::Orchestrator];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Analyst => "analyst",
            Stage::Strategy => "strategy",
            Stage::Creative => "creative",
            Stage::Orchestrator => "orchestrator",
        }
    }

    /// Status line sent before the stage runs
    pub fn start_message(&self) -> &'static str {
        match self {
            Stage::Analyst => "Analyzing historical campaign data...",
            Stage::Strategy => "Developing data-driven strategy...",
            Stage::Creative => "Creating performance-based creative concepts...",
            Stage::Orchestrator => "Finalizing the campaign brief...",
        }
    }

    /// Status line sent after the stage succeeds
    pub fn done_message(&self) -> &'static str {
        match self {
            Stage::Analyst => "Historical analysis complete",
            Stage::Strategy => "Strategy complete",
            Stage::Creative => "Creative concepts complete",
            Stage::Orchestrator => "Campaign brief ready",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Optional campaign parameters carried through every stage after the analyst
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParams {
    pub budget: Option<String>,
    pub timing: Option<String>,
    pub destination_url: Option<String>,
    pub media_objective: Option<String>,
    pub media_target: Option<String>,
}

/// Template view of the objective, industry and [`CampaignParams`] with
/// placeholders filled in
#[derive(Debug, Serialize)]
pub(crate) struct ParamsView<'a> {
    objective: &'a str,
    industry: &'a str,
    budget: &'a str,
    timing: &'a str,
    destination_url: &'a str,
    media_objective: &'a str,
    media_target: &'a str,
}

impl<'a> ParamsView<'a> {
    pub(crate) fn new(objective: &'a str, industry: Option<&'a str>, params: &'a CampaignParams) -> Self {
        let or_default = |value: &'a Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty());
        Self {
            objective,
            industry: industry_or_general(industry),
            budget: or_default(&params.budget).unwrap_or(NOT_SPECIFIED),
            timing: or_default(&params.timing).unwrap_or(NOT_SPECIFIED),
            destination_url: or_default(&params.destination_url).unwrap_or(NOT_SPECIFIED),
            media_objective: or_default(&params.media_objective).unwrap_or(NOT_SPECIFIED),
            media_target: or_default(&params.media_target).unwrap_or(NOT_SPECIFIED),
        }
    }
}

pub(crate) fn industry_or_general(industry: Option<&str>) -> &str {
    industry.map(str::trim).filter(|i| !i.is_empty()).unwrap_or(DEFAULT_INDUSTRY)
}

/// Flatten an artifact into one display string per top-level field
///
/// Text stays as is, lists of text are joined with "; " and anything else is
/// compact JSON, so mappings reach the model as JSON objects.
pub(crate) fn prompt_fields<T: Serialize>(artifact: &T) -> IndexMap<String, String> {
    match serde_json::to_value(artifact) {
        Ok(Value::Object(map)) => map.into_iter().map(|(k, v)| (k, display_value(&v))).collect(),
        _ => IndexMap::new(),
    }
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.iter().all(Value::is_string) => join_items(items.iter().filter_map(Value::as_str)),
        other => other.to_string(),
    }
}

/// First `n` items joined with "; "
pub(crate) fn first_n(items: &[String], n: usize) -> String {
    join_items(items.iter().take(n).map(String::as_str))
}

fn join_items<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join("; ")
}
