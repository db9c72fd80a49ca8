//! Briefwright - data-driven marketing campaign briefs
//!
//! Four role-specialized generation stages run in a fixed order, each
//! consuming the previous stage's validated output plus context drawn from
//! historical campaign records:
//!
//! analyst → strategy → creative → orchestrator
//!
//! A finished brief can then be revised from free-form feedback. A classifier
//! decides which sections the feedback targets, the orchestrator rewrites the
//! brief, and the field-level diff is appended to the session's history.
//!
//! # Modules
//!
//! - [`pipeline`] - Stage sequencing and campaign requests
//! - [`stages`] - The four stages
//! - [`artifacts`] - Typed stage outputs and their schemas
//! - [`contract`] - Schema-constrained generation and validation
//! - [`generation`] - Text-generation service boundary
//! - [`llm`] - Provider clients (Anthropic, OpenAI, Azure OpenAI)
//! - [`classifier`] - Section-relevance classification
//! - [`revision`] - Sections, diffs and revision history
//! - [`session`] - Generate-then-revise workflow
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod artifacts;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod generation;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod repl;
pub mod revision;
pub mod schema;
pub mod session;
pub mod stages;

// Re-export commonly used types
pub use artifacts::{AnalysisArtifact, CampaignBrief, CreativeArtifact, StrategyArtifact};
pub use classifier::{Classification, ClassificationSource, SectionClassifier};
pub use config::Config;
pub use error::{PipelineError, SessionError, StageError};
pub use generation::{GenerationError, GenerationRequest, Generator, LlmGenerator, RetryPolicy};
pub use pipeline::{CampaignRequest, Pipeline, PipelineOutput, PipelineSettings};
pub use progress::{ChannelSink, LogSink, NullSink, ProgressSink};
pub use prompts::PromptLoader;
pub use revision::{BriefChanges, RevisionHistory, RevisionRecord, Section, SectionFlags};
pub use schema::{ArtifactSchema, SchemaValidationError};
pub use session::{BriefSession, RevisionResult};
pub use stages::{CampaignParams, Stage};
