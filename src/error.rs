//! Pipeline and stage error types

use campaignstore::StoreError;
use thiserror::Error;

use crate::generation::GenerationError;
use crate::prompts::PromptError;
use crate::schema::SchemaValidationError;
use crate::stages::Stage;

/// Why a single stage failed
#[derive(Debug, Error)]
pub enum StageError {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("invalid output: {0}")]
    SchemaValidation(#[from] SchemaValidationError),

    #[error("historical data unavailable: {0}")]
    DataAccess(#[from] StoreError),

    #[error("prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Why a pipeline run failed
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid campaign request: {0}")]
    InvalidRequest(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: StageError,
    },
}

impl PipelineError {
    /// Stage that failed, if the failure came from one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Why a session operation failed; the session's brief and history are
/// unchanged whenever one of these is returned
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no brief to revise yet; generate one first")]
    NoBrief,

    #[error("feedback is empty")]
    EmptyFeedback,

    #[error("revision failed: {0}")]
    Revision(#[from] StageError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
