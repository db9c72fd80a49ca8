//! Interactive brief session
//!
//! Generates a brief, then treats every line as feedback for the next
//! revision. Slash commands inspect or export the session.

mod session;

pub use session::ReplSession;

use std::sync::Arc;

use eyre::{Context, Result};

use crate::config::Config;
use crate::pipeline::{CampaignRequest, Pipeline};
use crate::session::BriefSession;

/// Run the interactive REPL
///
/// This is the main entry point for `bw session`.
pub async fn run_interactive(config: &Config, initial: Option<CampaignRequest>) -> Result<()> {
    let pipeline = Arc::new(Pipeline::from_config(config).context("Failed to set up the pipeline")?);
    let classifier = pipeline.classifier(config.classifier.use_model, config.classifier.brief_excerpt_chars);

    let mut session = ReplSession::new(BriefSession::new(pipeline, classifier));
    session.run(initial).await
}
