//! Typed stage outputs
//!
//! Each artifact carries its own [`ArtifactSchema`]; nothing is handed to the
//! next stage until it has been validated against it.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::schema::ArtifactSchema;

mod analysis;
mod brief;
mod creative;
mod strategy;

pub use analysis::{AnalysisArtifact, ChannelMetrics};
pub use brief::{BriefField, CampaignBrief};
pub use creative::CreativeArtifact;
pub use strategy::StrategyArtifact;

/// A structured output exchanged between stages
pub trait Artifact: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Shape the generator must produce
    fn schema() -> ArtifactSchema;
}
