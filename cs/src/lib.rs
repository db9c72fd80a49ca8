//! CampaignStore - historical campaign dataset and performance aggregation
//!
//! Loads campaign rows from a [`DatasetSource`] and answers the aggregate
//! questions used to seed brief generation: top performers, per-channel
//! performance, and per-industry insights.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use campaignstore::{Aggregator, JsonlSource};
//!
//! let agg = Aggregator::new(Arc::new(JsonlSource::new("campaigns.jsonl")));
//! let top = agg.top_performers(20)?;
//! let channels = agg.channel_performance()?;
//! let retail = agg.industry_insights(Some("retail"))?;
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod record;
pub mod sample;
pub mod source;

pub use aggregate::{Aggregator, ChannelPerformance, ChannelStats, IndustryInsight, SUCCESS_THRESHOLD};
pub use error::StoreError;
pub use record::CampaignRecord;
pub use source::{DatasetSource, JsonlSource, MemorySource, write_jsonl};

/// Default number of top performers handed to the analyst
pub const DEFAULT_TOP_LIMIT: usize = 20;
