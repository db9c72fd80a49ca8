//! Historical performance aggregation
//!
//! Answers the three questions the analyst asks of the dataset: who performed
//! best, how each channel performs, and what each industry looks like.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::CampaignRecord;
use crate::source::DatasetSource;

/// Minimum success score for a campaign to count as a top performer
pub const SUCCESS_THRESHOLD: f64 = 7.0;

/// Averages for one channel across every campaign that used it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub avg_success_score: f64,
    pub avg_roas: f64,
    pub avg_ctr: f64,
    pub avg_conversion_rate: f64,
    pub campaign_count: usize,
}

/// Channel name to stats, iterated by descending average success score
pub type ChannelPerformance = IndexMap<String, ChannelStats>;

/// Per-industry summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryInsight {
    pub industry: String,
    pub avg_success_score: f64,
    pub avg_budget: f64,
    pub avg_duration: f64,
    pub creative_types: Vec<String>,
    pub tones: Vec<String>,
    pub campaign_count: usize,
}

#[derive(Default)]
struct ChannelAcc {
    score: f64,
    roas: f64,
    ctr: f64,
    conversion: f64,
    count: usize,
}

#[derive(Default)]
struct IndustryAcc {
    score: f64,
    budget: f64,
    duration: f64,
    creative_types: BTreeSet<String>,
    tones: BTreeSet<String>,
    count: usize,
}

/// Read-only query layer over a [`DatasetSource`]
///
/// Every query reloads the source, so results always reflect the dataset as it
/// is now.
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn DatasetSource>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self { source }
    }

    /// Origin of the underlying dataset
    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Every record, validated
    pub fn records(&self) -> Result<Vec<CampaignRecord>, StoreError> {
        self.source.load()
    }

    /// Campaigns scoring at least [`SUCCESS_THRESHOLD`], best first by
    /// (success_score, roas), truncated to `limit`
    pub fn top_performers(&self, limit: usize) -> Result<Vec<CampaignRecord>, StoreError> {
        debug!("Aggregator::top_performers: limit={}", limit);
        let mut winners: Vec<CampaignRecord> = self
            .source
            .load()?
            .into_iter()
            .filter(|r| r.success_score >= SUCCESS_THRESHOLD)
            .collect();

        winners.sort_by(|a, b| {
            b.success_score
                .total_cmp(&a.success_score)
                .then_with(|| b.roas.total_cmp(&a.roas))
        });
        winners.truncate(limit);
        Ok(winners)
    }

    /// Averages per channel over all records; a record counts once toward every
    /// distinct channel it lists
    pub fn channel_performance(&self) -> Result<ChannelPerformance, StoreError> {
        debug!("Aggregator::channel_performance: called");
        let records = self.source.load()?;

        let mut by_channel: BTreeMap<String, ChannelAcc> = BTreeMap::new();
        for record in &records {
            let distinct: BTreeSet<&str> = record.channels.iter().map(|c| c.trim()).collect();
            for channel in distinct {
                let acc = by_channel.entry(channel.to_string()).or_default();
                acc.score += record.success_score;
                acc.roas += record.roas;
                acc.ctr += record.ctr;
                acc.conversion += record.conversion_rate;
                acc.count += 1;
            }
        }

        let mut rows: Vec<(String, ChannelStats)> = by_channel
            .into_iter()
            .map(|(channel, acc)| {
                let n = acc.count as f64;
                let stats = ChannelStats {
                    avg_success_score: acc.score / n,
                    avg_roas: acc.roas / n,
                    avg_ctr: acc.ctr / n,
                    avg_conversion_rate: acc.conversion / n,
                    campaign_count: acc.count,
                };
                (channel, stats)
            })
            .collect();

        rows.sort_by(|(a_name, a), (b_name, b)| by_score_then_name(a.avg_success_score, a_name, b.avg_success_score, b_name));
        Ok(rows.into_iter().collect())
    }

    /// One insight per industry, optionally narrowed by a case-insensitive
    /// substring filter, ordered by descending average success score
    pub fn industry_insights(&self, filter: Option<&str>) -> Result<Vec<IndustryInsight>, StoreError> {
        debug!("Aggregator::industry_insights: filter={:?}", filter);
        let needle = filter.map(|f| f.trim().to_lowercase()).filter(|f| !f.is_empty());
        let records = self.source.load()?;

        let mut by_industry: BTreeMap<String, IndustryAcc> = BTreeMap::new();
        for record in &records {
            if let Some(ref needle) = needle
                && !record.industry.to_lowercase().contains(needle.as_str())
            {
                continue;
            }
            let acc = by_industry.entry(record.industry.clone()).or_default();
            acc.score += record.success_score;
            acc.budget += record.budget;
            acc.duration += f64::from(record.duration_days);
            acc.creative_types.insert(record.creative_type.clone());
            acc.tones.insert(record.messaging_tone.clone());
            acc.count += 1;
        }

        let mut insights: Vec<IndustryInsight> = by_industry
            .into_iter()
            .map(|(industry, acc)| {
                let n = acc.count as f64;
                IndustryInsight {
                    industry,
                    avg_success_score: acc.score / n,
                    avg_budget: acc.budget / n,
                    avg_duration: acc.duration / n,
                    creative_types: acc.creative_types.into_iter().collect(),
                    tones: acc.tones.into_iter().collect(),
                    campaign_count: acc.count,
                }
            })
            .collect();

        insights.sort_by(|a, b| by_score_then_name(a.avg_success_score, &a.industry, b.avg_success_score, &b.industry));
        Ok(insights)
    }
}

fn by_score_then_name(a_score: f64, a_name: &str, b_score: f64, b_name: &str) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_name.cmp(b_name))
}
