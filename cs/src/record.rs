//! Historical campaign records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One historical campaign row. Immutable once loaded.
///
/// Every column is required; a row missing a column fails to deserialize rather
/// than picking up a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_id: String,
    pub campaign_name: String,
    pub industry: String,
    pub target_audience: String,
    pub channels: Vec<String>,
    pub budget: f64,
    pub duration_days: u32,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub roas: f64,
    pub engagement_rate: f64,
    pub brand_lift: f64,
    pub success_score: f64,
    pub creative_type: String,
    pub messaging_tone: String,
    pub launch_date: NaiveDate,
}

impl CampaignRecord {
    /// Weighted blend of the raw performance metrics.
    ///
    /// `(ctr*20 + conversion_rate*12.5 + (roas-1)*2 + engagement_rate*6.67 + brand_lift*4) / 5`
    pub fn composite_score(&self) -> f64 {
        (self.ctr * 20.0
            + self.conversion_rate * 12.5
            + (self.roas - 1.0) * 2.0
            + self.engagement_rate * 6.67
            + self.brand_lift * 4.0)
            / 5.0
    }

    /// Check the invariants a loaded row must satisfy
    pub fn validate(&self) -> Result<(), StoreError> {
        let id = self.campaign_id.as_str();
        if id.trim().is_empty() {
            return Err(StoreError::invalid("<blank>", "campaign_id", "must not be blank"));
        }
        if self.industry.trim().is_empty() {
            return Err(StoreError::invalid(id, "industry", "must not be blank"));
        }
        if self.channels.is_empty() {
            return Err(StoreError::invalid(id, "channels", "at least one channel is required"));
        }
        if self.channels.iter().any(|c| c.trim().is_empty()) {
            return Err(StoreError::invalid(id, "channels", "channel names must not be blank"));
        }

        let metrics = [
            ("budget", self.budget),
            ("ctr", self.ctr),
            ("conversion_rate", self.conversion_rate),
            ("roas", self.roas),
            ("engagement_rate", self.engagement_rate),
            ("brand_lift", self.brand_lift),
            ("success_score", self.success_score),
        ];
        for (field, value) in metrics {
            if !value.is_finite() {
                return Err(StoreError::invalid(id, field, format!("{} is not a finite number", value)));
            }
            if value < 0.0 {
                return Err(StoreError::invalid(id, field, format!("{} is negative", value)));
            }
        }

        Ok(())
    }
}
