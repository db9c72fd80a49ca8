//! Synthetic campaign data
//!
//! Produces plausible, internally correlated campaign rows for demos and tests.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::record::CampaignRecord;

pub const INDUSTRIES: [&str; 10] = [
    "Technology",
    "Healthcare",
    "Finance",
    "Retail",
    "Food & Beverage",
    "Automotive",
    "Entertainment",
    "Education",
    "Fashion",
    "Travel",
];

pub const CHANNELS: [&str; 10] = [
    "Social Media",
    "Google Ads",
    "Email Marketing",
    "Content Marketing",
    "Influencer Marketing",
    "TV",
    "Radio",
    "Print",
    "Outdoor",
    "Programmatic",
];

pub const CREATIVE_TYPES: [&str; 10] = [
    "Video",
    "Static Image",
    "Carousel",
    "Interactive",
    "Story",
    "Podcast",
    "Blog Post",
    "Infographic",
    "Animation",
    "User Generated",
];

pub const TONES: [&str; 10] = [
    "Humorous",
    "Emotional",
    "Informative",
    "Urgent",
    "Inspirational",
    "Professional",
    "Casual",
    "Bold",
    "Caring",
    "Innovative",
];

pub const AUDIENCES: [&str; 10] = [
    "Young professionals (25-35)",
    "Parents with children",
    "Senior citizens (55+)",
    "College students",
    "Small business owners",
    "Health-conscious consumers",
    "Tech enthusiasts",
    "Budget-conscious families",
    "Luxury consumers",
    "Millennials",
];

const NAME_VERBS: [&str; 5] = ["Launch", "Boost", "Drive", "Maximize", "Transform"];
const NAME_NOUNS: [&str; 5] = ["Sales", "Awareness", "Engagement", "Growth", "Impact"];

/// The raw composite tops out a little above 4; stretch it onto 0-10 so the
/// success threshold of 7.0 selects a real top tier.
const SCORE_SCALE: f64 = 2.5;

/// Generate `count` campaigns launched within the year before `today`
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R, today: NaiveDate) -> Vec<CampaignRecord> {
    (1..=count).map(|i| generate_one(i, rng, today)).collect()
}

fn generate_one<R: Rng + ?Sized>(index: usize, rng: &mut R, today: NaiveDate) -> CampaignRecord {
    let budget: f64 = rng.random_range(5_000.0..500_000.0);
    let duration_days: u32 = rng.random_range(7..=90);

    let base = ((budget / 100_000.0) * 0.3 + (f64::from(duration_days) / 90.0) * 0.2 + rng.random_range(0.2..0.6)).min(0.8);

    let ctr = (base * rng.random_range(0.8..1.2) * 0.05).max(0.005);
    let conversion_rate = (base * rng.random_range(0.7..1.3) * 0.08).max(0.01);
    let roas = (base * rng.random_range(0.8..1.5) * 8.0).max(1.2);
    let engagement_rate = (base * rng.random_range(0.9..1.1) * 0.15).max(0.02);
    let brand_lift = (base * rng.random_range(0.7..1.2) * 0.25).max(0.05);

    let channel_count = rng.random_range(2..=5);
    let channels = rand::seq::index::sample(rng, CHANNELS.len(), channel_count)
        .into_iter()
        .map(|i| CHANNELS[i].to_string())
        .collect();

    let days_ago: i64 = rng.random_range(0..=365);

    let mut record = CampaignRecord {
        campaign_id: format!("CAMP_{:03}", index),
        campaign_name: format!("Campaign {}: {} {}", index, pick(rng, &NAME_VERBS), pick(rng, &NAME_NOUNS)),
        industry: pick(rng, &INDUSTRIES),
        target_audience: pick(rng, &AUDIENCES),
        channels,
        budget: round_to(budget, 2),
        duration_days,
        ctr: round_to(ctr, 4),
        conversion_rate: round_to(conversion_rate, 4),
        roas: round_to(roas, 2),
        engagement_rate: round_to(engagement_rate, 4),
        brand_lift: round_to(brand_lift, 4),
        success_score: 0.0,
        creative_type: pick(rng, &CREATIVE_TYPES),
        messaging_tone: pick(rng, &TONES),
        launch_date: today - Duration::days(days_ago),
    };
    record.success_score = round_to((record.composite_score() * SCORE_SCALE).min(10.0), 2);
    record
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&str]) -> String {
    items[rng.random_range(0..items.len())].to_string()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
