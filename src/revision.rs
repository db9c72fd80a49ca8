//! Revision tracking
//!
//! Sections group brief fields for feedback routing. Revisions are diffed
//! field by field and recorded in an append-only history.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::artifacts::{BriefField, CampaignBrief};

/// Part of the brief a piece of feedback can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Analyst,
    Strategy,
    Creative,
    Campaign,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Analyst, Section::Strategy, Section::Creative, Section::Campaign];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Analyst => "analyst",
            Section::Strategy => "strategy",
            Section::Creative => "creative",
            Section::Campaign => "campaign",
        }
    }

    /// Brief fields grouped under this section
    pub fn fields(&self) -> Vec<BriefField> {
        BriefField::ALL.into_iter().filter(|f| f.section() == *self).collect()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analyst" => Ok(Section::Analyst),
            "strategy" => Ok(Section::Strategy),
            "creative" => Ok(Section::Creative),
            "campaign" => Ok(Section::Campaign),
            other => Err(format!(
                "unknown section '{}' (expected analyst, strategy, creative or campaign)",
                other
            )),
        }
    }
}

/// Which sections a piece of feedback touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionFlags {
    pub analyst: bool,
    pub strategy: bool,
    pub creative: bool,
    pub campaign: bool,
}

impl SectionFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            analyst: true,
            strategy: true,
            creative: true,
            campaign: true,
        }
    }

    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut flags = Self::none();
        for section in sections {
            flags.set(section, true);
        }
        flags
    }

    pub fn get(&self, section: Section) -> bool {
        match section {
            Section::Analyst => self.analyst,
            Section::Strategy => self.strategy,
            Section::Creative => self.creative,
            Section::Campaign => self.campaign,
        }
    }

    pub fn set(&mut self, section: Section, value: bool) {
        match section {
            Section::Analyst => self.analyst = value,
            Section::Strategy => self.strategy = value,
            Section::Creative => self.creative = value,
            Section::Campaign => self.campaign = value,
        }
    }

    /// True when no section is flagged
    pub fn is_empty(&self) -> bool {
        !(self.analyst || self.strategy || self.creative || self.campaign)
    }

    /// Flagged sections in declaration order
    pub fn sections(&self) -> Vec<Section> {
        Section::ALL.into_iter().filter(|s| self.get(*s)).collect()
    }
}

impl fmt::Display for SectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.sections().iter().map(|s| s.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl FromStr for SectionFlags {
    type Err = String;

    /// Comma-separated section names, e.g. `creative,campaign`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sections = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Section::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_sections(sections))
    }
}

/// Old and new value of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Section to field name to change
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BriefChanges(BTreeMap<Section, BTreeMap<String, FieldChange>>);

impl BriefChanges {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of changed fields
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Sections with at least one changed field
    pub fn sections(&self) -> Vec<Section> {
        self.0.keys().copied().collect()
    }

    pub fn section(&self, section: Section) -> Option<&BTreeMap<String, FieldChange>> {
        self.0.get(&section)
    }

    pub fn field(&self, field: BriefField) -> Option<&FieldChange> {
        self.0.get(&field.section()).and_then(|fields| fields.get(field.name()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &str, &FieldChange)> {
        self.0
            .iter()
            .flat_map(|(section, fields)| fields.iter().map(move |(name, change)| (*section, name.as_str(), change)))
    }
}

/// Field-by-field difference between two briefs, grouped by section
pub fn diff_briefs(old: &CampaignBrief, new: &CampaignBrief) -> BriefChanges {
    let mut changes: BTreeMap<Section, BTreeMap<String, FieldChange>> = BTreeMap::new();
    for field in BriefField::ALL {
        let (before, after) = (old.field_value(field), new.field_value(field));
        if before != after {
            changes.entry(field.section()).or_default().insert(
                field.name().to_string(),
                FieldChange {
                    old: before,
                    new: after,
                },
            );
        }
    }
    BriefChanges(changes)
}

/// One applied revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub timestamp: DateTime<Utc>,
    pub feedback: String,
    pub sections: SectionFlags,
    pub changes: BriefChanges,
}

/// Ordered, append-only log of revisions for one brief
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RevisionHistory {
    entries: Vec<RevisionRecord>,
}

impl RevisionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, record: RevisionRecord) {
        self.entries.push(record);
    }

    pub fn entries(&self) -> &[RevisionRecord] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&RevisionRecord> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RevisionRecord> {
        self.entries.iter()
    }
}
