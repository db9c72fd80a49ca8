//! Dataset sources
//!
//! The aggregator reads campaign rows through [`DatasetSource`]. Rows are
//! validated on every load; malformed data is surfaced, never defaulted.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::StoreError;
use crate::record::CampaignRecord;

/// Read-only provider of historical campaign rows
pub trait DatasetSource: Send + Sync {
    /// Human-readable origin, used in error messages and logs
    fn describe(&self) -> String;

    /// Load and validate every row
    fn load(&self) -> Result<Vec<CampaignRecord>, StoreError>;
}

/// Newline-delimited JSON file, one [`CampaignRecord`] per line
#[derive(Debug, Clone)]
pub struct JsonlSource {
    path: PathBuf,
}

impl JsonlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for JsonlSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<CampaignRecord>, StoreError> {
        debug!("JsonlSource::load: path={}", self.path.display());
        if !self.path.exists() {
            return Err(StoreError::NotFound {
                path: self.path.clone(),
            });
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: CampaignRecord = serde_json::from_str(line).map_err(|e| StoreError::MalformedRow {
                origin: self.describe(),
                line: idx + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }

        check_rows(&records)?;
        debug!("JsonlSource::load: loaded {} records", records.len());
        Ok(records)
    }
}

/// In-memory rows, validated the same way as file-backed ones
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<CampaignRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<CampaignRecord>) -> Self {
        Self { records }
    }
}

impl DatasetSource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    fn load(&self) -> Result<Vec<CampaignRecord>, StoreError> {
        check_rows(&self.records)?;
        Ok(self.records.clone())
    }
}

/// Write records as JSONL, replacing any existing file
pub fn write_jsonl(path: &Path, records: &[CampaignRecord]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut file = std::fs::File::create(path).map_err(io_err)?;
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| StoreError::MalformedRow {
            origin: path.display().to_string(),
            line: 0,
            message: e.to_string(),
        })?;
        writeln!(file, "{}", line).map_err(io_err)?;
    }
    Ok(())
}

fn check_rows(records: &[CampaignRecord]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for record in records {
        record.validate()?;
        if !seen.insert(record.campaign_id.as_str()) {
            return Err(StoreError::DuplicateId(record.campaign_id.clone()));
        }
    }
    Ok(())
}
