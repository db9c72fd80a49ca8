//! Error types for campaignstore

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or validating a campaign dataset
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row {line} in {origin}: {message}")]
    MalformedRow {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("Invalid field '{field}' in campaign {campaign_id}: {reason}")]
    InvalidField {
        campaign_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("Duplicate campaign_id: {0}")]
    DuplicateId(String),
}

impl StoreError {
    pub(crate) fn invalid(campaign_id: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            campaign_id: campaign_id.to_string(),
            field,
            reason: reason.into(),
        }
    }
}
