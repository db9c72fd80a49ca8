//! Configuration for campaignstore

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the campaign dataset (JSONL)
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Default number of top performers to list
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
}

/// Default dataset location, shared with the brief generator
pub fn default_dataset_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campaignstore")
        .join("campaigns.jsonl")
}

fn default_top_limit() -> usize {
    crate::DEFAULT_TOP_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            top_limit: default_top_limit(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path);
        }

        let default_paths = [
            dirs::config_dir().map(|p| p.join("campaignstore").join("config.yml")),
            Some(PathBuf::from("campaignstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        Ok(Config::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("dataset_path: /tmp/c.jsonl\n").unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("/tmp/c.jsonl"));
        assert_eq!(config.top_limit, crate::DEFAULT_TOP_LIMIT);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let config = Config {
            dataset_path: dir.path().join("data.jsonl"),
            top_limit: 5,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.dataset_path, config.dataset_path);
        assert_eq!(loaded.top_limit, 5);
    }
}
