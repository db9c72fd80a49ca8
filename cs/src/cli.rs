//! CLI argument parsing for campaignstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cs")]
#[command(author, version, about = "Historical campaign dataset store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dataset file (overrides config)
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a synthetic dataset
    Sample {
        /// Number of campaigns to generate
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Output file (defaults to the configured dataset path)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List top-performing campaigns
    Top {
        /// Maximum campaigns to list
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show per-channel performance
    Channels,

    /// Show per-industry insights
    Industries {
        /// Case-insensitive industry substring
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Validate every row of the dataset
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample() {
        let cli = Cli::parse_from(["cs", "sample", "-n", "10", "--seed", "4"]);
        match cli.command {
            Command::Sample { count, out, seed } => {
                assert_eq!(count, 10);
                assert!(out.is_none());
                assert_eq!(seed, Some(4));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_industries_with_dataset() {
        let cli = Cli::parse_from(["cs", "industries", "--filter", "tech", "--dataset", "d.jsonl"]);
        assert_eq!(cli.dataset, Some(PathBuf::from("d.jsonl")));
        assert!(matches!(cli.command, Command::Industries { filter: Some(ref f) } if f == "tech"));
    }
}
