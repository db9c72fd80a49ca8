//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::pipeline::CampaignRequest;
use crate::revision::SectionFlags;

/// Briefwright - data-driven campaign brief generator
#[derive(Parser)]
#[command(
    name = "bw",
    about = "Generate and revise marketing campaign briefs from historical performance data",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/briefwright/logs/briefwright.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the full pipeline and print the brief
    Run {
        #[command(flatten)]
        campaign: CampaignArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Also write the brief as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Send progress lines to the log file instead of stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// Revise a previously exported brief
    Revise {
        /// Brief JSON file
        #[arg(short, long)]
        brief: PathBuf,

        /// What to change
        #[arg(long)]
        feedback: String,

        /// Sections to revise, skipping classification (e.g. creative,campaign)
        #[arg(short, long)]
        sections: Option<SectionFlags>,

        /// Write the revised brief here instead of back to --brief
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which sections a piece of feedback targets
    Classify {
        /// Brief JSON file
        #[arg(short, long)]
        brief: PathBuf,

        /// Feedback to classify
        #[arg(long)]
        feedback: String,

        /// Skip the model and use keyword matching only
        #[arg(long)]
        keywords_only: bool,
    },

    /// Interactive session: generate a brief, then revise it with feedback
    Session {
        /// Objective to generate a brief for right away
        #[arg(long)]
        objective: Option<String>,

        /// Target industry for the first brief
        #[arg(long)]
        industry: Option<String>,
    },

    /// Show the historical data the analyst sees
    Stats {
        /// Industry filter (case-insensitive substring)
        #[arg(short, long)]
        industry: Option<String>,

        /// Number of top performers to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show logs
    Logs {
        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
}

/// Campaign request fields shared by `run`
#[derive(Args, Debug, Clone, Default)]
pub struct CampaignArgs {
    /// Campaign objective (required)
    #[arg(long)]
    pub objective: String,

    /// Target industry
    #[arg(long)]
    pub industry: Option<String>,

    /// Campaign budget, e.g. "$50,000"
    #[arg(long)]
    pub budget: Option<String>,

    /// Campaign timing, e.g. "Q3 2025"
    #[arg(long)]
    pub timing: Option<String>,

    /// Destination URL
    #[arg(long)]
    pub url: Option<String>,

    /// Media objective, e.g. awareness or conversions
    #[arg(long)]
    pub media_objective: Option<String>,

    /// Media (audience) target
    #[arg(long)]
    pub media_target: Option<String>,
}

impl From<CampaignArgs> for CampaignRequest {
    fn from(args: CampaignArgs) -> Self {
        Self {
            campaign_objective: Some(args.objective),
            target_industry: args.industry,
            campaign_budget: args.budget,
            campaign_timing: args.timing,
            campaign_destination_url: args.url,
            media_objective: args.media_objective,
            media_target: args.media_target,
        }
    }
}

/// Output format for briefs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Directory holding the log file
pub fn get_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("briefwright")
        .join("logs")
}

pub fn get_log_path() -> PathBuf {
    get_log_dir().join("briefwright.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::Section;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["bw"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from([
            "bw",
            "run",
            "--objective",
            "Launch eco detergent",
            "--industry",
            "Retail",
            "--budget",
            "$50,000",
            "--format",
            "json",
        ]);
        let Some(Command::Run {
            campaign,
            format,
            output,
            quiet,
        }) = cli.command
        else {
            panic!("Expected Run command");
        };
        assert_eq!(format, OutputFormat::Json);
        assert!(output.is_none());
        assert!(!quiet);

        let request = CampaignRequest::from(campaign);
        assert_eq!(request.campaign_objective.as_deref(), Some("Launch eco detergent"));
        assert_eq!(request.target_industry.as_deref(), Some("Retail"));
        assert_eq!(request.campaign_budget.as_deref(), Some("$50,000"));
        assert!(request.media_target.is_none());
    }

    #[test]
    fn test_cli_parse_run_quiet() {
        let cli = Cli::parse_from(["bw", "run", "--objective", "Spring launch", "--quiet"]);
        assert!(matches!(cli.command, Some(Command::Run { quiet: true, .. })));
    }

    #[test]
    fn test_cli_run_requires_objective() {
        assert!(Cli::try_parse_from(["bw", "run"]).is_err());
    }

    #[test]
    fn test_cli_parse_revise_with_sections() {
        let cli = Cli::parse_from([
            "bw",
            "revise",
            "--brief",
            "brief.json",
            "--feedback",
            "new tagline",
            "--sections",
            "creative,campaign",
        ]);
        let Some(Command::Revise { sections, .. }) = cli.command else {
            panic!("Expected Revise command");
        };
        assert_eq!(sections, Some(SectionFlags::from_sections([Section::Creative, Section::Campaign])));
    }

    #[test]
    fn test_cli_rejects_unknown_section() {
        assert!(
            Cli::try_parse_from(["bw", "revise", "-b", "b.json", "--feedback", "x", "-s", "legal"]).is_err()
        );
    }

    #[test]
    fn test_cli_parse_classify_keywords_only() {
        let cli = Cli::parse_from(["bw", "classify", "-b", "b.json", "--feedback", "x", "--keywords-only"]);
        assert!(matches!(cli.command, Some(Command::Classify { keywords_only: true, .. })));
    }

    #[test]
    fn test_cli_parse_stats_and_logs() {
        let cli = Cli::parse_from(["bw", "stats", "--industry", "retail", "-l", "5"]);
        assert!(matches!(cli.command, Some(Command::Stats { limit: Some(5), .. })));

        let cli = Cli::parse_from(["bw", "logs"]);
        assert!(matches!(cli.command, Some(Command::Logs { lines: 50 })));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("table".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["bw", "-c", "/path/to/config.yml", "stats"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("briefwright/logs/briefwright.log"));
    }
}
