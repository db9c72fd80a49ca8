//! Briefwright - campaign brief generator
//!
//! CLI entry point for generating, classifying and revising briefs.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use briefwright::artifacts::CampaignBrief;
use briefwright::classifier::SectionClassifier;
use briefwright::cli::{CampaignArgs, Cli, Command, OutputFormat, get_log_dir, get_log_path};
use briefwright::config::Config;
use briefwright::pipeline::{CampaignRequest, Pipeline};
use briefwright::progress::{LogSink, ProgressSink};
use briefwright::render;
use briefwright::revision::SectionFlags;
use briefwright::session::{BriefSession, RevisionResult};
use campaignstore::{Aggregator, JsonlSource};

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = get_log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to the log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(get_log_path()).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

/// Progress lines on stderr so stdout stays clean for `--format json`
struct StderrSink;

impl ProgressSink for StderrSink {
    fn notify(&self, message: &str) {
        eprintln!("{} {}", "→".cyan(), message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Briefwright loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Run {
            campaign,
            format,
            output,
            quiet,
        }) => cmd_run(&config, campaign, format, output.as_deref(), quiet).await,
        Some(Command::Revise {
            brief,
            feedback,
            sections,
            output,
        }) => cmd_revise(&config, &brief, &feedback, sections, output.as_deref()).await,
        Some(Command::Classify {
            brief,
            feedback,
            keywords_only,
        }) => cmd_classify(&config, &brief, &feedback, keywords_only).await,
        Some(Command::Session { objective, industry }) => cmd_session(&config, objective, industry).await,
        Some(Command::Stats { industry, limit }) => cmd_stats(&config, industry.as_deref(), limit),
        Some(Command::Logs { lines }) => cmd_logs(lines),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Run the pipeline once
async fn cmd_run(
    config: &Config,
    campaign: CampaignArgs,
    format: OutputFormat,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let pipeline = Pipeline::from_config(config)?;
    let sink: &dyn ProgressSink = if quiet { &LogSink } else { &StderrSink };
    let result = pipeline.run(CampaignRequest::from(campaign), sink).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result.brief)?),
        OutputFormat::Text => print!("{}", render::brief_text(&result.brief)),
    }

    if let Some(path) = output {
        write_brief(path, &result.brief)?;
        eprintln!("{} Brief saved to {}", "✓".green(), path.display());
    }
    Ok(())
}

/// Revise an exported brief from one piece of feedback
async fn cmd_revise(
    config: &Config,
    brief_path: &Path,
    feedback: &str,
    sections: Option<SectionFlags>,
    output: Option<&Path>,
) -> Result<()> {
    let brief = read_brief(brief_path)?;
    let pipeline = Arc::new(Pipeline::for_revision(config)?);
    let classifier = pipeline.classifier(config.classifier.use_model, config.classifier.brief_excerpt_chars);
    let mut session = BriefSession::new(pipeline, classifier);
    session.adopt(brief);

    match session.revise(feedback, sections).await? {
        RevisionResult::NoSectionsDetected => {
            println!(
                "{}",
                "Couldn't tell which sections the feedback targets; nothing was changed. Pass --sections to choose."
                    .yellow()
            );
        }
        RevisionResult::Revised {
            sections,
            classified_by,
            changes,
        } => {
            let origin = classified_by.map(|s| s.to_string()).unwrap_or_else(|| "--sections".to_string());
            println!("{} {} (from {})", "Revised:".bright_cyan(), sections, origin);
            print!("{}", render::changes_text(&changes));

            if let Some(brief) = session.current_brief() {
                let path = output.unwrap_or(brief_path);
                write_brief(path, brief)?;
                println!("{} Brief saved to {}", "✓".green(), path.display());
            }
            if let Some(record) = session.history().latest() {
                println!("{}", serde_json::to_string_pretty(record)?);
            }
        }
    }
    Ok(())
}

/// Classify feedback against an exported brief
async fn cmd_classify(config: &Config, brief_path: &Path, feedback: &str, keywords_only: bool) -> Result<()> {
    let brief = read_brief(brief_path)?;
    let classifier = if keywords_only || !config.classifier.use_model {
        SectionClassifier::keywords_only()
    } else {
        Pipeline::for_revision(config)?.classifier(true, config.classifier.brief_excerpt_chars)
    };

    let classification = classifier.classify_sections(feedback, &brief).await;
    print!("{}", render::classification_text(&classification));
    if classification.no_sections_detected() {
        println!("{}", "No sections detected.".yellow());
    }
    Ok(())
}

/// Run the interactive session
async fn cmd_session(config: &Config, objective: Option<String>, industry: Option<String>) -> Result<()> {
    let initial = objective.map(|objective| CampaignRequest {
        target_industry: industry,
        ..CampaignRequest::new(objective)
    });
    briefwright::repl::run_interactive(config, initial).await
}

/// Print what the analyst would see
fn cmd_stats(config: &Config, industry: Option<&str>, limit: Option<usize>) -> Result<()> {
    config.validate_data()?;
    let aggregator = Aggregator::new(Arc::new(JsonlSource::new(config.data.dataset.clone())));

    let top = aggregator.top_performers(limit.unwrap_or(config.data.top_performer_limit))?;
    println!("{}", "Top Performers".bright_cyan().bold());
    if top.is_empty() {
        println!("  {}", "No campaigns met the success threshold.".dimmed());
    }
    for record in &top {
        println!(
            "  {} {} | {} | score {:.2} | ROAS {:.2}",
            record.campaign_id.yellow(),
            record.campaign_name,
            record.industry,
            record.success_score,
            record.roas
        );
    }

    println!();
    println!("{}", "Channel Performance".bright_cyan().bold());
    for (channel, stats) in aggregator.channel_performance()? {
        println!(
            "  {:<22} score {:.2} | ROAS {:.2} | {} campaigns",
            channel.cyan(),
            stats.avg_success_score,
            stats.avg_roas,
            stats.campaign_count
        );
    }

    println!();
    println!("{}", "Industry Insights".bright_cyan().bold());
    for insight in aggregator.industry_insights(industry)? {
        println!(
            "  {:<16} score {:.2} | budget ${:.0} | {} campaigns",
            insight.industry.cyan(),
            insight.avg_success_score,
            insight.avg_budget,
            insight.campaign_count
        );
    }
    Ok(())
}

/// Show the last lines of the log
fn cmd_logs(lines: usize) -> Result<()> {
    let log_path = get_log_path();

    if !log_path.exists() {
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    let file = fs::File::open(&log_path).context("Failed to open log file")?;
    let reader = BufReader::new(file);
    let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{}", line);
    }
    Ok(())
}

/// Read a brief file: either a bare brief or a session export with a
/// `brief` key
fn read_brief(path: &Path) -> Result<CampaignBrief> {
    let content = fs::read_to_string(path).context(format!("Failed to read brief {}", path.display()))?;
    let mut value: serde_json::Value =
        serde_json::from_str(&content).context(format!("Brief {} is not valid JSON", path.display()))?;
    if let Some(inner) = value.get_mut("brief").map(serde_json::Value::take) {
        value = inner;
    }
    serde_json::from_value(value).context(format!("{} does not contain a campaign brief", path.display()))
}

fn write_brief(path: &Path, brief: &CampaignBrief) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(brief)?;
    fs::write(path, json).context(format!("Failed to write brief {}", path.display()))
}
