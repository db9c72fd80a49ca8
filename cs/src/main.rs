use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use campaignstore::cli::{Cli, Command};
use campaignstore::config::Config;
use campaignstore::{Aggregator, JsonlSource};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let dataset = cli.dataset.clone().unwrap_or_else(|| config.dataset_path.clone());

    info!("campaignstore starting: dataset={}", dataset.display());

    let aggregator = || Aggregator::new(Arc::new(JsonlSource::new(&dataset)));

    match cli.command {
        Command::Sample { count, out, seed } => {
            let out = out.unwrap_or_else(|| dataset.clone());
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let today = chrono::Local::now().date_naive();
            let records = campaignstore::sample::generate(count, &mut rng, today);
            campaignstore::write_jsonl(&out, &records)?;
            println!(
                "{} Wrote {} campaigns to {}",
                "✓".green(),
                records.len(),
                out.display().to_string().cyan()
            );
        }
        Command::Top { limit } => {
            let top = aggregator().top_performers(limit.unwrap_or(config.top_limit))?;
            if top.is_empty() {
                println!("No campaigns scored {} or higher", campaignstore::SUCCESS_THRESHOLD);
            }
            for record in top {
                println!(
                    "{} {} | {} | score {} | ROAS {:.2} | {}",
                    record.campaign_id.yellow(),
                    record.campaign_name,
                    record.industry,
                    format!("{:.2}", record.success_score).green(),
                    record.roas,
                    record.channels.join(", ").dimmed()
                );
            }
        }
        Command::Channels => {
            let perf = aggregator().channel_performance()?;
            for (channel, stats) in perf {
                println!(
                    "{:<22} score {:.2} | ROAS {:.2} | CTR {:.4} | conv {:.4} | {} campaigns",
                    channel.cyan(),
                    stats.avg_success_score,
                    stats.avg_roas,
                    stats.avg_ctr,
                    stats.avg_conversion_rate,
                    stats.campaign_count
                );
            }
        }
        Command::Industries { filter } => {
            let insights = aggregator().industry_insights(filter.as_deref())?;
            if insights.is_empty() {
                println!("No industries matched");
            }
            for insight in insights {
                println!(
                    "{:<16} score {:.2} | budget ${:.0} | {:.0} days | {} campaigns",
                    insight.industry.cyan(),
                    insight.avg_success_score,
                    insight.avg_budget,
                    insight.avg_duration,
                    insight.campaign_count
                );
                println!("  creative: {}", insight.creative_types.join(", ").dimmed());
                println!("  tones:    {}", insight.tones.join(", ").dimmed());
            }
        }
        Command::Check => {
            let records = aggregator().records()?;
            println!("{} {} valid campaigns in {}", "✓".green(), records.len(), dataset.display());
        }
    }

    Ok(())
}
