//! fleetctl
//!
//! Command-line front end for fleet analytics: metric summaries, anomaly
//! detection, failure prediction, fleet health and cost simulation over a
//! recorded JSON data set.

mod commands;
mod config;
mod fixture;
mod output;

use analytics_lib::cost::{DeploymentAction, Scenario};
use analytics_lib::provider::{Degrading, TimeSeriesProvider};
use analytics_lib::{gather_metrics_text, FleetAnalytics, StructuredLogger};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{cost, fleet, instance};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Fleet analytics CLI
#[derive(Parser)]
#[command(name = "fleetctl")]
#[command(author, version, about = "Fleet analytics for compute instances", long_about = None)]
pub struct Cli {
    /// JSON data set with inventory and metric series
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file (TOML, YAML or JSON)
    #[arg(long, env = "FLEETCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Look-back window in minutes
    #[arg(long, short, global = true)]
    pub duration: Option<u32>,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: output::OutputFormat,

    /// Fail on channel fetch errors instead of treating them as no data
    #[arg(long, global = true)]
    pub strict: bool,

    /// Write Prometheus metrics to stderr after the command
    #[arg(long, global = true)]
    pub print_metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the instance inventory
    Instances,

    /// Summarize CPU and network averages for an instance
    Metrics {
        /// Instance ID
        instance_id: String,
    },

    /// Detect sigma outliers in an instance's metrics
    Anomalies {
        /// Instance ID
        instance_id: String,
    },

    /// Predict failure risk from the CPU trend
    Predict {
        /// Instance ID
        instance_id: String,
    },

    /// Fleet-wide views
    #[command(subcommand)]
    Fleet(FleetCommands),

    /// Cost simulation and right-sizing
    #[command(subcommand)]
    Cost(CostCommands),

    /// Preview deployment changes (simulation only)
    #[command(subcommand)]
    Preview(PreviewCommands),
}

#[derive(Subcommand)]
pub enum FleetCommands {
    /// Health tier of every instance
    Health,

    /// Monthly cost grouped by instance type
    Cost,
}

#[derive(Subcommand)]
pub enum CostCommands {
    /// Simulate a change of instance type
    Simulate {
        /// Current instance type
        current: String,

        /// Proposed instance type (suggested from --cpu when omitted)
        proposed: Option<String>,

        /// Scenario (downsize, upsize, optimize, resize)
        #[arg(long, default_value = "resize")]
        scenario: Scenario,

        /// Average CPU utilization in percent
        #[arg(long)]
        cpu: Option<f64>,
    },

    /// Suggest a right-sized instance type
    Suggest {
        /// Current instance type
        current: String,

        /// Average CPU utilization in percent
        #[arg(long)]
        cpu: f64,
    },
}

#[derive(Subcommand)]
pub enum PreviewCommands {
    /// Resize a single instance
    Resize {
        /// Current instance type
        current: String,

        /// Target instance type
        target: String,

        /// Instance being resized
        #[arg(long)]
        instance_id: Option<String>,
    },

    /// Change the number of instances in a fleet
    Scale {
        /// Current number of instances
        #[arg(long)]
        current_size: u32,

        /// Target number of instances
        #[arg(long)]
        target_size: u32,

        /// Instance type of the fleet
        #[arg(long)]
        instance_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = config::FleetctlConfig::load(cli.config.as_deref())?;
    let duration = cli.duration.unwrap_or(config.default_duration_minutes);
    let format = cli.format;
    debug!(duration_minutes = duration, "fleetctl configured");

    match &cli.command {
        Commands::Instances => {
            let analytics = build_analytics(&cli, &config)?;
            instance::list_instances(&analytics, format).await?;
        }
        Commands::Metrics { instance_id } => {
            let analytics = build_analytics(&cli, &config)?;
            instance::show_metrics(&analytics, instance_id, duration, format).await?;
        }
        Commands::Anomalies { instance_id } => {
            let analytics = build_analytics(&cli, &config)?;
            instance::show_anomalies(&analytics, instance_id, duration, format).await?;
        }
        Commands::Predict { instance_id } => {
            let analytics = build_analytics(&cli, &config)?;
            instance::show_prediction(&analytics, instance_id, duration, format).await?;
        }
        Commands::Fleet(fleet_cmd) => {
            let analytics = build_analytics(&cli, &config)?;
            match fleet_cmd {
                FleetCommands::Health => fleet::show_health(&analytics, duration, format).await?,
                FleetCommands::Cost => fleet::show_cost(&analytics, format).await?,
            }
        }
        Commands::Cost(cost_cmd) => match cost_cmd {
            CostCommands::Simulate {
                current,
                proposed,
                scenario,
                cpu,
            } => {
                cost::simulate(current, proposed.as_deref(), *scenario, *cpu, format)?;
            }
            CostCommands::Suggest { current, cpu } => {
                cost::suggest(current, *cpu, format)?;
            }
        },
        Commands::Preview(preview_cmd) => {
            let action = match preview_cmd {
                PreviewCommands::Resize {
                    current,
                    target,
                    instance_id,
                } => DeploymentAction::ResizeInstance {
                    instance_id: instance_id.clone(),
                    current_type: current.clone(),
                    target_type: target.clone(),
                },
                PreviewCommands::Scale {
                    current_size,
                    target_size,
                    instance_type,
                } => DeploymentAction::ScaleFleet {
                    current_size: *current_size,
                    target_size: *target_size,
                    instance_type: instance_type.clone(),
                },
            };
            cost::preview(action, format)?;
        }
    }

    if cli.print_metrics {
        eprint!(
            "{}",
            gather_metrics_text().context("Failed to encode metrics")?
        );
    }

    Ok(())
}

/// Wire the data set into the analytics service
fn build_analytics(cli: &Cli, config: &config::FleetctlConfig) -> Result<FleetAnalytics> {
    let path = cli
        .data
        .clone()
        .or_else(|| config.data_file.clone())
        .context("No data set given; pass --data or set FLEETCTL_DATA_FILE")?;

    let provider = Arc::new(fixture::load_data_set(&path)?);
    let logger = StructuredLogger::new("fleetctl");

    let series: Arc<dyn TimeSeriesProvider> = if cli.strict || config.strict_fetch {
        provider.clone()
    } else {
        Arc::new(Degrading::new(provider.clone(), logger.clone()))
    };

    Ok(FleetAnalytics::new(series, provider).with_logger(logger))
}
