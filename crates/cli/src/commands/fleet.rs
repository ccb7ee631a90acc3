//! Fleet-wide commands

use analytics_lib::{FleetAnalytics, HealthTier};
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::output::{
    color_health, format_currency, print_heading, print_json, print_table, OutputFormat,
};

#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Instance")]
    instance_id: String,
    #[tabled(rename = "CPU Avg")]
    cpu_avg: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Insights")]
    insights: String,
}

#[derive(Tabled)]
struct TypeCostRow {
    #[tabled(rename = "Instance Type")]
    instance_type: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Monthly Cost")]
    monthly_cost: String,
}

/// Show the health tier of every instance
pub async fn show_health(
    analytics: &FleetAnalytics,
    duration_minutes: u32,
    format: OutputFormat,
) -> Result<()> {
    let fleet = analytics.fleet_health(duration_minutes).await?;

    match format {
        OutputFormat::Json => print_json(&fleet)?,
        OutputFormat::Table => {
            print_heading("Fleet Health");
            let rows = fleet
                .iter()
                .map(|h| HealthRow {
                    instance_id: h.instance_id.clone(),
                    cpu_avg: format!("{:.2}%", h.cpu_avg),
                    health: color_health(h.health),
                    insights: h.insights.join("; "),
                })
                .collect();
            print_table(rows, "No instances found");

            let count = |tier: HealthTier| fleet.iter().filter(|h| h.health == tier).count();
            println!();
            println!(
                "{} healthy, {} warning, {} critical",
                count(HealthTier::Healthy).to_string().green(),
                count(HealthTier::Warning).to_string().yellow(),
                count(HealthTier::Critical).to_string().red()
            );
        }
    }

    Ok(())
}

/// Show the monthly cost of the fleet grouped by instance type
pub async fn show_cost(analytics: &FleetAnalytics, format: OutputFormat) -> Result<()> {
    let summary = analytics.fleet_cost().await?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_heading("Fleet Cost");
            println!("Instances:              {}", summary.total_instances);
            println!(
                "Monthly:                {}",
                format_currency(summary.current_monthly_cost).bold()
            );
            println!(
                "Annual (estimate):      {}",
                format_currency(summary.estimated_annual_cost)
            );
            println!();

            let rows = summary
                .cost_by_instance_type
                .iter()
                .map(|(instance_type, cost)| TypeCostRow {
                    instance_type: instance_type.clone(),
                    count: cost.count,
                    monthly_cost: format_currency(cost.monthly_cost),
                })
                .collect();
            print_table(rows, "No instances found");
        }
    }

    Ok(())
}
