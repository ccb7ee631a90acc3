//! Per-instance commands

use analytics_lib::FleetAnalytics;
use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::output::{
    color_risk, color_severity, color_state, print_heading, print_info, print_json, print_success,
    print_table, print_warning, OutputFormat,
};

#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Instance")]
    instance_id: String,
    #[tabled(rename = "Type")]
    instance_type: String,
    #[tabled(rename = "State")]
    state: String,
}

#[derive(Tabled)]
struct AnomalyRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Std Dev")]
    std_dev: String,
    #[tabled(rename = "Sigma")]
    sigma: String,
    #[tabled(rename = "Severity")]
    severity: String,
}

#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Predicted")]
    predicted: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Slope")]
    slope: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "P(fail)")]
    probability: String,
}

/// List the inventory
pub async fn list_instances(analytics: &FleetAnalytics, format: OutputFormat) -> Result<()> {
    let instances = analytics.list_instances().await?;

    match format {
        OutputFormat::Json => print_json(&instances)?,
        OutputFormat::Table => {
            let rows = instances
                .iter()
                .map(|i| InstanceRow {
                    instance_id: i.instance_id.clone().unwrap_or_else(|| "-".to_string()),
                    instance_type: i.instance_type.clone().unwrap_or_else(|| "-".to_string()),
                    state: i
                        .state
                        .as_deref()
                        .map(color_state)
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            print_table(rows, "No instances found");
        }
    }

    Ok(())
}

/// Show rounded channel averages for one instance
pub async fn show_metrics(
    analytics: &FleetAnalytics,
    instance_id: &str,
    duration_minutes: u32,
    format: OutputFormat,
) -> Result<()> {
    let summary = analytics.metrics_summary(instance_id, duration_minutes).await?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_heading("Metrics Summary");
            println!("Instance:               {}", summary.instance_id.cyan());
            println!("Window:                 {} minutes", duration_minutes);
            println!();
            println!("CPU average:            {:.2}%", summary.cpu_avg);
            println!("Network in average:     {:.2} bytes", summary.net_in_avg);
            println!("Network out average:    {:.2} bytes", summary.net_out_avg);

            if !summary.insights.is_empty() {
                println!();
                for insight in &summary.insights {
                    print_warning(insight);
                }
            }
        }
    }

    Ok(())
}

/// Show sigma outliers for one instance
pub async fn show_anomalies(
    analytics: &FleetAnalytics,
    instance_id: &str,
    duration_minutes: u32,
    format: OutputFormat,
) -> Result<()> {
    let summary = analytics
        .detect_anomalies(instance_id, duration_minutes)
        .await?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_heading("Anomaly Detection");
            println!("Instance:               {}", summary.instance_id.cyan());
            println!("Window:                 {} minutes", summary.duration_minutes);
            println!("Metrics analyzed:       {}", summary.total_metrics_analyzed);
            println!();

            if summary.anomaly_count == 0 {
                print_success("No anomalies detected");
                return Ok(());
            }

            let rows = summary
                .anomalies_detected
                .iter()
                .map(|a| AnomalyRow {
                    metric: a.metric.to_string(),
                    value: format!("{:.2}", a.value),
                    mean: format!("{:.2}", a.mean),
                    std_dev: format!("{:.2}", a.std_dev),
                    sigma: format!("{:+.2}", a.sigma_deviation),
                    severity: color_severity(a.severity),
                })
                .collect();
            print_table(rows, "No anomalies detected");
            print_info(&format!("{} anomalous samples", summary.anomaly_count));
        }
    }

    Ok(())
}

/// Show the failure risk prediction for one instance
pub async fn show_prediction(
    analytics: &FleetAnalytics,
    instance_id: &str,
    duration_minutes: u32,
    format: OutputFormat,
) -> Result<()> {
    let summary = analytics
        .predict_failure(instance_id, duration_minutes)
        .await?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_heading("Failure Prediction");
            println!("Instance:               {}", summary.instance_id.cyan());
            println!("Window:                 {} minutes", summary.duration_minutes);
            println!();

            let rows = summary
                .predictions
                .iter()
                .map(|p| PredictionRow {
                    metric: p.metric.to_string(),
                    current: format!("{:.2}", p.current_value),
                    predicted: format!("{:.2}", p.predicted_value),
                    trend: p.trend.to_string(),
                    slope: format!("{:+.3}", p.trend_slope),
                    risk: format!("{} ({:.0})", color_risk(p.risk_level), p.risk_score),
                    probability: format!("{:.0}%", p.failure_probability * 100.0),
                })
                .collect();
            print_table(rows, "No predictions available");
            println!();

            println!(
                "{} {} ({})",
                "Overall risk:".bold(),
                color_risk(summary.overall_risk_level),
                summary.overall_risk_score
            );
            println!("Time to failure:        {}", summary.time_to_failure_estimate);
            for p in &summary.predictions {
                print_info(&p.recommendation);
            }
        }
    }

    Ok(())
}
