//! Cost simulation commands
//!
//! These work from the static price table alone and need no data set.

use analytics_lib::cost::{
    hourly_price, is_known_type, preview_deployment, simulate_cost_change,
    simulate_with_suggestion, suggest_instance_type, CostSimulationResult, DeploymentAction,
    DeploymentPreview, Scenario,
};
use anyhow::Result;
use colored::Colorize;

use crate::output::{
    color_savings, format_currency, print_heading, print_info, print_json, print_warning,
    OutputFormat,
};

/// Simulate moving from one instance type to another
pub fn simulate(
    current_type: &str,
    proposed_type: Option<&str>,
    scenario: Scenario,
    avg_cpu: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    warn_unknown_type(current_type, format);
    if let Some(proposed) = proposed_type {
        warn_unknown_type(proposed, format);
    }

    let result = simulate_with_suggestion(current_type, proposed_type, scenario, avg_cpu);

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_simulation(&result),
    }

    Ok(())
}

/// Suggest a right-sized type for the observed CPU utilization
pub fn suggest(current_type: &str, avg_cpu: f64, format: OutputFormat) -> Result<()> {
    let suggested = suggest_instance_type(current_type, avg_cpu);
    let scenario = scenario_for(current_type, &suggested);
    let result = simulate_cost_change(current_type, &suggested, scenario);

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            if suggested == current_type {
                print_info(&format!(
                    "{} is appropriately sized for {:.1}% CPU",
                    current_type, avg_cpu
                ));
                return Ok(());
            }
            println!(
                "Suggested type:         {} -> {}",
                current_type,
                suggested.cyan().bold()
            );
            println!();
            print_simulation(&result);
        }
    }

    Ok(())
}

/// Preview a deployment change without applying it
pub fn preview(action: DeploymentAction, format: OutputFormat) -> Result<()> {
    let preview = preview_deployment(&action);

    match format {
        OutputFormat::Json => print_json(&preview)?,
        OutputFormat::Table => match &preview {
            DeploymentPreview::ResizeInstance {
                instance_id,
                changes,
                impact,
                recommendation,
                warning,
                ..
            } => {
                print_heading("Resize Preview");
                println!("Instance:               {}", instance_id.cyan());
                println!("Change:                 {} -> {}", changes.from, changes.to);
                println!();
                println!(
                    "Monthly difference:     {} ({:.1}%)",
                    color_savings(impact.monthly_cost_difference),
                    impact.percent_change
                );
                println!("Annual impact:          {}", color_savings(impact.annual_impact));
                println!();
                print_info(recommendation);
                print_warning(warning);
            }
            DeploymentPreview::ScaleFleet {
                changes,
                impact,
                recommendation,
                warning,
                ..
            } => {
                print_heading("Scale Preview");
                println!(
                    "Fleet size:             {} -> {} x {} ({:+})",
                    changes.current_size,
                    changes.target_size,
                    changes.instance_type,
                    changes.instance_change
                );
                println!();
                println!(
                    "Current monthly:        {}",
                    format_currency(impact.current_monthly_cost)
                );
                println!(
                    "Target monthly:         {}",
                    format_currency(impact.target_monthly_cost)
                );
                println!("Monthly savings:        {}", color_savings(impact.monthly_savings));
                println!("Annual impact:          {}", color_savings(impact.annual_impact));
                println!();
                print_info(recommendation);
                print_warning(warning);
            }
        },
    }

    Ok(())
}

fn print_simulation(result: &CostSimulationResult) {
    print_heading("Cost Simulation");
    println!("Scenario:               {}", result.scenario);
    println!(
        "Current:                {} ({}/hr, {}/mo)",
        result.current_cost.instance_type,
        result.current_cost.hourly,
        format_currency(result.current_cost.monthly)
    );
    println!(
        "Proposed:               {} ({}/hr, {}/mo)",
        result.proposed_cost.instance_type,
        result.proposed_cost.hourly,
        format_currency(result.proposed_cost.monthly)
    );
    println!();
    println!(
        "{} {} ({:.1}%)",
        "Monthly savings:".bold(),
        color_savings(result.monthly_savings),
        result.monthly_savings_percent
    );
    println!("Annual savings:         {}", color_savings(result.annual_savings));
    println!();
    print_info(&result.recommendation);
}

/// Scenario matching the direction of a suggested change
fn scenario_for(current_type: &str, proposed_type: &str) -> Scenario {
    let current = hourly_price(current_type);
    let proposed = hourly_price(proposed_type);
    if proposed < current {
        Scenario::Downsize
    } else if proposed > current {
        Scenario::Upsize
    } else {
        Scenario::Resize
    }
}

fn warn_unknown_type(instance_type: &str, format: OutputFormat) {
    if format == OutputFormat::Table && !is_known_type(instance_type) {
        print_warning(&format!(
            "{} is not in the price table, using the fallback rate",
            instance_type
        ));
    }
}
