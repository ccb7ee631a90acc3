//! Output formatting utilities

use analytics_lib::anomaly::AnomalySeverity;
use analytics_lib::predictor::RiskLevel;
use analytics_lib::HealthTier;
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any result as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table
pub fn print_table<T: Tabled>(rows: Vec<T>, empty_message: &str) {
    if rows.is_empty() {
        println!("{}", empty_message.yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a section heading with an underline
pub fn print_heading(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(50));
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a USD amount, keeping the sign in front
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

/// Color a fleet health tier
pub fn color_health(tier: HealthTier) -> String {
    match tier {
        HealthTier::Healthy => tier.as_str().green().to_string(),
        HealthTier::Warning => tier.as_str().yellow().to_string(),
        HealthTier::Critical => tier.as_str().red().bold().to_string(),
    }
}

/// Color an anomaly severity
pub fn color_severity(severity: AnomalySeverity) -> String {
    match severity {
        AnomalySeverity::Normal => severity.as_str().normal().to_string(),
        AnomalySeverity::Minor => severity.as_str().yellow().to_string(),
        AnomalySeverity::Major => severity.as_str().red().to_string(),
        AnomalySeverity::Critical => severity.as_str().red().bold().to_string(),
    }
}

/// Color a risk level
pub fn color_risk(level: RiskLevel) -> String {
    match level {
        RiskLevel::Low => level.as_str().green().to_string(),
        RiskLevel::Medium => level.as_str().yellow().to_string(),
        RiskLevel::High => level.as_str().red().to_string(),
        RiskLevel::Critical => level.as_str().red().bold().to_string(),
    }
}

/// Color an instance lifecycle state
pub fn color_state(state: &str) -> String {
    match state.to_lowercase().as_str() {
        "running" => state.green().to_string(),
        "pending" | "stopping" => state.yellow().to_string(),
        "stopped" | "terminated" | "shutting-down" => state.red().to_string(),
        _ => state.to_string(),
    }
}

/// Color a savings amount: green when saving, red when spending more
pub fn color_savings(amount: f64) -> String {
    let formatted = format_currency(amount);
    if amount > 0.0 {
        formatted.green().bold().to_string()
    } else if amount < 0.0 {
        formatted.red().bold().to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(210.24), "$210.24");
        assert_eq!(format_currency(-60.73), "-$60.73");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn test_color_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(color_health(HealthTier::Critical), "CRITICAL");
        assert_eq!(color_risk(RiskLevel::Low), "LOW");
        assert_eq!(color_state("running"), "running");
        assert_eq!(color_savings(-1.0), "-$1.00");
    }
}
