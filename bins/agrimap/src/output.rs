//! Terminal output helpers.

use agrimap_core::{Error, Result};
use agrimap_telemetry::metrics;
use owo_colors::OwoColorize;
use serde::Serialize;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

pub fn header(title: &str) {
    println!();
    println!("{}", RULE.blue());
    println!("  {}", title.blue().bold());
    println!("{}", RULE.blue());
    println!();
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::internal(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<14} {}", format!("{label}:").dimmed(), value);
}

pub fn print_metrics() {
    match serde_json::to_string_pretty(&metrics().snapshot()) {
        Ok(json) => eprintln!("{json}"),
        Err(e) => eprintln!("{} {}", "Warning:".yellow().bold(), e),
    }
}
