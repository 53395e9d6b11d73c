//! Health check command

use crate::app::App;
use crate::output;
use crate::Format;
use agrimap_core::config::Config;
use agrimap_core::{Error, ErrorCode, Result};
use agrimap_maps::Geocoder;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Instant;

/// Geocoded by `--detailed`.
const PROBE_ADDRESS: &str = "Rådhuspladsen 1, 1550 København";

#[derive(Debug, Serialize)]
struct CheckResult {
    name: &'static str,
    healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    elapsed_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthReport {
    healthy: bool,
    config: Option<String>,
    checks: Vec<CheckResult>,
}

pub async fn run(config: Config, detailed: bool, format: Format) -> Result<()> {
    let config_path = config.path.clone();
    let mut checks = Vec::new();

    let started = Instant::now();
    let app = match App::connect(config).await {
        Ok(app) => match app.store.ping().await {
            Ok(()) => {
                checks.push(ok("database", started));
                Some(app)
            }
            Err(e) => {
                checks.push(failed("database", &e));
                None
            }
        },
        Err(e) => {
            checks.push(failed("database", &e));
            None
        }
    };

    if let Some(app) = &app {
        match app.maps() {
            Ok(maps) => {
                checks.push(CheckResult {
                    name: "maps.config",
                    healthy: true,
                    elapsed_ms: None,
                    error: None,
                });
                if detailed {
                    let started = Instant::now();
                    match maps.geocode(PROBE_ADDRESS).await {
                        Ok(Some(_)) => checks.push(ok("maps.geocode", started)),
                        Ok(None) => checks.push(failed(
                            "maps.geocode",
                            &Error::unprocessable_entity("Probe address not found"),
                        )),
                        Err(e) => checks.push(failed(
                            "maps.geocode",
                            &e.into_integration_error(maps.provider_name()),
                        )),
                    }
                }
            }
            Err(e) => checks.push(failed("maps.config", &e)),
        }
    }

    let report = HealthReport {
        healthy: checks.iter().all(|c| c.healthy),
        config: config_path,
        checks,
    };

    if format == Format::Json {
        output::print_json(&report)?;
    } else {
        print_report(&report);
    }

    if report.healthy {
        Ok(())
    } else {
        Err(Error::new(ErrorCode::Unknown, "One or more health checks failed"))
    }
}

fn ok(name: &'static str, started: Instant) -> CheckResult {
    CheckResult {
        name,
        healthy: true,
        elapsed_ms: Some(started.elapsed().as_millis()),
        error: None,
    }
}

fn failed(name: &'static str, err: &Error) -> CheckResult {
    CheckResult {
        name,
        healthy: false,
        elapsed_ms: None,
        error: Some(err.message.clone()),
    }
}

fn print_report(report: &HealthReport) {
    output::header("🌾 agrimap Health Check");

    if let Some(path) = &report.config {
        output::field("config", path);
        println!();
    }

    for check in &report.checks {
        let timing = check
            .elapsed_ms
            .map(|ms| format!(" ({ms}ms)"))
            .unwrap_or_default();
        if check.healthy {
            println!("  {:<16} {}{}", check.name, "✓ OK".green(), timing.dimmed());
        } else {
            println!("  {:<16} {}", check.name, "✗ Error".red());
            if let Some(error) = &check.error {
                println!("    └─ {}", error.dimmed());
            }
        }
    }

    println!();
    if report.healthy {
        println!("  {}", "All systems healthy".green().bold());
    } else {
        println!("  {}", "Some checks failed".red().bold());
    }
}
