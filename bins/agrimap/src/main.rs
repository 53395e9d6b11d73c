//! agrimap CLI
//!
//! Manage users and farms, and list farms ranked by driving distance.

use agrimap_core::config::Config;
use agrimap_core::error::exit_codes;
use agrimap_core::Error;
use agrimap_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing::{info, warn};
use uuid::Uuid;

mod app;
mod commands;
mod output;

use commands::{farms, health, migrate, seed, users};

/// Farm listing and ranking service
#[derive(Parser)]
#[command(name = "agrimap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to agrimap.toml (searched for in the working directory if not given)
    #[arg(short, long, global = true, env = "AGRIMAP_CONFIG")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print collected metrics to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,

    /// Insert deterministic sample users and farms
    Seed,

    /// Check database and Google Maps connectivity
    Health {
        /// Also geocode a known address against Google Maps
        #[arg(short, long)]
        detailed: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Manage and list farms
    Farms {
        #[command(subcommand)]
        action: FarmsAction,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Migrate => "migrate",
            Commands::Seed => "seed",
            Commands::Health { .. } => "health",
            Commands::Users {
                action: UsersAction::Create { .. },
            } => "users create",
            Commands::Users {
                action: UsersAction::Locate { .. },
            } => "users locate",
            Commands::Farms {
                action: FarmsAction::Create { .. },
            } => "farms create",
            Commands::Farms {
                action: FarmsAction::List(_),
            } => "farms list",
        }
    }
}

#[derive(Subcommand)]
enum UsersAction {
    /// Register a user
    Create {
        /// Email address
        email: String,
    },

    /// Geocode an address and store it as the user's location
    Locate {
        /// User id
        user_id: Uuid,

        /// Street address
        address: String,
    },
}

#[derive(Subcommand)]
enum FarmsAction {
    /// Create a farm for a user
    Create {
        /// Owner id
        #[arg(long)]
        user_id: Uuid,

        #[arg(long)]
        name: String,

        #[arg(long)]
        address: String,

        /// Hectares
        #[arg(long)]
        size: f64,

        /// Tons
        #[arg(long = "yield")]
        crop_yield: f64,

        /// "lat,long"; geocoded from the address if omitted
        #[arg(long)]
        coordinates: Option<String>,
    },

    /// List farms with driving distances from the requesting user
    List(farms::ListArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(&e, cli.format),
    };

    let telemetry = TelemetryConfig {
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            config.schema.logging.level.clone()
        },
        json: cli.json_logs || config.schema.logging.json,
        show_target: cli.verbose,
    };
    if let Err(e) = agrimap_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let format = cli.format;
    let command = cli.command.name();
    info!(command, "Running command");

    let result = match cli.command {
        Commands::Migrate => migrate::run(config, format).await,
        Commands::Seed => seed::run(config, format).await,
        Commands::Health { detailed } => health::run(config, detailed, format).await,

        Commands::Users { action } => match action {
            UsersAction::Create { email } => users::create(config, &email, format).await,
            UsersAction::Locate { user_id, address } => {
                users::locate(config, user_id, &address, format).await
            }
        },

        Commands::Farms { action } => match action {
            FarmsAction::Create {
                user_id,
                name,
                address,
                size,
                crop_yield,
                coordinates,
            } => {
                let input = agrimap_farms::CreateFarm {
                    name,
                    address,
                    size,
                    crop_yield,
                    coordinates,
                };
                farms::create(config, user_id, input, format).await
            }
            FarmsAction::List(args) => farms::list(config, args, format).await,
        },
    };

    if cli.metrics {
        output::print_metrics();
    }

    match result {
        Ok(()) => {
            info!(command, "Command finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!(command, code = %e.code, "Command failed");
            fail(&e, format)
        }
    }
}

fn fail(err: &Error, format: Format) -> ExitCode {
    match format {
        Format::Json => match serde_json::to_string_pretty(&err.to_report()) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{err}"),
        },
        Format::Text => {
            eprintln!("{} {}", "Error:".red().bold(), err);
            if !err.is_client_error() {
                if let Some(source) = &err.source {
                    eprintln!("  {} {}", "Caused by:".dimmed(), source);
                }
            }
        }
    }
    ExitCode::from(u8::try_from(exit_codes::for_error(err)).unwrap_or(1))
}
