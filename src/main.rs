//! Climate Observation Service - HTTP API
//!
//! Serves read-only JSON endpoints over the Hawaii climate dataset:
//! 1. Precipitation for the last 12 months of data
//! 2. Station identifiers
//! 3. Temperature observations at the most active station
//! 4. Daily temperature summaries from a start date, or within a range
//!
//! Usage:
//!   cargo run --release                             # Serve on 0.0.0.0:5000
//!   cargo run --release -- --port 8080              # Serve on another port
//!   cargo run --release -- --database data.sqlite   # Use another store
//!   cargo run --release -- --config service.toml    # Explicit config file
//!   cargo run --release -- --workers 8              # Request worker threads
//!
//! Environment:
//!   CLIMATE_DB_PATH, CLIMATE_BIND, CLIMATE_PORT, CLIMATE_WORKERS
//!   RUST_LOG - log filter (default: info)

use climate_service::config::{self, ServiceConfig};
use climate_service::db;
use climate_service::endpoint;
use std::env;
use std::path::PathBuf;

/// Command-line overrides, applied after the config file and environment.
#[derive(Default)]
struct CliArgs {
    config_path: Option<PathBuf>,
    database: Option<PathBuf>,
    port: Option<String>,
    workers: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .cloned()
            .ok_or_else(|| format!("{} requires a value", flag))?;
        match flag {
            "--config" => cli.config_path = Some(PathBuf::from(value)),
            "--database" => cli.database = Some(PathBuf::from(value)),
            "--port" => cli.port = Some(value),
            "--workers" => cli.workers = Some(value),
            _ => return Err(format!("Unknown argument: {}", flag)),
        }
        i += 2;
    }

    Ok(cli)
}

fn apply_cli(config: &mut ServiceConfig, cli: CliArgs) -> Result<(), config::ConfigError> {
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(port) = cli.port {
        config.port = config::parse_value("--port", &port)?;
    }
    if let Some(workers) = cli.workers {
        config.workers = config::parse_value("--workers", &workers)?;
    }
    config.validate()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🌺 Climate Observation Service");
    println!("==============================\n");

    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!(
                "Usage: {} [--config PATH] [--database PATH] [--port PORT] [--workers N]",
                args[0]
            );
            std::process::exit(1);
        }
    };

    let mut config = match ServiceConfig::load(cli.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Configuration error: {}\n", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = apply_cli(&mut config, cli) {
        eprintln!("\n❌ Configuration error: {}\n", e);
        std::process::exit(1);
    }

    // Fail fast on a missing or malformed store; requests open their own
    // connections afterwards.
    println!("📊 Checking store {}...", config.database_path.display());
    match db::open_and_verify(&config.store_config()) {
        Ok(_) => println!("✓ Store ready\n"),
        Err(e) => {
            eprintln!("\n❌ Store check failed: {}\n", e);
            std::process::exit(1);
        }
    }

    println!("🚀 Starting HTTP endpoint server ({} workers)...", config.workers);
    if let Err(e) = endpoint::start_endpoint_server(&config) {
        eprintln!("\n❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
