//! Store Check
//!
//! Verifies that the configured SQLite store is usable by the service and
//! prints its row counts and date coverage.
//!
//! Usage:
//!   cargo run --bin check_store
//!   cargo run --bin check_store -- path/to/hawaii.sqlite
//!
//! Environment:
//!   CLIMATE_DB_PATH - store path when none is given on the command line

use climate_service::config::ServiceConfig;
use climate_service::db::{self, StoreConfig};
use climate_service::queries;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("🔎 Climate Store Check");
    println!("======================\n");

    let store_config = match env::args().nth(1) {
        Some(path) => StoreConfig::new(path),
        None => ServiceConfig::load(None)?.store_config(),
    };

    println!("📊 Opening {}...", store_config.path.display());
    let store = db::open_and_verify(&store_config).unwrap_or_else(|e| {
        eprintln!("\n❌ {}\n", e);
        std::process::exit(1);
    });
    println!("✓ measurement and station tables present\n");

    let overview = queries::store_overview(&store)?;
    println!("Measurements:      {}", overview.measurement_rows);
    println!("Stations (table):  {}", overview.station_rows);
    println!("Stations reporting: {}", overview.distinct_stations);
    match (&overview.first_date, &overview.last_date) {
        (Some(first), Some(last)) => println!("Date coverage:     {} to {}", first, last),
        _ => println!("Date coverage:     (no measurements)"),
    }

    let summaries = queries::daily_temperature_summaries(&store)?;
    println!("Distinct dates:    {}", summaries.len());

    Ok(())
}
