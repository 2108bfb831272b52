//! Sample Store Seeder
//!
//! Writes a small sample climate store with the production schema, for
//! running the service locally without the full dataset.
//!
//! Usage:
//!   cargo run --bin seed_sample_store -- Resources/hawaii.sqlite

use climate_service::fixtures::seed_sample_store;
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Some(path) = env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: seed_sample_store PATH");
        std::process::exit(1);
    };

    if path.exists() {
        eprintln!("❌ {} already exists; refusing to overwrite it", path.display());
        std::process::exit(1);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let rows = seed_sample_store(&path)?;
    println!("✓ Wrote {} measurements to {}", rows, path.display());
    Ok(())
}
