/// climate_service: read-only HTTP API over the Hawaii climate dataset.
///
/// # Module structure
///
/// ```text
/// climate_service
/// ├── model     — record types (Measurement, Station, DailyTemperatureSummary, …)
/// ├── dates     — YYYY-MM-DD canonicalization into calendar dates
/// ├── config    — service settings (climate_service.toml, .env, CLIMATE_* vars)
/// ├── db        — read-only SQLite store handle and schema checks
/// ├── queries   — the fixed query shapes and date-range filtering
/// ├── format    — JSON response shapes
/// ├── endpoint  — route parsing, handlers and the HTTP server
/// └── fixtures  — sample store for local runs and tests
/// ```

// Public modules
pub mod config;
pub mod dates;
pub mod db;
pub mod endpoint;
pub mod fixtures;
pub mod format;
pub mod model;
pub mod queries;
