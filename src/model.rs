/// Shared record types for the climate observation store.
///
/// Each stored table gets an explicit, statically declared record type.
/// Rows are mapped by column name in `queries`, so the column order of the
/// underlying SQLite file does not matter.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fixed query parameters
// ---------------------------------------------------------------------------

/// First date of the "last 12 months" window of the dataset.
pub const LAST_YEAR_START: &str = "2016-08-23";

/// Station with the most observations in the dataset.
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// Table names the service reads from.
pub const MEASUREMENT_TABLE: &str = "measurement";
pub const STATION_TABLE: &str = "station";

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// One weather observation: a row of the `measurement` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Station identifier, e.g. "USC00519281".
    pub station: String,
    /// Observation date as stored (`YYYY-MM-DD` text, not a native date).
    pub date: String,
    /// Precipitation in inches. NULL when the station did not report.
    pub prcp: Option<f64>,
    /// Observed temperature in degrees Fahrenheit.
    pub tobs: f64,
}

/// Metadata for one observing site: a row of the `station` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

// ---------------------------------------------------------------------------
// Derived rows
// ---------------------------------------------------------------------------

/// One aggregate row: temperature statistics over every observation
/// recorded on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperatureSummary {
    pub date: String,
    #[serde(rename = "avg temp")]
    pub avg_temp: f64,
    #[serde(rename = "max temp")]
    pub max_temp: f64,
    #[serde(rename = "min temp")]
    pub min_temp: f64,
}

/// Row counts and date coverage of a store, reported by `check_store`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreOverview {
    pub measurement_rows: i64,
    pub station_rows: i64,
    pub distinct_stations: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}
