/// Response formatting: reshapes query results into JSON bodies.

use crate::model::{DailyTemperatureSummary, Measurement};
use serde::Serialize;
use serde_json::{Map, Value, json};

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// One entry of the tobs listing.
#[derive(Debug, Serialize)]
pub struct TemperatureObservation<'a> {
    pub date: &'a str,
    pub tobs: f64,
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

/// `[{date: prcp}, ...]`, one single-key object per row.
///
/// Rows are not merged: two stations reporting on the same date produce two
/// objects with the same key.
pub fn precipitation_json(rows: &[Measurement]) -> Value {
    let entries = rows
        .iter()
        .map(|m| {
            let mut entry = Map::with_capacity(1);
            entry.insert(m.date.clone(), json!(m.prcp));
            Value::Object(entry)
        })
        .collect();
    Value::Array(entries)
}

/// Flat list of station identifiers.
pub fn stations_json(stations: Vec<String>) -> Value {
    Value::Array(stations.into_iter().map(Value::String).collect())
}

/// `[{"date": ..., "tobs": ...}, ...]`
pub fn observations_json(rows: &[Measurement]) -> Value {
    let observations: Vec<TemperatureObservation<'_>> = rows
        .iter()
        .map(|m| TemperatureObservation {
            date: &m.date,
            tobs: m.tobs,
        })
        .collect();
    json!(observations)
}

/// `[{"date", "avg temp", "max temp", "min temp"}, ...]`
pub fn summaries_json(summaries: &[DailyTemperatureSummary]) -> Value {
    json!(summaries)
}

/// Body returned when no aggregate row matched. Always names `start`, even
/// when the `end` bound is what excluded every row.
pub fn not_found_json(start: &str) -> Value {
    json!({ "error": format!("data for {start} not found.") })
}

/// Static help text served at `/`.
pub fn landing_page() -> String {
    [
        "Available Routes:",
        "/api/v1.0/precipitation",
        "/api/v1.0/stations",
        "/api/v1.0/tobs",
        "/api/v1.0/start/<start>",
        "/api/v1.0/start&end/<start>/<end>",
    ]
    .iter()
    .map(|line| format!("{line}<br/>"))
    .collect()
}
