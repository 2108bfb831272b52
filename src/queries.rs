/// Query layer: the fixed query shapes the endpoints run.
///
/// Every function takes an open `Store` and returns typed rows in the order
/// SQLite produces them; no ordering is imposed beyond what the SQL asks for.
/// Date filters in SQL compare the stored `YYYY-MM-DD` text directly, the
/// same comparison the original dataset queries rely on.

use crate::dates::{DateParseError, canonicalize};
use crate::db::{Store, StoreError};
use crate::model::{DailyTemperatureSummary, Measurement, StoreOverview};
use chrono::NaiveDate;
use rusqlite::Row;

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn measurement_from_row(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    Ok(Measurement {
        station: row.get("station")?,
        date: row.get("date")?,
        prcp: row.get("prcp")?,
        tobs: row.get("tobs")?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<DailyTemperatureSummary> {
    Ok(DailyTemperatureSummary {
        date: row.get("date")?,
        avg_temp: row.get("avg_temp")?,
        max_temp: row.get("max_temp")?,
        min_temp: row.get("min_temp")?,
    })
}

// ---------------------------------------------------------------------------
// Raw measurement queries
// ---------------------------------------------------------------------------

/// All measurements recorded on or after `since`.
pub fn measurements_since(store: &Store, since: &str) -> Result<Vec<Measurement>, StoreError> {
    let mut stmt = store.connection().prepare(
        "SELECT station, date, prcp, tobs
         FROM measurement
         WHERE date >= ?1",
    )?;
    let rows = stmt.query_map([since], measurement_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Measurements from a single station recorded on or after `since`.
pub fn station_measurements_since(
    store: &Store,
    station: &str,
    since: &str,
) -> Result<Vec<Measurement>, StoreError> {
    let mut stmt = store.connection().prepare(
        "SELECT station, date, prcp, tobs
         FROM measurement
         WHERE date >= ?1 AND station = ?2",
    )?;
    let rows = stmt.query_map([since, station], measurement_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Every station identifier that appears in the measurement table, once.
pub fn distinct_stations(store: &Store) -> Result<Vec<String>, StoreError> {
    let mut stmt = store
        .connection()
        .prepare("SELECT DISTINCT station FROM measurement")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Average, maximum and minimum observed temperature per date, across every
/// date in the store.
pub fn daily_temperature_summaries(store: &Store) -> Result<Vec<DailyTemperatureSummary>, StoreError> {
    let mut stmt = store.connection().prepare(
        "SELECT date,
                AVG(tobs) AS avg_temp,
                MAX(tobs) AS max_temp,
                MIN(tobs) AS min_temp
         FROM measurement
         GROUP BY date",
    )?;
    let rows = stmt.query_map([], summary_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Inclusive calendar bounds; `end: None` means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateBounds {
    /// Canonicalizes the raw bounds. `start` is parsed first, so a request
    /// with two bad dates reports the `start` failure.
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, DateParseError> {
        let start = canonicalize(start)?;
        let end = end.map(canonicalize).transpose()?;
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }
}

/// Keeps the summaries whose canonicalized date falls inside `bounds`,
/// preserving their order. A stored date that fails to canonicalize is an
/// error rather than a silent exclusion.
pub fn summaries_in_range(
    summaries: Vec<DailyTemperatureSummary>,
    bounds: &DateBounds,
) -> Result<Vec<DailyTemperatureSummary>, DateParseError> {
    let mut matched = Vec::new();
    for summary in summaries {
        if bounds.contains(canonicalize(&summary.date)?) {
            matched.push(summary);
        }
    }
    Ok(matched)
}

// ---------------------------------------------------------------------------
// Store overview
// ---------------------------------------------------------------------------

/// Row counts and date coverage, used by the `check_store` tool.
pub fn store_overview(store: &Store) -> Result<StoreOverview, StoreError> {
    let conn = store.connection();

    let (measurement_rows, distinct_stations, first_date, last_date): (i64, i64, Option<String>, Option<String>) = conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT station), MIN(date), MAX(date) FROM measurement",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    let station_rows: i64 = conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;

    Ok(StoreOverview {
        measurement_rows,
        station_rows,
        distinct_stations,
        first_date,
        last_date,
    })
}
