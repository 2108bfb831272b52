/// Sample climate store for local development and tests.
///
/// Writes a small dataset using the same schema as the production
/// `hawaii.sqlite` file: an autoincrement `id` column plus the fields the
/// service reads. Rows span both sides of the 2016-08-23 window boundary,
/// include NULL precipitation, and put several stations on the same dates so
/// the grouped aggregates have something to average.

use crate::db::StoreError;
use crate::model::{Measurement, Station};
use rusqlite::{Connection, params};
use std::path::Path;

/// (station, date, prcp, tobs)
pub const SAMPLE_MEASUREMENTS: &[(&str, &str, Option<f64>, f64)] = &[
    ("USC00519397", "2010-01-01", Some(0.08), 65.0),
    ("USC00519397", "2016-08-22", Some(0.0), 79.0),
    ("USC00519397", "2016-08-23", Some(0.0), 81.0),
    ("USC00519397", "2016-08-24", Some(0.08), 79.0),
    ("USC00519397", "2017-01-01", Some(0.0), 72.0),
    ("USC00519397", "2017-01-02", Some(0.0), 70.0),
    ("USC00519397", "2017-08-23", Some(0.0), 81.0),
    ("USC00519281", "2016-08-22", Some(0.4), 76.0),
    ("USC00519281", "2016-08-23", Some(1.79), 77.0),
    ("USC00519281", "2016-08-24", Some(2.15), 77.0),
    ("USC00519281", "2017-01-01", Some(0.03), 72.0),
    ("USC00519281", "2017-01-02", Some(0.01), 65.0),
    ("USC00519281", "2017-08-18", Some(0.06), 79.0),
    ("USC00516128", "2010-01-01", Some(0.28), 63.0),
    ("USC00516128", "2016-08-23", Some(0.7), 74.0),
    ("USC00516128", "2016-08-24", None, 74.0),
    ("USC00516128", "2017-01-01", None, 68.0),
    ("USC00516128", "2017-01-02", Some(0.0), 68.0),
    ("USC00516128", "2017-08-23", Some(0.45), 76.0),
];

/// (station, name, latitude, longitude, elevation)
pub const SAMPLE_STATIONS: &[(&str, &str, f64, f64, f64)] = &[
    ("USC00519397", "WAIKIKI 717.2, HI US", 21.2716, -157.8168, 3.0),
    ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
    ("USC00516128", "MANOA LYON ARBO 785.2, HI US", 21.3331, -157.8025, 152.4),
];

const SCHEMA: &str = "
    CREATE TABLE measurement (
        id INTEGER NOT NULL PRIMARY KEY,
        station TEXT,
        date TEXT,
        prcp FLOAT,
        tobs FLOAT
    );
    CREATE TABLE station (
        id INTEGER NOT NULL PRIMARY KEY,
        station TEXT,
        name TEXT,
        latitude FLOAT,
        longitude FLOAT,
        elevation FLOAT
    );
";

/// The sample measurements as typed records, in insertion order.
pub fn sample_measurements() -> Vec<Measurement> {
    SAMPLE_MEASUREMENTS
        .iter()
        .map(|(station, date, prcp, tobs)| Measurement {
            station: station.to_string(),
            date: date.to_string(),
            prcp: *prcp,
            tobs: *tobs,
        })
        .collect()
}

/// The sample stations as typed records.
pub fn sample_stations() -> Vec<Station> {
    SAMPLE_STATIONS
        .iter()
        .map(|(station, name, latitude, longitude, elevation)| Station {
            station: station.to_string(),
            name: name.to_string(),
            latitude: *latitude,
            longitude: *longitude,
            elevation: *elevation,
        })
        .collect()
}

/// Creates a new SQLite file at `path` holding the sample dataset.
///
/// Fails if the tables already exist, so an existing store is never
/// appended to. Returns the number of measurement rows written.
pub fn seed_sample_store(path: &Path) -> Result<usize, StoreError> {
    let mut conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for m in sample_measurements() {
            insert.execute(params![m.station, m.date, m.prcp, m.tobs])?;
        }

        let mut insert = tx.prepare(
            "INSERT INTO station (station, name, latitude, longitude, elevation)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for s in sample_stations() {
            insert.execute(params![s.station, s.name, s.latitude, s.longitude, s.elevation])?;
        }
    }
    tx.commit()?;

    Ok(SAMPLE_MEASUREMENTS.len())
}
