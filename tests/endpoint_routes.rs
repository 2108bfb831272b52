/// Integration tests for the HTTP routes
///
/// These tests drive `endpoint::dispatch` against a freshly seeded sample
/// store in a temporary directory. No listener or network is involved; the
/// responses are checked exactly as they would be written to the wire.
///
/// Run with: cargo test --test endpoint_routes

use climate_service::dates::canonicalize;
use climate_service::db::{Store, StoreConfig};
use climate_service::endpoint::{ApiResponse, ResponseBody, dispatch};
use climate_service::fixtures::{SAMPLE_MEASUREMENTS, seed_sample_store};
use climate_service::model::{LAST_YEAR_START, MOST_ACTIVE_STATION};
use rusqlite::Connection;
use serde_json::{Value, json};
use std::collections::HashSet;
use tempfile::TempDir;
use tiny_http::Method;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn setup_store() -> (TempDir, StoreConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("hawaii.sqlite");
    seed_sample_store(&path).expect("sample store should seed");
    (dir, StoreConfig::new(path))
}

fn get(config: &StoreConfig, url: &str) -> ApiResponse {
    dispatch(&Method::Get, url, config)
}

fn get_json(config: &StoreConfig, url: &str) -> (u16, Value) {
    let response = get(config, url);
    let body = response
        .json_body()
        .cloned()
        .unwrap_or_else(|| panic!("{url} should return JSON, got {:?}", response.body));
    (response.status, body)
}

fn entries(body: &Value) -> &Vec<Value> {
    body.as_array().expect("body should be a JSON array")
}

// ---------------------------------------------------------------------------
// 1. Landing page
// ---------------------------------------------------------------------------

#[test]
fn test_root_lists_routes_as_html() {
    let (_dir, config) = setup_store();
    let response = get(&config, "/");

    assert_eq!(response.status, 200);
    match response.body {
        ResponseBody::Html(page) => {
            assert!(page.contains("/api/v1.0/precipitation<br/>"));
            assert!(page.contains("/api/v1.0/start&end/<start>/<end><br/>"));
        }
        other => panic!("expected HTML, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// 2. Precipitation
// ---------------------------------------------------------------------------

#[test]
fn test_precipitation_length_matches_rows_in_window() {
    let (_dir, config) = setup_store();
    let (status, body) = get_json(&config, "/api/v1.0/precipitation");

    let expected = SAMPLE_MEASUREMENTS
        .iter()
        .filter(|(_, date, _, _)| *date >= LAST_YEAR_START)
        .count();
    assert_eq!(status, 200);
    assert_eq!(entries(&body).len(), expected);

    // Calling again against unchanged data gives the same count.
    let (_, again) = get_json(&config, "/api/v1.0/precipitation");
    assert_eq!(entries(&again).len(), expected);
}

#[test]
fn test_precipitation_entries_are_single_key_maps() {
    let (_dir, config) = setup_store();
    let (_, body) = get_json(&config, "/api/v1.0/precipitation");

    for entry in entries(&body) {
        let map = entry.as_object().expect("entry should be an object");
        assert_eq!(map.len(), 1);
        let date = map.keys().next().unwrap();
        assert!(date.as_str() >= LAST_YEAR_START);
    }

    // Three stations reported on 2016-08-23: three separate entries.
    let same_day = entries(&body)
        .iter()
        .filter(|e| e.get("2016-08-23").is_some())
        .count();
    assert_eq!(same_day, 3);
}

#[test]
fn test_precipitation_null_is_preserved() {
    let (_dir, config) = setup_store();
    let (_, body) = get_json(&config, "/api/v1.0/precipitation");

    assert!(entries(&body).contains(&json!({ "2016-08-24": null })));
}

// ---------------------------------------------------------------------------
// 3. Stations
// ---------------------------------------------------------------------------

#[test]
fn test_stations_are_distinct_and_complete() {
    let (_dir, config) = setup_store();
    let (status, body) = get_json(&config, "/api/v1.0/stations");
    assert_eq!(status, 200);

    let listed: Vec<&str> = entries(&body).iter().map(|v| v.as_str().unwrap()).collect();
    let unique: HashSet<&str> = listed.iter().copied().collect();
    assert_eq!(unique.len(), listed.len(), "station list has duplicates");

    let expected: HashSet<&str> = SAMPLE_MEASUREMENTS.iter().map(|(s, _, _, _)| *s).collect();
    assert_eq!(unique, expected);
}

// ---------------------------------------------------------------------------
// 4. Temperature observations
// ---------------------------------------------------------------------------

#[test]
fn test_tobs_only_most_active_station_in_window() {
    let (_dir, config) = setup_store();
    let (status, body) = get_json(&config, "/api/v1.0/tobs");
    assert_eq!(status, 200);

    let expected: Vec<Value> = SAMPLE_MEASUREMENTS
        .iter()
        .filter(|(s, d, _, _)| *s == MOST_ACTIVE_STATION && *d >= LAST_YEAR_START)
        .map(|(_, d, _, t)| json!({ "date": d, "tobs": t }))
        .collect();

    assert_eq!(entries(&body), &expected);
}

// ---------------------------------------------------------------------------
// 5. Start-date aggregates
// ---------------------------------------------------------------------------

#[test]
fn test_start_is_idempotent() {
    let (_dir, config) = setup_store();
    let first = get(&config, "/api/v1.0/start/2017-01-01");
    let second = get(&config, "/api/v1.0/start/2017-01-01");

    assert_eq!(first.status, 200);
    assert_eq!(first, second);
}

#[test]
fn test_start_rows_all_on_or_after_start() {
    let (_dir, config) = setup_store();
    let (_, body) = get_json(&config, "/api/v1.0/start/2017-01-01");

    let start = canonicalize("2017-01-01").unwrap();
    let dates: Vec<&str> = entries(&body)
        .iter()
        .map(|e| e["date"].as_str().unwrap())
        .collect();
    assert!(dates.iter().all(|d| canonicalize(d).unwrap() >= start));
    assert_eq!(dates.len(), 4, "2017-01-01, 01-02, 08-18 and 08-23");
}

#[test]
fn test_start_results_are_monotonic() {
    let (_dir, config) = setup_store();
    let starts = ["2010-01-01", "2016-08-23", "2016-08-24", "2017-01-01", "2017-08-23"];

    let mut previous: Option<HashSet<String>> = None;
    for start in starts {
        let (_, body) = get_json(&config, &format!("/api/v1.0/start/{start}"));
        let dates: HashSet<String> = entries(&body)
            .iter()
            .map(|e| e["date"].as_str().unwrap().to_string())
            .collect();
        if let Some(earlier) = &previous {
            assert!(
                earlier.is_superset(&dates),
                "results for an earlier start must include those for {start}"
            );
        }
        previous = Some(dates);
    }
}

#[test]
fn test_start_beyond_data_is_not_found() {
    let (_dir, config) = setup_store();
    let (status, body) = get_json(&config, "/api/v1.0/start/9999-01-01");

    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "data for 9999-01-01 not found." }));
}

#[test]
fn test_start_malformed_date_is_not_treated_as_missing_data() {
    let (_dir, config) = setup_store();
    let response = get(&config, "/api/v1.0/start/not-a-date");

    assert_ne!(response.status, 404);
    assert_eq!(response.status, 500);
    assert!(response.json_body().is_none(), "500 carries no structured body");
}

#[test]
fn test_start_year_past_9999_is_not_treated_as_missing_data() {
    let (_dir, config) = setup_store();
    let response = get(&config, "/api/v1.0/start/10000-01-01");

    assert_eq!(response.status, 500);
    assert_ne!(
        response.json_body(),
        Some(&json!({ "error": "data for 10000-01-01 not found." }))
    );
}

// ---------------------------------------------------------------------------
// 6. Start/end aggregates
// ---------------------------------------------------------------------------

#[test]
fn test_start_end_range_matches_store_aggregates() {
    let (_dir, config) = setup_store();
    let (status, body) = get_json(&config, "/api/v1.0/start&end/2017-01-01/2017-01-02");
    assert_eq!(status, 200);

    // Recompute the aggregates directly in SQL for comparison.
    let store = Store::open(&config).unwrap();
    let conn: &Connection = store.connection();

    let rows = entries(&body);
    assert_eq!(rows.len(), 2);
    for row in rows {
        let date = row["date"].as_str().unwrap();
        assert!(date == "2017-01-01" || date == "2017-01-02");

        let (avg, max, min): (f64, f64, f64) = conn
            .query_row(
                "SELECT AVG(tobs), MAX(tobs), MIN(tobs) FROM measurement WHERE date = ?1",
                [date],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert!((row["avg temp"].as_f64().unwrap() - avg).abs() < 1e-9);
        assert_eq!(row["max temp"].as_f64().unwrap(), max);
        assert_eq!(row["min temp"].as_f64().unwrap(), min);
    }
}

#[test]
fn test_start_end_encoded_ampersand_routes_the_same() {
    let (_dir, config) = setup_store();
    let literal = get(&config, "/api/v1.0/start&end/2017-01-01/2017-01-02");
    let encoded = get(&config, "/api/v1.0/start%26end/2017-01-01/2017-01-02");
    assert_eq!(literal, encoded);
}

#[test]
fn test_start_end_empty_range_blames_start() {
    let (_dir, config) = setup_store();
    // 2016-09-01..2016-12-31 holds no observations in the sample data.
    let (status, body) = get_json(&config, "/api/v1.0/start&end/2016-09-01/2016-12-31");

    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "data for 2016-09-01 not found." }));
}

#[test]
fn test_start_end_malformed_start_is_internal_error() {
    let (_dir, config) = setup_store();
    let response = get(&config, "/api/v1.0/start&end/2017-1/2017-01-02");
    assert_eq!(response, ApiResponse::internal_error());
}

#[test]
fn test_start_end_year_past_9999_is_internal_error() {
    let (_dir, config) = setup_store();
    let response = get(&config, "/api/v1.0/start&end/2017-01-01/10000-01-01");
    assert_eq!(response, ApiResponse::internal_error());
}
