/// HTTP endpoint for querying the climate store
///
/// Provides a small read-only JSON API over the measurement table.
///
/// Endpoints:
/// - GET / - Available routes
/// - GET /api/v1.0/precipitation - Precipitation for the last 12 months
/// - GET /api/v1.0/stations - Station identifiers
/// - GET /api/v1.0/tobs - Temperatures at the most active station
/// - GET /api/v1.0/start/{start} - Daily temperature summaries from a date
/// - GET /api/v1.0/start&end/{start}/{end} - Daily summaries within a range

use crate::config::ServiceConfig;
use crate::dates::DateParseError;
use crate::db::{Store, StoreConfig, StoreError};
use crate::format;
use crate::model::{LAST_YEAR_START, MOST_ACTIVE_STATION};
use crate::queries::{self, DateBounds};
use log::{error, info, warn};
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;
use threadpool::ThreadPool;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Paths listed in 404 responses for unknown routes.
pub const AVAILABLE_ENDPOINTS: &[&str] = &[
    "/",
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/start/{start}",
    "/api/v1.0/start&end/{start}/{end}",
];

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("failed to start HTTP server on {address}: {reason}")]
    Bind { address: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid date: {0}")]
    Date(#[from] DateParseError),
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// A recognised request path. Path parameters are kept as received (after
/// percent-decoding); canonicalizing them is the handler's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Precipitation,
    Stations,
    Tobs,
    Start { start: String },
    StartEnd { start: String, end: String },
}

impl Route {
    /// Matches a request URL against the fixed route table.
    ///
    /// The query string and a single trailing `/` are ignored. Segments are
    /// percent-decoded before matching, so `start%26end` is the same route
    /// as `start&end`.
    pub fn parse(url: &str) -> Option<Route> {
        let path = url.split('?').next().unwrap_or_default();
        if path == "/" || path.is_empty() {
            return Some(Route::Home);
        }
        let path = path.strip_suffix('/').unwrap_or(path);

        let segments = path
            .split('/')
            .skip(1)
            .map(|segment| urlencoding::decode(segment).map(|s| s.into_owned()))
            .collect::<Result<Vec<String>, _>>()
            .ok()?;
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            ["api", "v1.0", "precipitation"] => Some(Route::Precipitation),
            ["api", "v1.0", "stations"] => Some(Route::Stations),
            ["api", "v1.0", "tobs"] => Some(Route::Tobs),
            ["api", "v1.0", "start", start] if !start.is_empty() => Some(Route::Start {
                start: start.to_string(),
            }),
            ["api", "v1.0", "start&end", start, end] if !start.is_empty() && !end.is_empty() => {
                Some(Route::StartEnd {
                    start: start.to_string(),
                    end: end.to_string(),
                })
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Html(String),
    Text(String),
}

/// Status and body of a handled request, before it is written to the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(status: u16, json: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(json),
        }
    }

    pub fn html(status: u16, html: String) -> Self {
        Self {
            status,
            body: ResponseBody::Html(html),
        }
    }

    /// Generic failure with no structured body.
    pub fn internal_error() -> Self {
        Self {
            status: 500,
            body: ResponseBody::Text("Internal Server Error".to_string()),
        }
    }

    /// The JSON body, if this is a JSON response.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Create HTTP response with the matching Content-Type
    pub fn into_http(self) -> Response<Cursor<Vec<u8>>> {
        let (content_type, bytes) = match self.body {
            ResponseBody::Json(json) => ("application/json", json.to_string().into_bytes()),
            ResponseBody::Html(html) => ("text/html; charset=utf-8", html.into_bytes()),
            ResponseBody::Text(text) => ("text/plain; charset=utf-8", text.into_bytes()),
        };

        let mut response = Response::from_data(bytes).with_status_code(StatusCode::from(self.status));
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
            response.add_header(header);
        }
        response
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Routes a request and runs its handler. Never fails: handler errors are
/// logged and become a bare 500.
pub fn dispatch(method: &Method, url: &str, store: &StoreConfig) -> ApiResponse {
    let Some(route) = Route::parse(url) else {
        return ApiResponse::json(
            404,
            json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS,
            }),
        );
    };

    if *method != Method::Get {
        return ApiResponse::json(405, json!({ "error": "method not allowed" }));
    }

    match handle(&route, store) {
        Ok(response) => response,
        Err(e) => {
            error!("{method} {url} failed: {e}");
            ApiResponse::internal_error()
        }
    }
}

/// Runs the handler for `route`. Each handler opens its own store
/// connection, which is closed before the response is built.
pub fn handle(route: &Route, store: &StoreConfig) -> Result<ApiResponse, EndpointError> {
    match route {
        Route::Home => Ok(ApiResponse::html(200, format::landing_page())),
        Route::Precipitation => handle_precipitation(store),
        Route::Stations => handle_stations(store),
        Route::Tobs => handle_tobs(store),
        Route::Start { start } => handle_summaries(store, start, None),
        Route::StartEnd { start, end } => handle_summaries(store, start, Some(end.as_str())),
    }
}

/// Handle /api/v1.0/precipitation
fn handle_precipitation(config: &StoreConfig) -> Result<ApiResponse, EndpointError> {
    let rows = {
        let store = Store::open(config)?;
        queries::measurements_since(&store, LAST_YEAR_START)?
    };
    Ok(ApiResponse::json(200, format::precipitation_json(&rows)))
}

/// Handle /api/v1.0/stations
fn handle_stations(config: &StoreConfig) -> Result<ApiResponse, EndpointError> {
    let stations = {
        let store = Store::open(config)?;
        queries::distinct_stations(&store)?
    };
    Ok(ApiResponse::json(200, format::stations_json(stations)))
}

/// Handle /api/v1.0/tobs
fn handle_tobs(config: &StoreConfig) -> Result<ApiResponse, EndpointError> {
    let rows = {
        let store = Store::open(config)?;
        queries::station_measurements_since(&store, MOST_ACTIVE_STATION, LAST_YEAR_START)?
    };
    Ok(ApiResponse::json(200, format::observations_json(&rows)))
}

/// Handle /api/v1.0/start/{start} and /api/v1.0/start&end/{start}/{end}
///
/// The grouped aggregate is fetched for every date and filtered here. A
/// malformed date is an error (500), not a 404.
fn handle_summaries(
    config: &StoreConfig,
    start: &str,
    end: Option<&str>,
) -> Result<ApiResponse, EndpointError> {
    let summaries = {
        let store = Store::open(config)?;
        queries::daily_temperature_summaries(&store)?
    };

    let bounds = DateBounds::parse(start, end)?;
    let matched = queries::summaries_in_range(summaries, &bounds)?;

    if matched.is_empty() {
        return Ok(ApiResponse::json(404, format::not_found_json(start)));
    }
    Ok(ApiResponse::json(200, format::summaries_json(&matched)))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server and serve requests until the listener closes.
pub fn start_endpoint_server(config: &ServiceConfig) -> Result<(), EndpointError> {
    let address = config.listen_address();
    let server = Server::http(&address).map_err(|e| EndpointError::Bind {
        address: address.clone(),
        reason: e.to_string(),
    })?;

    println!("📡 HTTP endpoint listening on http://{}", address);
    for path in AVAILABLE_ENDPOINTS {
        println!("   GET {}", path);
    }
    println!();

    serve(server, config.store_config(), config.workers);
    Ok(())
}

/// Accepts requests on `server` and hands each one to a worker thread.
pub fn serve(server: Server, store: StoreConfig, workers: usize) {
    let pool = ThreadPool::new(workers.max(1));
    let store = Arc::new(store);

    for request in server.incoming_requests() {
        let store = Arc::clone(&store);
        pool.execute(move || respond(request, &store));
    }

    pool.join();
}

fn respond(request: Request, store: &StoreConfig) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let response = dispatch(&method, &url, store);
    if response.status >= 500 {
        warn!("{} {} -> {}", method, url, response.status);
    } else {
        info!("{} {} -> {}", method, url, response.status);
    }

    if let Err(e) = request.respond(response.into_http()) {
        error!("Failed to send response: {}", e);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
