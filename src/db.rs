/// Store access: opening the SQLite file and checking its schema
///
/// The service never holds a long-lived connection. Handlers open a `Store`
/// at the start of a request and drop it at the end; the connection is
/// closed when the `Store` goes out of scope.

use crate::model::{MEASUREMENT_TABLE, STATION_TABLE};
use log::debug;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store errors, with remediation hints in their messages.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(
        "database file '{}' does not exist.\n\n  \
         Set CLIMATE_DB_PATH (or pass --database PATH) to the location of hawaii.sqlite.\n  \
         For a local sample store run: cargo run --bin seed_sample_store -- {}",
        .0.display(), .0.display()
    )]
    MissingDatabase(PathBuf),

    #[error("failed to open database '{}': {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    #[error(
        "required table '{0}' does not exist.\n\n  \
         The store must contain the 'measurement' and 'station' tables of the climate dataset."
    )]
    MissingTable(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where the store lives. The only state shared between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

// ---------------------------------------------------------------------------
// Store handle
// ---------------------------------------------------------------------------

/// A read-only connection to the climate store, scoped to one request.
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Opens the store read-only. A missing file is reported as
    /// `MissingDatabase` rather than letting SQLite fail with a bare
    /// "unable to open database file".
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.path.as_path();
        if !path.is_file() {
            return Err(StoreError::MissingDatabase(path.to_path_buf()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| {
            StoreError::OpenFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!("opened store {}", path.display());
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        debug!("closing store {}", self.path.display());
    }
}

// ---------------------------------------------------------------------------
// Schema checks
// ---------------------------------------------------------------------------

/// Returns true when `table` exists in the store.
pub fn table_exists(store: &Store, table: &str) -> Result<bool, StoreError> {
    let exists: bool = store.connection().query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Verify both tables the service reads from are present.
pub fn verify_schema(store: &Store) -> Result<(), StoreError> {
    for table in [MEASUREMENT_TABLE, STATION_TABLE] {
        if !table_exists(store, table)? {
            return Err(StoreError::MissingTable(table.to_string()));
        }
    }
    Ok(())
}

/// Open the store and verify its schema in one step (startup and tooling).
pub fn open_and_verify(config: &StoreConfig) -> Result<Store, StoreError> {
    let store = Store::open(config)?;
    verify_schema(&store)?;
    Ok(store)
}
