//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Resolve `ConnectionSettings` into a concrete SQLite target.
//! - Configure connection pragmas required by cascade deletes.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Credentials from settings are never written to logs.

use super::DbResult;
use crate::config::{ConnectionSettings, DatabaseTarget};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file, creating it when missing.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_logged("file", || Connection::open(path))
}

/// Opens a private in-memory SQLite database.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_logged("memory", Connection::open_in_memory)
}

/// Opens the database described by `settings`.
///
/// `user` and `password` are accepted for compatibility with server-style
/// settings files; the embedded engine does not use them.
///
/// # Errors
/// - `DbError::InvalidSettings` when `dbname` is empty.
/// - `DbError::Sqlite` when the file cannot be opened or configured.
pub fn open_with_settings(settings: &ConnectionSettings) -> DbResult<Connection> {
    let target = settings.target()?;
    if settings.has_credentials() {
        debug!("event=db_open module=db status=note credentials=ignored");
    }

    match target {
        DatabaseTarget::Memory => open_db_in_memory(),
        DatabaseTarget::File(path) => open_db(path),
    }
}

fn open_logged(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match configure_connection(&conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
