//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by store behavior.
//! - Run the schema guard before handing out a bootstrap connection.
//!
//! # Invariants
//! - `open_db`/`open_db_in_memory` return connections with the schema ensured.
//! - `connect` never touches the schema; it is the per-operation entry point.
//! - Every returned connection has the `lower_unicode(text)` SQL function.

use super::migrations::ensure_schema;
use super::DbResult;
use log::{debug, error, info};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and ensures the contact schema.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let mut conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=file duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an in-memory SQLite database and ensures the contact schema.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");

    let mut conn = Connection::open_in_memory()?;
    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode=memory duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=memory duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a short-lived connection for a single store operation.
///
/// Assumes `ensure_schema` already ran against the same file.
pub fn connect(path: impl AsRef<Path>) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    debug!("event=db_connect module=db status=ok");
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    configure(conn)?;
    ensure_schema(conn)?;
    Ok(())
}

fn configure(conn: &Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_lower_unicode(conn)?;
    Ok(())
}

// SQLite's built-in lower() and LIKE only fold ASCII.
fn register_lower_unicode(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        "lower_unicode",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::open_db_in_memory;

    #[test]
    fn lower_unicode_folds_accented_capitals_and_keeps_null() {
        let conn = open_db_in_memory().unwrap();

        let folded: String = conn
            .query_row("SELECT lower_unicode('ÁNGEL Ñú');", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "ángel ñú");

        let null: Option<String> = conn
            .query_row("SELECT lower_unicode(NULL);", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
