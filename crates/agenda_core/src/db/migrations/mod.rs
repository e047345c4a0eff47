//! Contact table schema guard and legacy repair.
//!
//! # Responsibility
//! - Create the `contactos` table when the database is new.
//! - Repair legacy tables that carry obsolete columns or a required email
//!   column (copy, drop, rename).
//! - Mirror the applied schema version to `PRAGMA user_version`.
//!
//! # Invariants
//! - `ensure_schema` is idempotent: a second call is a no-op.
//! - A failed legacy copy never aborts the repair; the legacy table is kept
//!   aside as `contactos_legacy*` and a fresh table takes its name.

use crate::db::{DbError, DbResult};
use log::{info, warn};
use rusqlite::{Connection, Transaction};
use std::time::Instant;

/// Latest schema version known by this binary.
pub const SCHEMA_VERSION: u32 = 1;
/// Name of the persisted contact table.
pub const CONTACT_TABLE: &str = "contactos";

const CONTACT_COLUMNS: &[&str] = &["email", "id", "nombre", "telefono"];
const STAGING_TABLE: &str = "contactos_new";
const LEGACY_TABLE_PREFIX: &str = "contactos_legacy";

const CREATE_CONTACTS_SQL: &str = include_str!("0001_contactos.sql");
const CREATE_STAGING_SQL: &str = include_str!("0001_contactos_staging.sql");
const COPY_LEGACY_SQL: &str = "INSERT INTO contactos_new (id, nombre, telefono, email)
     SELECT id, nombre, telefono, email FROM contactos;";

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnInfo {
    name: String,
    not_null: bool,
}

/// Outcome of one `ensure_schema` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaReport {
    /// The table did not exist and was created empty.
    Created,
    /// The table already had the current shape.
    UpToDate,
    /// A legacy table was rebuilt and its rows carried over.
    Migrated { copied_rows: usize },
    /// A legacy table could not be copied; it was set aside under
    /// `preserved_as` and an empty table took its place.
    MigratedWithWarning {
        reason: String,
        preserved_as: String,
    },
}

impl SchemaReport {
    fn outcome(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::UpToDate => "up_to_date",
            Self::Migrated { .. } => "migrated",
            Self::MigratedWithWarning { .. } => "migrated_with_warning",
        }
    }
}

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_VERSION
}

/// Guarantees the `contactos` table exists with `(id, nombre, telefono, email)`.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   binary.
/// - `DbError::Sqlite` for storage-engine failures outside the legacy copy.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<SchemaReport> {
    let started_at = Instant::now();
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let columns = table_columns(conn, CONTACT_TABLE)?;
    let report = if columns.is_empty() {
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_CONTACTS_SQL)?;
        stamp_version(&tx)?;
        tx.commit()?;
        SchemaReport::Created
    } else if has_current_shape(&columns) {
        if current_version < latest {
            let tx = conn.transaction()?;
            stamp_version(&tx)?;
            tx.commit()?;
        }
        SchemaReport::UpToDate
    } else {
        repair_legacy_table(conn, &columns)?
    };

    info!(
        "event=schema_ensure module=db status=ok outcome={} version={} duration_ms={}",
        report.outcome(),
        latest,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

fn repair_legacy_table(conn: &mut Connection, columns: &[ColumnInfo]) -> DbResult<SchemaReport> {
    info!(
        "event=schema_migrate module=db status=start from_columns={}",
        columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    );

    let mut tx = conn.transaction()?;
    tx.execute_batch(&format!("DROP TABLE IF EXISTS {STAGING_TABLE};"))?;
    tx.execute_batch(CREATE_STAGING_SQL)?;

    let copied = {
        let savepoint = tx.savepoint()?;
        // Savepoint rolls back on drop when the copy fails.
        savepoint
            .execute(COPY_LEGACY_SQL, [])
            .and_then(|rows| savepoint.commit().map(|()| rows))
    };

    let report = match copied {
        Ok(copied_rows) => {
            tx.execute_batch(&format!("DROP TABLE {CONTACT_TABLE};"))?;
            SchemaReport::Migrated { copied_rows }
        }
        Err(err) => {
            let preserved_as = free_legacy_name(&tx)?;
            warn!(
                "event=schema_migrate module=db status=warn error_code=legacy_copy_failed preserved_as={} error={}",
                preserved_as, err
            );
            tx.execute_batch(&format!(
                "ALTER TABLE {CONTACT_TABLE} RENAME TO {preserved_as};"
            ))?;
            SchemaReport::MigratedWithWarning {
                reason: err.to_string(),
                preserved_as,
            }
        }
    };

    tx.execute_batch(&format!(
        "ALTER TABLE {STAGING_TABLE} RENAME TO {CONTACT_TABLE};"
    ))?;
    stamp_version(&tx)?;
    tx.commit()?;

    Ok(report)
}

fn free_legacy_name(tx: &Transaction<'_>) -> DbResult<String> {
    let mut candidate = LEGACY_TABLE_PREFIX.to_string();
    let mut suffix = 1_u32;
    while table_exists(tx, &candidate)? {
        suffix += 1;
        candidate = format!("{LEGACY_TABLE_PREFIX}_{suffix}");
    }
    Ok(candidate)
}

// Current shape: exactly the four known columns, with `email` nullable.
fn has_current_shape(columns: &[ColumnInfo]) -> bool {
    let mut normalized = columns
        .iter()
        .map(|column| column.name.to_ascii_lowercase())
        .collect::<Vec<_>>();
    normalized.sort();
    let email_nullable = columns
        .iter()
        .any(|column| column.name.eq_ignore_ascii_case("email") && !column.not_null);

    email_nullable && normalized.iter().map(String::as_str).eq(CONTACT_COLUMNS.iter().copied())
}

fn table_exists(conn: &Connection, table_name: &str) -> DbResult<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table_name],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table_name: &str) -> DbResult<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare("SELECT name, \"notnull\" FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table_name], |row| {
            Ok(ColumnInfo {
                name: row.get(0)?,
                not_null: row.get::<_, i64>(1)? != 0,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn stamp_version(tx: &Transaction<'_>) -> DbResult<()> {
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::{has_current_shape, ColumnInfo};

    fn columns(spec: &[(&str, bool)]) -> Vec<ColumnInfo> {
        spec.iter()
            .map(|(name, not_null)| ColumnInfo {
                name: name.to_string(),
                not_null: *not_null,
            })
            .collect()
    }

    #[test]
    fn current_shape_ignores_column_order_and_case() {
        let current = columns(&[
            ("ID", false),
            ("email", false),
            ("telefono", true),
            ("Nombre", true),
        ]);
        assert!(has_current_shape(&current));
    }

    #[test]
    fn extra_or_missing_columns_are_not_current() {
        let with_notes = columns(&[
            ("id", false),
            ("nombre", true),
            ("telefono", true),
            ("email", false),
            ("notas", false),
        ]);
        assert!(!has_current_shape(&with_notes));

        let without_email = columns(&[("id", false), ("nombre", true), ("telefono", true)]);
        assert!(!has_current_shape(&without_email));
    }

    #[test]
    fn required_email_column_is_not_current() {
        let required_email = columns(&[
            ("id", false),
            ("nombre", true),
            ("telefono", true),
            ("email", true),
        ]);
        assert!(!has_current_shape(&required_email));
    }
}
