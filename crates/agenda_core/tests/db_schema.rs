use agenda_core::db::migrations::latest_version;
use agenda_core::db::{ensure_schema, open_db, open_db_in_memory, DbError, SchemaReport};
use agenda_core::ContactStore;
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_contact_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn, "contactos"),
        vec!["id", "nombre", "telefono", "email"]
    );
}

#[test]
fn ensure_schema_twice_keeps_structure_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.db");

    let mut conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO contactos (nombre, telefono, email) VALUES ('Ana García', '600111222', NULL);",
        [],
    )
    .unwrap();
    let columns_before = column_names(&conn, "contactos");

    assert_eq!(ensure_schema(&mut conn).unwrap(), SchemaReport::UpToDate);
    assert_eq!(ensure_schema(&mut conn).unwrap(), SchemaReport::UpToDate);

    assert_eq!(column_names(&conn, "contactos"), columns_before);
    assert_eq!(row_count(&conn, "contactos"), 1);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn store_ensure_schema_reports_created_then_up_to_date() {
    let dir = tempfile::tempdir().unwrap();
    let store = ContactStore::new(dir.path().join("agenda.db"));

    assert_eq!(store.ensure_schema(), Some(SchemaReport::Created));
    assert_eq!(store.ensure_schema(), Some(SchemaReport::UpToDate));
}

#[test]
fn legacy_table_with_notes_column_is_rebuilt_with_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE contactos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            telefono TEXT NOT NULL,
            email TEXT,
            notas TEXT
        );
        INSERT INTO contactos (id, nombre, telefono, email, notas)
            VALUES (4, 'Ana García', '600111222', 'ana@mail.com', 'old note');
        INSERT INTO contactos (id, nombre, telefono, email, notas)
            VALUES (9, 'Juan Pérez', '600333444', NULL, NULL);",
    )
    .unwrap();
    drop(conn);

    let mut conn = open_db(&path).unwrap();
    assert_eq!(
        column_names(&conn, "contactos"),
        vec!["id", "nombre", "telefono", "email"]
    );
    assert_eq!(row_count(&conn, "contactos"), 2);
    assert!(!table_exists(&conn, "contactos_new"));

    let name: String = conn
        .query_row("SELECT nombre FROM contactos WHERE id = 9;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(name, "Juan Pérez");

    // Ids continue after the highest copied id.
    conn.execute(
        "INSERT INTO contactos (nombre, telefono) VALUES ('Luis', '600555666');",
        [],
    )
    .unwrap();
    assert_eq!(conn.last_insert_rowid(), 10);

    assert_eq!(ensure_schema(&mut conn).unwrap(), SchemaReport::UpToDate);
}

#[test]
fn legacy_copy_failure_keeps_old_table_aside_and_still_renames() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE contactos (
            id INTEGER PRIMARY KEY,
            nombre TEXT NOT NULL,
            notas TEXT
        );
        INSERT INTO contactos (id, nombre, notas) VALUES (1, 'Ana', 'no phone column');",
    )
    .unwrap();
    drop(conn);

    let mut conn = Connection::open(&path).unwrap();
    let report = ensure_schema(&mut conn).unwrap();
    match report {
        SchemaReport::MigratedWithWarning {
            reason,
            preserved_as,
        } => {
            assert!(!reason.is_empty());
            assert_eq!(preserved_as, "contactos_legacy");
        }
        other => panic!("unexpected report: {other:?}"),
    }

    assert_eq!(
        column_names(&conn, "contactos"),
        vec!["id", "nombre", "telefono", "email"]
    );
    assert_eq!(row_count(&conn, "contactos"), 0);
    assert_eq!(row_count(&conn, "contactos_legacy"), 1);
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn required_email_column_is_rebuilt_as_optional() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("required_email.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE contactos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            telefono TEXT NOT NULL,
            email TEXT NOT NULL
        );
        INSERT INTO contactos (nombre, telefono, email)
            VALUES ('Juan Pérez', '600333444', 'juan@mail.com');",
    )
    .unwrap();
    drop(conn);

    let mut conn = Connection::open(&path).unwrap();
    assert_eq!(
        ensure_schema(&mut conn).unwrap(),
        SchemaReport::Migrated { copied_rows: 1 }
    );
    assert_eq!(ensure_schema(&mut conn).unwrap(), SchemaReport::UpToDate);
    drop(conn);

    let store = ContactStore::open(&path).unwrap();
    let id = store.insert("Ana", "600111222", None).unwrap();
    assert_eq!(store.get(id).unwrap().email, None);
    assert_eq!(store.count(), 2);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(ContactStore::open(&path).is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table_name: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")
        .unwrap();
    stmt.query_map([table_name], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

fn row_count(conn: &Connection, table_name: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table_name};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn table_exists(conn: &Connection, table_name: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}
