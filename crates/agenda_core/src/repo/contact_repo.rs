//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide typed CRUD and filtered listing over the `contactos` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - No field validation happens here; callers validate first.
//! - Storage errors propagate as `RepoError`; "not found" is `false`/`None`.
//! - Listing order is name ascending (case-insensitive), ties by id.
//! - Rows are returned as stored; a malformed row never hides the others.
//! - Filters fold case with Unicode lowercase via `lower_unicode`, registered
//!   on every connection by `db::open`.

use crate::db::DbError;
use crate::model::contact::{Contact, ContactId, NewContact};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    nombre,
    telefono,
    email
FROM contactos";

const CONTACT_ORDER_SQL: &str = " ORDER BY nombre COLLATE NOCASE ASC, id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Which columns a listing filter is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterScope {
    /// Name, phone or email.
    #[default]
    AllFields,
    /// Name only.
    NameOnly,
}

/// Query options for listing contacts.
#[derive(Debug, Clone, Default)]
pub struct ContactListQuery {
    /// Case-insensitive substring; blank means "no filter".
    pub filter: Option<String>,
    pub scope: FilterScope,
}

impl ContactListQuery {
    /// Builds a query filtering all fields by `text`.
    pub fn matching(text: impl Into<String>) -> Self {
        Self {
            filter: Some(text.into()),
            scope: FilterScope::AllFields,
        }
    }

    fn like_pattern(&self) -> Option<String> {
        let text = self.filter.as_deref()?.trim();
        if text.is_empty() {
            return None;
        }
        Some(format!("%{}%", escape_like(&text.to_lowercase())))
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    fn insert_contact(&self, contact: &NewContact) -> RepoResult<ContactId>;
    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn update_contact(&self, id: ContactId, contact: &NewContact) -> RepoResult<bool>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<bool>;
    fn delete_contacts_by_name(&self, name: &str) -> RepoResult<usize>;
    fn count_contacts(&self) -> RepoResult<u64>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn insert_contact(&self, contact: &NewContact) -> RepoResult<ContactId> {
        self.conn.execute(
            "INSERT INTO contactos (nombre, telefono, email) VALUES (?1, ?2, ?3);",
            params![
                contact.name.as_str(),
                contact.phone.as_str(),
                contact.email.as_deref(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_contacts(&self, query: &ContactListQuery) -> RepoResult<Vec<Contact>> {
        let mut sql = CONTACT_SELECT_SQL.to_string();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(pattern) = query.like_pattern() {
            match query.scope {
                FilterScope::AllFields => {
                    sql.push_str(
                        " WHERE lower_unicode(nombre) LIKE ?1 ESCAPE '\\'
                            OR lower_unicode(telefono) LIKE ?1 ESCAPE '\\'
                            OR lower_unicode(email) LIKE ?1 ESCAPE '\\'",
                    );
                }
                FilterScope::NameOnly => {
                    sql.push_str(" WHERE lower_unicode(nombre) LIKE ?1 ESCAPE '\\'");
                }
            }
            bind_values.push(Value::Text(pattern));
        }

        sql.push_str(CONTACT_ORDER_SQL);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut contacts = Vec::new();

        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }

        Ok(contacts)
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn update_contact(&self, id: ContactId, contact: &NewContact) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE contactos
             SET
                nombre = ?1,
                telefono = ?2,
                email = ?3
             WHERE id = ?4;",
            params![
                contact.name.as_str(),
                contact.phone.as_str(),
                contact.email.as_deref(),
                id,
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contactos WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_contacts_by_name(&self, name: &str) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM contactos WHERE nombre = ?1;", [name])?;
        Ok(changed)
    }

    fn count_contacts(&self) -> RepoResult<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM contactos;", [], |row| {
                row.get::<_, i64>(0)
            })?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id: ContactId = row.get("id")?;
    let name: String = row.get("nombre")?;
    let phone: String = row.get("telefono")?;

    // Legacy rows may carry '' instead of NULL.
    let email = row
        .get::<_, Option<String>>("email")?
        .filter(|value| !value.trim().is_empty());

    Ok(Contact {
        id,
        name,
        phone,
        email,
    })
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_like, ContactListQuery};

    #[test]
    fn escape_like_guards_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Ana"), "Ana");
    }

    #[test]
    fn blank_filter_means_no_pattern() {
        assert_eq!(ContactListQuery::matching("   ").like_pattern(), None);
        assert_eq!(ContactListQuery::default().like_pattern(), None);
        assert_eq!(
            ContactListQuery::matching(" ÁNA ").like_pattern().as_deref(),
            Some("%ána%")
        );
    }
}
