//! Client repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide schema setup and CRUD over `clients` and `phones`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every mutating call is one unit of work: it commits fully or leaves the
//!   store untouched.
//! - Phone rows are only removed by `delete_phone`, phone replacement in
//!   `update_client`, or the store's cascade on client deletion.
//! - Search values are bound, never interpolated.

use crate::db::schema::ensure_schema;
use crate::db::DbError;
use crate::model::client::{
    validate_client_id, validate_phone, Client, ClientFilter, ClientId, ClientMatch,
    ClientUpdate, ClientValidationError, NewClient, Phone, PhoneId,
};
use crate::repo::filter::build_filter_clause;
use rusqlite::{
    params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENT_MATCH_SELECT_SQL: &str = "SELECT
    c.client_id AS client_id,
    c.first_name AS first_name,
    c.last_name AS last_name,
    c.email AS email,
    p.phone AS phone
FROM clients c
LEFT JOIN phones p ON p.client_id = c.client_id
WHERE 1 = 1";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error, classified by what went wrong in the store.
#[derive(Debug)]
pub enum RepoError {
    /// Caller input rejected before any statement ran.
    MalformedInput(ClientValidationError),
    /// Foreign-key, NOT NULL or other declared constraint failed.
    ConstraintViolation(DbError),
    /// Store unreachable, locked, or failing at the I/O level.
    Connectivity(DbError),
    /// Connection refused to enable foreign-key enforcement.
    ForeignKeysUnavailable,
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput(err) => write!(f, "malformed input: {err}"),
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::Connectivity(err) => write!(f, "store unavailable: {err}"),
            Self::ForeignKeysUnavailable => {
                write!(f, "connection does not enforce foreign keys")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedInput(err) => Some(err),
            Self::ConstraintViolation(err) => Some(err),
            Self::Connectivity(err) => Some(err),
            Self::ForeignKeysUnavailable => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::MalformedInput(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value.sqlite_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(value),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::SystemIoFailure,
            ) => Self::Connectivity(value),
            _ => Self::Db(value),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        DbError::Sqlite(value).into()
    }
}

/// Repository interface for the client directory.
pub trait ClientRepository {
    /// Creates `clients` and `phones` if absent. Idempotent.
    fn ensure_schema(&self) -> RepoResult<()>;
    /// Inserts one client plus one phone row per number; returns the new id.
    fn add_client(&self, client: &NewClient) -> RepoResult<ClientId>;
    /// Inserts one phone for an existing client; returns the new phone id.
    fn add_phone(&self, client_id: ClientId, phone: &str) -> RepoResult<PhoneId>;
    /// Applies supplied columns and, when present, replaces the phone set.
    fn update_client(&self, client_id: ClientId, update: &ClientUpdate) -> RepoResult<()>;
    /// Deletes every phone row equal to `phone` for the client.
    fn delete_phone(&self, client_id: ClientId, phone: &str) -> RepoResult<usize>;
    /// Deletes the client; its phones go with it.
    fn delete_client(&self, client_id: ClientId) -> RepoResult<bool>;
    /// Returns one row per matching client/phone pairing.
    fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientMatch>>;
    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<Client>>;
    fn list_phones(&self, client_id: ClientId) -> RepoResult<Vec<Phone>>;
}

/// SQLite-backed client repository over a caller-owned connection.
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Wraps `conn`, switching on foreign-key enforcement.
    ///
    /// # Errors
    /// - `ForeignKeysUnavailable` when the pragma does not take effect, e.g.
    ///   foreign keys are off and the connection's open transaction has
    ///   already written, which makes SQLite ignore the pragma.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let enabled: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
        if enabled != 1 {
            return Err(RepoError::ForeignKeysUnavailable);
        }
        Ok(Self { conn })
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn ensure_schema(&self) -> RepoResult<()> {
        ensure_schema(self.conn)?;
        Ok(())
    }

    fn add_client(&self, client: &NewClient) -> RepoResult<ClientId> {
        client.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO clients (first_name, last_name, email) VALUES (?1, ?2, ?3);",
            params![
                client.first_name.as_deref(),
                client.last_name.as_deref(),
                client.email.as_deref(),
            ],
        )?;
        let client_id = tx.last_insert_rowid();
        insert_phones(&tx, client_id, &client.phones)?;
        tx.commit()?;

        Ok(client_id)
    }

    fn add_phone(&self, client_id: ClientId, phone: &str) -> RepoResult<PhoneId> {
        validate_client_id(client_id)?;
        validate_phone(phone)?;

        self.conn.execute(
            "INSERT INTO phones (client_id, phone) VALUES (?1, ?2);",
            params![client_id, phone],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_client(&self, client_id: ClientId, update: &ClientUpdate) -> RepoResult<()> {
        validate_client_id(client_id)?;
        update.validate()?;
        if update.is_noop() {
            return Ok(());
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (column, value) in update.column_changes() {
            // `column` comes from the fixed set in `ClientUpdate::column_changes`.
            tx.execute(
                &format!("UPDATE clients SET {column} = ?1 WHERE client_id = ?2;"),
                params![value, client_id],
            )?;
        }

        if let Some(phones) = &update.phones {
            tx.execute("DELETE FROM phones WHERE client_id = ?1;", [client_id])?;
            insert_phones(&tx, client_id, phones)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_phone(&self, client_id: ClientId, phone: &str) -> RepoResult<usize> {
        validate_client_id(client_id)?;

        let removed = self.conn.execute(
            "DELETE FROM phones WHERE client_id = ?1 AND phone = ?2;",
            params![client_id, phone],
        )?;
        Ok(removed)
    }

    fn delete_client(&self, client_id: ClientId) -> RepoResult<bool> {
        validate_client_id(client_id)?;

        let removed = self
            .conn
            .execute("DELETE FROM clients WHERE client_id = ?1;", [client_id])?;
        Ok(removed > 0)
    }

    fn find_clients(&self, filter: &ClientFilter) -> RepoResult<Vec<ClientMatch>> {
        let clause = build_filter_clause(filter);
        let sql = format!(
            "{CLIENT_MATCH_SELECT_SQL}{} ORDER BY c.client_id ASC, p.phone_id ASC;",
            clause.sql
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(clause.bind_values))?;
        let mut matches = Vec::new();
        while let Some(row) = rows.next()? {
            matches.push(parse_client_match_row(row)?);
        }

        Ok(matches)
    }

    fn get_client(&self, client_id: ClientId) -> RepoResult<Option<Client>> {
        let client = self
            .conn
            .query_row(
                "SELECT client_id, first_name, last_name, email
                 FROM clients
                 WHERE client_id = ?1;",
                [client_id],
                |row| {
                    Ok(Client {
                        client_id: row.get("client_id")?,
                        first_name: row.get("first_name")?,
                        last_name: row.get("last_name")?,
                        email: row.get("email")?,
                    })
                },
            )
            .optional()?;
        Ok(client)
    }

    fn list_phones(&self, client_id: ClientId) -> RepoResult<Vec<Phone>> {
        let mut stmt = self.conn.prepare(
            "SELECT phone_id, client_id, phone
             FROM phones
             WHERE client_id = ?1
             ORDER BY phone_id ASC;",
        )?;
        let mut rows = stmt.query([client_id])?;
        let mut phones = Vec::new();
        while let Some(row) = rows.next()? {
            phones.push(Phone {
                phone_id: row.get("phone_id")?,
                client_id: row.get("client_id")?,
                phone: row.get("phone")?,
            });
        }
        Ok(phones)
    }
}

fn insert_phones(tx: &Transaction<'_>, client_id: ClientId, phones: &[String]) -> RepoResult<()> {
    if phones.is_empty() {
        return Ok(());
    }

    let mut stmt = tx.prepare_cached("INSERT INTO phones (client_id, phone) VALUES (?1, ?2);")?;
    for phone in phones {
        stmt.execute(params![client_id, phone.as_str()])?;
    }
    Ok(())
}

fn parse_client_match_row(row: &Row<'_>) -> RepoResult<ClientMatch> {
    Ok(ClientMatch {
        client_id: row.get("client_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
    })
}
