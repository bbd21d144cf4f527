//! Client directory schema script and executor.
//!
//! # Invariants
//! - The script only uses `CREATE ... IF NOT EXISTS`, so it is safe to run on
//!   every startup.
//! - `phones.client_id` cascades deletes from `clients.client_id`.

use crate::db::DbResult;
use rusqlite::{Connection, Transaction, TransactionBehavior};

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `clients` and `phones` tables when they are absent.
///
/// Runs in one immediate transaction; existing tables and rows are left as-is.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;
    Ok(())
}
