#![forbid(unsafe_code)]

mod error;
mod issues;
mod requests;
mod schema;

pub use error::StoreError;
pub use requests::*;

use rusqlite::{Connection, OpenFlags, Transaction};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// One connection to the issue database. A handle is meant to live for a
/// single request and is never shared between requests.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Creates the database (and its parent directory) if needed and installs
    /// the schema. Run once at process start, before any `open`.
    pub fn provision(db_path: impl AsRef<Path>) -> Result<(), StoreError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        configure(&conn)?;
        schema::install_schema(&conn)?;
        debug!(path = %db_path.display(), "schema provisioned");
        Ok(())
    }

    /// Opens an already provisioned database. A missing file is an error,
    /// not a fresh empty database.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        configure(&conn)?;
        Ok(Self {
            conn,
            db_path: Some(db_path),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        schema::install_schema(&conn)?;
        Ok(Self {
            conn,
            db_path: None,
        })
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Applies `apply` to every item in order inside one transaction. The
    /// first failure drops the transaction, which rolls back every earlier
    /// item of the batch.
    fn write_batch<T, R>(
        &mut self,
        op: &'static str,
        items: Vec<T>,
        mut apply: impl FnMut(&Transaction<'_>, T) -> Result<R, StoreError>,
    ) -> Result<Vec<R>, StoreError> {
        let tx = self.conn.transaction()?;
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match apply(&tx, item) {
                Ok(value) => out.push(value),
                Err(err) => {
                    debug!(op, index, error = %err, "batch rolled back");
                    return Err(err.in_batch(index));
                }
            }
        }
        tx.commit()?;
        debug!(op, items = out.len(), "batch committed");
        Ok(out)
    }

    /// One-item form of `write_batch`, without the batch index on errors.
    fn write_one<T, R>(
        &mut self,
        op: &'static str,
        item: T,
        apply: impl FnOnce(&Transaction<'_>, T) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let tx = self.conn.transaction()?;
        let value = apply(&tx, item).inspect_err(|err| {
            debug!(op, error = %err, "write rolled back");
        })?;
        tx.commit()?;
        debug!(op, "write committed");
        Ok(value)
    }
}

fn configure(conn: &Connection) -> Result<(), StoreError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(())
}
