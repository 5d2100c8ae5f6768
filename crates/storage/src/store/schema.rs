#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

pub(super) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
