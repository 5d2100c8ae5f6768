#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;
use tracing::debug;

impl SqliteStore {
    /// Removes the issue and all of its tags. Deleting an unknown id is not
    /// an error.
    pub fn delete_issue(&mut self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let tags = tx.execute("DELETE FROM tag WHERE issue_id = ?1", params![id])?;
        let issues = tx.execute("DELETE FROM issue WHERE id = ?1", params![id])?;
        tx.commit()?;

        debug!(id, issues, tags, "issue deleted");
        Ok(())
    }
}
