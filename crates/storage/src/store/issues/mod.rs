#![forbid(unsafe_code)]

mod create;
mod delete;
mod fetch;
mod patch;
mod replace;

use super::*;
use tissue_core::model::Issue;

impl SqliteStore {
    /// Creates every issue of the batch, or none of them.
    pub fn create_issues(
        &mut self,
        requests: Vec<CreateIssueRequest>,
    ) -> Result<Vec<Issue>, StoreError> {
        self.write_batch("create", requests, create::create_issue_tx)
    }

    pub fn create_issue(&mut self, request: CreateIssueRequest) -> Result<Issue, StoreError> {
        self.write_one("create", request, create::create_issue_tx)
    }

    /// Replaces every issue of the batch, or none of them. Unknown ids are
    /// inserted as new issues.
    pub fn replace_issues(
        &mut self,
        requests: Vec<ReplaceIssueRequest>,
    ) -> Result<Vec<Issue>, StoreError> {
        self.write_batch("replace", requests, replace::replace_issue_tx)
    }

    pub fn replace_issue(&mut self, request: ReplaceIssueRequest) -> Result<Issue, StoreError> {
        self.write_one("replace", request, replace::replace_issue_tx)
    }

    /// Patches every issue of the batch, or none of them.
    pub fn patch_issues(
        &mut self,
        requests: Vec<PatchIssueRequest>,
    ) -> Result<Vec<Issue>, StoreError> {
        self.write_batch("patch", requests, patch::patch_issue_tx)
    }

    pub fn patch_issue(&mut self, request: PatchIssueRequest) -> Result<Issue, StoreError> {
        self.write_one("patch", request, patch::patch_issue_tx)
    }
}

/// Re-reads an issue written earlier in the same transaction.
fn load_issue(conn: &Connection, id: i64) -> Result<Issue, StoreError> {
    fetch::fetch_issue_conn(conn, id)?.ok_or_else(|| StoreError::issue_not_found(id))
}

fn issue_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    use rusqlite::OptionalExtension;

    Ok(conn
        .query_row(
            "SELECT 1 FROM issue WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}

/// `col = ?1, col = ?2, ...` for a whitelist of column names.
fn set_clause(columns: &[&'static str]) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ")
}
