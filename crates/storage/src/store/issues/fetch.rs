#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;
use tissue_core::model::{Issue, Tag};

impl SqliteStore {
    /// `Ok(None)` when no issue has this id.
    pub fn fetch_issue(&self, id: i64) -> Result<Option<Issue>, StoreError> {
        fetch_issue_conn(&self.conn, id)
    }
}

pub(super) fn fetch_issue_conn(conn: &Connection, id: i64) -> Result<Option<Issue>, StoreError> {
    let mut stmt = conn.prepare_cached(
        r#"
        SELECT issue.id, issue.title, issue.description,
               tag.id, tag.namespace, tag.predicate, tag.value
        FROM issue
        LEFT JOIN tag ON issue.id = tag.issue_id
        WHERE issue.id = ?1
        ORDER BY tag.id ASC
        "#,
    )?;

    let mut rows = stmt.query(params![id])?;
    let mut issue: Option<Issue> = None;

    while let Some(row) = rows.next()? {
        if issue.is_none() {
            issue = Some(Issue::new(
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ));
        }
        let Some(current) = issue.as_mut() else {
            continue;
        };

        // The left join yields NULL tag columns for an issue without tags.
        let value = row.get::<_, Option<String>>(6)?.unwrap_or_default();
        if value.is_empty() {
            continue;
        }
        current.tags.push(Tag {
            id: row.get(3)?,
            namespace: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            predicate: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
            value,
        });
    }

    Ok(issue)
}
