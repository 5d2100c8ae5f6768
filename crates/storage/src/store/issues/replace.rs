#![forbid(unsafe_code)]

use super::super::error::map_write_error;
use super::super::*;
use super::create::{insert_issue_tx, insert_tags_tx};
use super::{issue_exists, load_issue};
use rusqlite::params;
use tissue_core::model::Issue;
use tissue_core::tags::validate_tag_set;
use tracing::debug;

pub(super) fn replace_issue_tx(
    tx: &Transaction<'_>,
    request: ReplaceIssueRequest,
) -> Result<Issue, StoreError> {
    let ReplaceIssueRequest {
        id,
        title,
        description,
        tags,
    } = request;
    let tags = validate_tag_set(&tags)?;

    if !issue_exists(tx, id)? {
        let created = insert_issue_tx(tx, &title, &description, &tags)?;
        debug!(requested = id, created, "replace of unknown issue inserted a new one");
        return load_issue(tx, created);
    }

    tx.execute(
        "UPDATE issue SET title = ?1, description = ?2 WHERE id = ?3",
        params![title, description, id],
    )
    .map_err(map_write_error)?;
    tx.execute("DELETE FROM tag WHERE issue_id = ?1", params![id])?;
    insert_tags_tx(tx, id, &tags)?;

    load_issue(tx, id)
}
