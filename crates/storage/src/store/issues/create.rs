#![forbid(unsafe_code)]

use super::super::error::map_write_error;
use super::super::*;
use super::load_issue;
use rusqlite::params;
use tissue_core::model::Issue;
use tissue_core::tags::{TagContent, validate_tag_set};

pub(super) fn create_issue_tx(
    tx: &Transaction<'_>,
    request: CreateIssueRequest,
) -> Result<Issue, StoreError> {
    let CreateIssueRequest {
        title,
        description,
        tags,
    } = request;

    let Some(title) = title else {
        return Err(StoreError::ConstraintViolation(
            "title is required".to_string(),
        ));
    };
    let tags = validate_tag_set(&tags)?;

    let id = insert_issue_tx(tx, &title, description.as_deref().unwrap_or(""), &tags)?;
    load_issue(tx, id)
}

/// Inserts the issue row and its tags; returns the assigned issue id.
pub(super) fn insert_issue_tx(
    tx: &Transaction<'_>,
    title: &str,
    description: &str,
    tags: &[TagContent],
) -> Result<i64, StoreError> {
    tx.execute(
        "INSERT INTO issue(title, description) VALUES (?1, ?2)",
        params![title, description],
    )
    .map_err(map_write_error)?;

    let id = tx.last_insert_rowid();
    insert_tags_tx(tx, id, tags)?;
    Ok(id)
}

pub(super) fn insert_tags_tx(
    tx: &Transaction<'_>,
    issue_id: i64,
    tags: &[TagContent],
) -> Result<(), StoreError> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO tag(namespace, predicate, value, issue_id) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for tag in tags {
        stmt.execute(params![tag.namespace(), tag.predicate(), tag.value(), issue_id])
            .map_err(map_write_error)?;
    }
    Ok(())
}
