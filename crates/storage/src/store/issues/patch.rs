#![forbid(unsafe_code)]

use super::super::error::map_write_error;
use super::super::*;
use super::create::insert_tags_tx;
use super::{issue_exists, load_issue, set_clause};
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tissue_core::model::Issue;
use tissue_core::tags::{TagChange, plan_tag_patch};

pub(super) fn patch_issue_tx(
    tx: &Transaction<'_>,
    request: PatchIssueRequest,
) -> Result<Issue, StoreError> {
    let PatchIssueRequest {
        id,
        title,
        description,
        tags,
    } = request;

    if !issue_exists(tx, id)? {
        return Err(StoreError::issue_not_found(id));
    }
    let changes = plan_tag_patch(&tags)?;

    let mut columns = Vec::new();
    let mut values = Vec::new();
    if let Some(title) = title {
        columns.push("title");
        values.push(Value::Text(title));
    }
    if let Some(description) = description {
        columns.push("description");
        values.push(Value::Text(description));
    }
    if !columns.is_empty() {
        let sql = format!(
            "UPDATE issue SET {} WHERE id = ?{}",
            set_clause(&columns),
            columns.len() + 1
        );
        values.push(Value::Integer(id));
        tx.execute(&sql, params_from_iter(values))
            .map_err(map_write_error)?;
    }

    for change in changes {
        match change {
            TagChange::Update { id: tag_id, fields } => {
                let columns = fields
                    .iter()
                    .map(|(field, _)| field.as_str())
                    .collect::<Vec<_>>();
                let sql = format!(
                    "UPDATE tag SET {} WHERE id = ?{} AND issue_id = ?{}",
                    set_clause(&columns),
                    columns.len() + 1,
                    columns.len() + 2
                );
                let mut values = fields
                    .into_iter()
                    .map(|(_, value)| Value::Text(value))
                    .collect::<Vec<_>>();
                values.push(Value::Integer(tag_id));
                values.push(Value::Integer(id));

                let updated = tx
                    .execute(&sql, params_from_iter(values))
                    .map_err(map_write_error)?;
                if updated == 0 {
                    return Err(StoreError::tag_not_found(tag_id, id));
                }
            }
            TagChange::Delete { id: tag_id } => {
                let deleted = tx.execute(
                    "DELETE FROM tag WHERE id = ?1 AND issue_id = ?2",
                    params![tag_id, id],
                )?;
                if deleted == 0 {
                    return Err(StoreError::tag_not_found(tag_id, id));
                }
            }
            TagChange::Insert(content) => {
                insert_tags_tx(tx, id, std::slice::from_ref(&content))?;
            }
        }
    }

    load_issue(tx, id)
}
