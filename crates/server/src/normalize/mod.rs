#![forbid(unsafe_code)]

//! Wire payload <-> store request/response conversion.
//!
//! Clients send either one issue object or an array of them. Every decoder
//! first canonicalizes to an ordered list, then checks the shape each verb
//! needs. Only shape is checked here; tag-set invariants (duplicates, empty
//! fields) are left to the store.

mod fields;

use crate::ApiError;
use fields::{
    optional_string, optional_tag_id, optional_tag_text, optional_tag_value, optional_tags,
    required_id, required_tag_text, required_tag_value, required_title,
};
use serde_json::{Map, Value, json};
use tissue_core::model::{Issue, Tag};
use tissue_storage::{
    CreateIssueRequest, PatchIssueRequest, ReplaceIssueRequest, TagDraft, TagPatch,
};

type Object = Map<String, Value>;

/// A single object becomes a one-element list; arrays keep their order.
pub fn issue_list(payload: &Value) -> Result<Vec<&Object>, ApiError> {
    match payload {
        Value::Object(obj) => Ok(vec![obj]),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(ApiError::SchemaInvalid(
                    "payload array must contain at least one issue".to_string(),
                ));
            }
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_object().ok_or_else(|| {
                        ApiError::SchemaInvalid(format!("issue[{index}]: must be an object"))
                    })
                })
                .collect()
        }
        _ => Err(ApiError::SchemaInvalid(
            "payload must be an issue object or an array of issue objects".to_string(),
        )),
    }
}

pub fn parse_payload(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::SchemaInvalid(format!("body is not valid json: {err}")))
}

/// POST: title required; every tag must name namespace, predicate and value.
pub fn create_requests(payload: &Value) -> Result<Vec<CreateIssueRequest>, ApiError> {
    each_issue(payload, |obj| {
        let title = required_title(obj)?;
        let description = optional_string(obj, "description")?;
        let mut tags = Vec::new();
        for (index, tag) in optional_tags(obj)?.into_iter().enumerate() {
            tags.push(TagDraft {
                namespace: Some(required_tag_text(tag, index, "namespace")?),
                predicate: Some(required_tag_text(tag, index, "predicate")?),
                value: Some(required_tag_value(tag, index)?),
            });
        }
        Ok(CreateIssueRequest {
            title: Some(title),
            description,
            tags,
        })
    })
}

/// PUT: id and title required. Omitted description and tags become empty so
/// the store replaces instead of merging.
pub fn replace_requests(payload: &Value) -> Result<Vec<ReplaceIssueRequest>, ApiError> {
    each_issue(payload, |obj| {
        let id = required_id(obj)?;
        let title = required_title(obj)?;
        let description = optional_string(obj, "description")?.unwrap_or_default();
        let tags = optional_tags(obj)?
            .into_iter()
            .enumerate()
            .map(|(index, tag)| tag_draft(tag, index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReplaceIssueRequest {
            id,
            title,
            description,
            tags,
        })
    })
}

/// PATCH: id required. Absent fields stay absent; no defaults are made up.
pub fn patch_requests(payload: &Value) -> Result<Vec<PatchIssueRequest>, ApiError> {
    each_issue(payload, |obj| {
        let id = required_id(obj)?;
        let title = optional_string(obj, "title")?;
        if title.as_deref().is_some_and(str::is_empty) {
            return Err("title must not be empty".to_string());
        }
        let description = optional_string(obj, "description")?;
        let tags = optional_tags(obj)?
            .into_iter()
            .enumerate()
            .map(|(index, tag)| -> Result<TagPatch, String> {
                let draft = tag_draft(tag, index)?;
                Ok(TagPatch {
                    id: optional_tag_id(tag, index)?,
                    namespace: draft.namespace,
                    predicate: draft.predicate,
                    value: draft.value,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatchIssueRequest {
            id,
            title,
            description,
            tags,
        })
    })
}

fn tag_draft(tag: &Object, index: usize) -> Result<TagDraft, String> {
    Ok(TagDraft {
        namespace: optional_tag_text(tag, index, "namespace")?,
        predicate: optional_tag_text(tag, index, "predicate")?,
        value: optional_tag_value(tag, index)?,
    })
}

fn each_issue<T>(
    payload: &Value,
    mut parse: impl FnMut(&Object) -> Result<T, String>,
) -> Result<Vec<T>, ApiError> {
    issue_list(payload)?
        .into_iter()
        .enumerate()
        .map(|(index, obj)| {
            parse(obj)
                .map_err(|message| ApiError::SchemaInvalid(format!("issue[{index}]: {message}")))
        })
        .collect()
}

pub fn issue_json(issue: &Issue) -> Value {
    json!({
        "id": issue.id,
        "title": issue.title,
        "description": issue.description,
        "tags": issue.tags.iter().map(tag_json).collect::<Vec<_>>(),
    })
}

pub fn issues_json(issues: &[Issue]) -> Value {
    Value::Array(issues.iter().map(issue_json).collect())
}

fn tag_json(tag: &Tag) -> Value {
    json!({
        "id": tag.id,
        "namespace": tag.namespace,
        "predicate": tag.predicate,
        "value": tag.value,
    })
}
