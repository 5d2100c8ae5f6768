#![forbid(unsafe_code)]

use serde_json::{Map, Value};

type Object = Map<String, Value>;

pub(super) fn optional_string(obj: &Object, key: &str) -> Result<Option<String>, String> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(format!("{key} must be a string")),
    }
}

pub(super) fn required_title(obj: &Object) -> Result<String, String> {
    match optional_string(obj, "title")? {
        None => Err("title is required".to_string()),
        Some(title) if title.is_empty() => Err("title must not be empty".to_string()),
        Some(title) => Ok(title),
    }
}

/// Issue ids arrive as integers or as integer strings (`6` or `"6"`).
pub(super) fn required_id(obj: &Object) -> Result<i64, String> {
    let invalid = || "id must be an integer or an integer string".to_string();
    match obj.get("id") {
        None => Err("id is required".to_string()),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        Some(Value::String(raw)) => raw.trim().parse::<i64>().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

pub(super) fn optional_tags(obj: &Object) -> Result<Vec<&Object>, String> {
    let Some(value) = obj.get("tags") else {
        return Ok(Vec::new());
    };
    let Some(items) = value.as_array() else {
        return Err("tags must be an array".to_string());
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object()
                .ok_or_else(|| format!("tags[{index}] must be an object"))
        })
        .collect()
}

pub(super) fn optional_tag_text(
    tag: &Object,
    index: usize,
    key: &str,
) -> Result<Option<String>, String> {
    match tag.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(format!("tags[{index}].{key} must be a string")),
    }
}

pub(super) fn required_tag_text(tag: &Object, index: usize, key: &str) -> Result<String, String> {
    optional_tag_text(tag, index, key)?.ok_or_else(|| format!("tags[{index}].{key} is required"))
}

/// Tag values are strings or numbers on the wire and text in the store;
/// numbers keep their JSON spelling.
pub(super) fn optional_tag_value(tag: &Object, index: usize) -> Result<Option<String>, String> {
    match tag.get("value") {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(format!("tags[{index}].value must be a string or a number")),
    }
}

pub(super) fn required_tag_value(tag: &Object, index: usize) -> Result<String, String> {
    optional_tag_value(tag, index)?.ok_or_else(|| format!("tags[{index}].value is required"))
}

pub(super) fn optional_tag_id(tag: &Object, index: usize) -> Result<Option<i64>, String> {
    match tag.get("id") {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("tags[{index}].id must be an integer")),
        Some(_) => Err(format!("tags[{index}].id must be an integer")),
    }
}
